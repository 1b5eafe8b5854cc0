//! Typed error variants for the glassy-config crate.

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
///
/// `Config::load` and friends return these directly. Callers working in
/// `anyhow` get them through the blanket `From` impl and can recover the
/// variant with `downcast_ref::<ConfigError>()`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error on config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[source] serde_yaml_ng::Error),

    /// The config could not be serialized for saving.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the problem.
    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_validation_message() {
        let err = ConfigError::Validation("hotkeys: empty action name".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: hotkeys: empty action name"
        );
    }
}
