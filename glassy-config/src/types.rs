//! Enumerated settings values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where hotkeys are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyMode {
    /// Window key events; fires only while the calendar window has focus
    #[default]
    FocusedWindow,
    /// OS-level hook; fires regardless of focus (needs the `global-hook` build)
    Global,
}

impl HotkeyMode {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            HotkeyMode::FocusedWindow => "Focused window",
            HotkeyMode::Global => "System-wide",
        }
    }

    /// Name as written in config.yaml and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            HotkeyMode::FocusedWindow => "focused_window",
            HotkeyMode::Global => "global",
        }
    }
}

impl fmt::Display for HotkeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HotkeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "focused_window" | "window" | "focused" => Ok(HotkeyMode::FocusedWindow),
            "global" | "system" => Ok(HotkeyMode::Global),
            other => Err(format!(
                "unknown hotkey mode '{}' (expected focused_window or global)",
                other
            )),
        }
    }
}

/// Log level for debug logging to file.
///
/// Controls the verbosity of log output written to the debug log file.
/// Environment variable `RUST_LOG` and the `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// All available levels, least to most verbose
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkey_mode_parsing() {
        assert_eq!("global".parse::<HotkeyMode>(), Ok(HotkeyMode::Global));
        assert_eq!(
            "Focused-Window".parse::<HotkeyMode>(),
            Ok(HotkeyMode::FocusedWindow)
        );
        assert!("everywhere".parse::<HotkeyMode>().is_err());
    }

    #[test]
    fn test_hotkey_mode_display_matches_serde() {
        for mode in [HotkeyMode::FocusedWindow, HotkeyMode::Global] {
            let yaml = serde_yaml_ng::to_string(&mode).unwrap();
            assert_eq!(yaml.trim(), mode.to_string());
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" trace ".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_filter_order() {
        let filters: Vec<_> = LogLevel::all()
            .iter()
            .map(|l| l.to_level_filter())
            .collect();
        assert!(filters.windows(2).all(|w| w[0] < w[1]));
    }
}
