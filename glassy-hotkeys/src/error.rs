//! Typed error variants for hotkey registration and delivery.
//!
//! Every failure is local to the single binding it concerns. None of these
//! are fatal to the service: a failed binding simply stays inactive.

use crate::parser::ParseError;
use thiserror::Error;

/// Errors returned by [`crate::HotkeyService::register`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The host input system is not initialized yet (e.g., no window exists).
    ///
    /// Retry registration once the host context is available.
    #[error("hotkey host is not available: {0}")]
    HostUnavailable(String),

    /// The host rejected the combination: claimed elsewhere or not expressible.
    #[error("hotkey rejected by host: {0}")]
    ConflictOrInvalid(String),
}

/// Results reported by a [`crate::HotkeyHost`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host context does not exist yet.
    #[error("host unavailable: {0}")]
    Unavailable(String),

    /// The combination cannot be claimed.
    #[error("combination rejected: {0}")]
    Rejected(String),

    /// Releasing a previously claimed combination failed.
    #[error("failed to release combination: {0}")]
    Disposal(String),
}

impl From<HostError> for RegistrationError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::Unavailable(msg) => RegistrationError::HostUnavailable(msg),
            HostError::Rejected(msg) | HostError::Disposal(msg) => {
                RegistrationError::ConflictOrInvalid(msg)
            }
        }
    }
}

/// Why one entry of a batch registration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingFailure {
    /// The combination text could not be parsed.
    #[error("invalid key combination: {0}")]
    Parse(#[from] ParseError),

    /// The combination parsed but could not be registered.
    #[error(transparent)]
    Register(#[from] RegistrationError),
}

/// Errors posting a hotkey notification to the GUI thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The event loop or queue receiver is gone.
    #[error("notification target closed")]
    Closed,

    /// The bounded queue is full; the notification was dropped.
    #[error("notification queue full")]
    QueueFull,
}
