//! Host input system abstraction.
//!
//! A host is the facility that actually detects key presses: the window
//! toolkit's own keyboard events, or an OS-level global hook. The service
//! claims and releases combinations through this trait and never talks to the
//! underlying system directly.

use crate::error::HostError;
use crate::parser::KeyCombo;
use std::fmt;

/// Where a host can observe key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureScope {
    /// Only while the application window has keyboard focus.
    ///
    /// Presses arrive as window key events on the GUI thread and are matched
    /// by [`crate::HotkeyService::handle_key_stroke`].
    FocusedWindow,
    /// System-wide, even in the background.
    ///
    /// Presses are detected on a listener thread and posted to the GUI thread,
    /// which hands them to [`crate::HotkeyService::deliver`].
    SystemWide,
}

impl fmt::Display for CaptureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureScope::FocusedWindow => write!(f, "focused window only"),
            CaptureScope::SystemWide => write!(f, "system-wide"),
        }
    }
}

/// A host input system that combinations can be registered with.
///
/// All methods are called on the GUI-owning thread.
pub trait HotkeyHost {
    /// Where this host observes key presses.
    fn scope(&self) -> CaptureScope;

    /// Whether the host context exists and registrations can succeed.
    fn is_ready(&self) -> bool;

    /// Claim `combo` for `action`.
    fn activate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError>;

    /// Release a combination previously claimed for `action`.
    fn deactivate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError>;
}

impl<H: HotkeyHost + ?Sized> HotkeyHost for Box<H> {
    fn scope(&self) -> CaptureScope {
        (**self).scope()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn activate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        (**self).activate(action, combo)
    }

    fn deactivate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        (**self).deactivate(action, combo)
    }
}
