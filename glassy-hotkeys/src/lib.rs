//! Hotkey binding service for Glassy Calendar.
//!
//! Maps symbolic action names (e.g. `ai_add_event`) to key combinations
//! parsed from settings strings such as `"Ctrl + Shift + F1"`, registers them
//! with a host input system, and delivers "hotkey fired" notifications to the
//! application on the GUI thread.
//!
//! Features:
//! - Whitespace and case tolerant combination parsing with normalized output
//! - Focused-window host driven by the window's own key events
//! - System-wide host behind the `global-hook` feature, posting presses from
//!   the hook thread to the event loop
//! - Physical key support for layout-independent bindings

mod delivery;
mod error;
#[cfg(feature = "global-hook")]
mod global_host;
mod host;
mod matcher;
pub mod parser;
pub mod platform;
mod service;
mod window_host;

pub use delivery::{
    DEFAULT_QUEUE_CAPACITY, HookRouter, HotkeyFired, HotkeyNotifier, HotkeyQueue, LoopNotifier,
    QueueNotifier,
};
pub use error::{BindingFailure, HostError, NotifyError, RegistrationError};
#[cfg(feature = "global-hook")]
pub use global_host::{GlobalHookHost, to_hotkey};
pub use host::{CaptureScope, HotkeyHost};
pub use matcher::{KeyStroke, StrokeKey};
pub use parser::{KeyCombo, Modifiers, ParseError, ParsedKey, parse_combination};
pub use service::{
    FailedBinding, HotkeyBinding, HotkeyHandler, HotkeyService, RegistrationSummary,
};
pub use window_host::FocusedWindowHost;
