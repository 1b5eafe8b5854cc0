//! Configuration system for Glassy Calendar.
//!
//! This crate provides configuration loading, saving, and default values
//! for the calendar widget. It includes:
//!
//! - The hotkey mapping (action name to combination string)
//! - Hotkey capture mode and the master enable switch
//! - Log level and notification timings
//! - Configuration file watching

pub mod config;
pub mod defaults;
mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use config::{Config, LEGACY_AI_ADD_EVENT_KEY};
pub use error::ConfigError;
pub use types::{HotkeyMode, LogLevel};
