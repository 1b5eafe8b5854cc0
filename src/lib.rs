// Library exports for testing and potential library use

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Window title used when no dialog session is open.
pub const APP_TITLE: &str = "Glassy Calendar";

pub mod app;
pub mod cli;
pub mod commands;
pub mod debug;
pub mod notifications;
