//! Shared integration test helpers for glassy-calendar.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use glassy_calendar::notifications::DesktopNotifier;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub title: String,
    pub message: String,
    pub timeout_ms: u64,
}

/// Notifier that records instead of showing anything.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub shown: RefCell<Vec<Shown>>,
}

impl DesktopNotifier for RecordingNotifier {
    fn show(&self, title: &str, message: &str, timeout_ms: u64) {
        self.shown.borrow_mut().push(Shown {
            title: title.to_string(),
            message: message.to_string(),
            timeout_ms,
        });
    }
}

/// Write `yaml` to a config.yaml inside a fresh temp dir.
///
/// Keep the returned `TempDir` alive until the test is done with the file.
pub fn write_config(yaml: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    (dir, path)
}
