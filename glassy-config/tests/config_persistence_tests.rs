//! Integration tests for config persistence.

use glassy_config::{Config, ConfigError, HotkeyMode, LogLevel};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = Config::default();
    config.hotkey_mode = HotkeyMode::Global;
    config.log_level = LogLevel::Debug;
    config
        .hotkeys
        .insert("show_calendar".to_string(), "Ctrl+Alt+C".to_string());
    config.save_to(&path).expect("save");

    let loaded = Config::load_from(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    Config::default().save_to(&path).expect("save");

    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());
}

#[test]
fn test_saved_file_drops_legacy_key() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "ai_add_event_hotkey: ctrl+shift+a\n").expect("write");

    let config = Config::load_from(&path).expect("load");
    config.save_to(&path).expect("save");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(!text.contains("ai_add_event_hotkey"));
    assert!(text.contains("ctrl+shift+a"));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "config_watch_debounce_ms: 0\n").expect("write");

    let err = Config::load_from(&path).expect_err("zero debounce must fail");
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = Config::load_from(&dir.path().join("absent.yaml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_path_lives_in_config_dir() {
    assert_eq!(
        Config::config_path().parent(),
        Some(Config::config_dir().as_path())
    );
    assert!(Config::config_dir().ends_with("glassy-calendar"));
}

#[test]
fn test_reload_skips_truncated_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "hotkeys: {ai_add_event: Alt+N}\n").expect("write");

    let config = Config::reload_from(&path)
        .expect("reload")
        .expect("non-empty file");
    assert_eq!(config.hotkeys["ai_add_event"], "Alt+N");

    fs::write(&path, "").expect("truncate");
    assert_eq!(Config::reload_from(&path).expect("reload"), None);

    fs::write(&path, "  \n\n").expect("blank");
    assert_eq!(Config::reload_from(&path).expect("reload"), None);
}

#[test]
fn test_reload_reports_invalid_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "hotkey_blocked_notification_ms: 0\n").expect("write");

    assert!(matches!(
        Config::reload_from(&path),
        Err(ConfigError::Validation(_))
    ));
}
