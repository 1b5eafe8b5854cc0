//! The `Config` struct and its load/save/path methods.

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{HotkeyMode, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings key used by older releases for the single AI add-event hotkey.
pub const LEGACY_AI_ADD_EVENT_KEY: &str = "ai_add_event_hotkey";

const AI_ADD_EVENT_ACTION: &str = "ai_add_event";

/// Application configuration, stored as YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Master switch; when false no hotkey is registered at all
    #[serde(default = "defaults::hotkeys_enabled")]
    pub hotkeys_enabled: bool,

    /// Capture hotkeys from the focused window or system-wide
    #[serde(default)]
    pub hotkey_mode: HotkeyMode,

    /// Action name -> combination string. An empty string disables the action.
    #[serde(default)]
    pub hotkeys: BTreeMap<String, String>,

    /// Read from older config files, folded into `hotkeys` on load
    #[serde(
        default,
        rename = "ai_add_event_hotkey",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_ai_add_event_hotkey: Option<String>,

    /// Debug log verbosity
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default = "defaults::hotkey_blocked_notification_ms")]
    pub hotkey_blocked_notification_ms: u64,

    #[serde(default = "defaults::config_watch_debounce_ms")]
    pub config_watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkeys_enabled: defaults::hotkeys_enabled(),
            hotkey_mode: HotkeyMode::default(),
            hotkeys: defaults::hotkeys(),
            legacy_ai_add_event_hotkey: None,
            log_level: LogLevel::default(),
            hotkey_blocked_notification_ms: defaults::hotkey_blocked_notification_ms(),
            config_watch_debounce_ms: defaults::config_watch_debounce_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it with defaults
    /// if it does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Re-read `path` after a change on disk.
    ///
    /// Returns `Ok(None)` when the file is empty or blank: editors truncate
    /// before writing, and a half-saved file must not replace working
    /// settings with the defaults.
    pub fn reload_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            log::warn!("Config file {:?} is empty; keeping current settings", path);
            return Ok(None);
        }
        let config = Self::from_yaml(&contents)?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Parse YAML text, then fold in the legacy key and any missing default hotkeys.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes as unit, not as a map
        let mut config: Config = if contents.trim().is_empty() {
            serde_yaml_ng::from_str("{}").map_err(ConfigError::Parse)?
        } else {
            serde_yaml_ng::from_str(contents).map_err(ConfigError::Parse)?
        };
        config.migrate_legacy_hotkey();
        config.merge_default_hotkeys();
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    ///
    /// Writes a sibling temp file and renames it over the target so a crash
    /// mid-write never leaves a truncated config behind.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Serialize)?;

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path (XDG convention outside Windows)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("glassy-calendar")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("glassy-calendar")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Hotkeys to register: every action with a non-empty combination.
    ///
    /// Returns an empty map when `hotkeys_enabled` is false.
    pub fn hotkey_map(&self) -> BTreeMap<String, String> {
        if !self.hotkeys_enabled {
            return BTreeMap::new();
        }
        self.hotkeys
            .iter()
            .filter(|(_, combo)| !combo.trim().is_empty())
            .map(|(action, combo)| (action.clone(), combo.clone()))
            .collect()
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotkeys.keys().any(|action| action.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "hotkeys: action names must not be empty".to_string(),
            ));
        }
        if self.hotkey_blocked_notification_ms == 0 {
            return Err(ConfigError::Validation(
                "hotkey_blocked_notification_ms must be greater than zero".to_string(),
            ));
        }
        if self.config_watch_debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "config_watch_debounce_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fold the old single-string setting into the hotkey map.
    ///
    /// An explicit `hotkeys.ai_add_event` entry wins over the legacy key.
    fn migrate_legacy_hotkey(&mut self) {
        let Some(legacy) = self.legacy_ai_add_event_hotkey.take() else {
            return;
        };
        if self.hotkeys.contains_key(AI_ADD_EVENT_ACTION) {
            log::debug!(
                "Ignoring legacy '{}'; hotkeys.{} is set",
                LEGACY_AI_ADD_EVENT_KEY,
                AI_ADD_EVENT_ACTION
            );
            return;
        }
        log::info!(
            "Migrating legacy '{}' = '{}' to hotkeys.{}",
            LEGACY_AI_ADD_EVENT_KEY,
            legacy,
            AI_ADD_EVENT_ACTION
        );
        self.hotkeys.insert(AI_ADD_EVENT_ACTION.to_string(), legacy);
    }

    /// Merge default hotkeys into the user's map.
    ///
    /// Only adds actions the user's config does not mention at all, so a user
    /// who cleared an entry to "" keeps it disabled.
    fn merge_default_hotkeys(&mut self) {
        let mut added = 0;
        for (action, combo) in defaults::hotkeys() {
            if !self.hotkeys.contains_key(&action) {
                log::info!("Adding new default hotkey: {} = {}", action, combo);
                self.hotkeys.insert(action, combo);
                added += 1;
            }
        }
        if added > 0 {
            log::info!("Merged {} new default hotkey(s)", added);
        }
    }
}
