//! Default values for config fields, referenced from `#[serde(default = ...)]`.

use std::collections::BTreeMap;

pub fn hotkeys_enabled() -> bool {
    true
}

/// Hotkeys shipped with the application.
pub fn hotkeys() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("ai_add_event".to_string(), "Ctrl+Shift+F1".to_string());
    map
}

/// How long the "AI add-event is unavailable" notice stays on screen.
pub fn hotkey_blocked_notification_ms() -> u64 {
    3000
}

pub fn config_watch_debounce_ms() -> u64 {
    250
}
