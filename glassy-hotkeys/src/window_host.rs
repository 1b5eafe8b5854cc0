//! Focused-window host.
//!
//! Claims combinations against the application window's own keyboard events.
//! Everything runs on the GUI thread, so no hand-off is needed; the price is
//! that hotkeys only fire while the window has focus.

use crate::error::HostError;
use crate::host::{CaptureScope, HotkeyHost};
use crate::parser::{KeyCombo, Modifiers, ParsedKey};
use crate::platform::{qwerty_position, resolve_cmd_or_ctrl};
use std::collections::HashMap;

/// Host backed by the window toolkit's key events.
///
/// Registrations fail with [`HostError::Unavailable`] until a window is
/// attached with [`FocusedWindowHost::attach_window`].
#[derive(Debug, Default)]
pub struct FocusedWindowHost {
    attached: bool,
    /// Effective combo (CmdOrCtrl resolved) -> owning action
    claims: HashMap<KeyCombo, String>,
}

impl FocusedWindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the window context as existing.
    pub fn attach_window(&mut self) {
        if !self.attached {
            log::debug!("Focused-window hotkey host attached");
        }
        self.attached = true;
    }

    /// Drop the window context. Existing claims are kept so the service can
    /// still release them.
    pub fn detach_window(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of claimed combinations.
    pub fn claimed(&self) -> usize {
        self.claims.len()
    }
}

/// The slot a combination occupies on the keyboard.
///
/// CmdOrCtrl is resolved and characters are keyed by their QWERTY position,
/// so "CmdOrCtrl+K" and "Ctrl+K" collide, as do "Ctrl+Shift+1" and
/// "Ctrl+Shift+!", which the same press triggers.
fn effective_combo(combo: &KeyCombo) -> KeyCombo {
    let (ctrl, super_key) = resolve_cmd_or_ctrl(
        combo.modifiers.cmd_or_ctrl,
        combo.modifiers.ctrl,
        combo.modifiers.super_key,
    );
    let key = match &combo.key {
        ParsedKey::Character(c) => qwerty_position(*c, combo.modifiers.shift)
            .map_or(ParsedKey::Character(*c), ParsedKey::Physical),
        other => other.clone(),
    };
    KeyCombo::new(
        Modifiers {
            ctrl,
            super_key,
            cmd_or_ctrl: false,
            ..combo.modifiers
        },
        key,
    )
}

impl HotkeyHost for FocusedWindowHost {
    fn scope(&self) -> CaptureScope {
        CaptureScope::FocusedWindow
    }

    fn is_ready(&self) -> bool {
        self.attached
    }

    fn activate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        if !self.attached {
            return Err(HostError::Unavailable(
                "no application window exists yet".to_string(),
            ));
        }

        // A bare printable key would swallow ordinary typing in the window
        if matches!(combo.key, ParsedKey::Character(_) | ParsedKey::Physical(_))
            && !combo.modifiers.has_command_modifier()
        {
            return Err(HostError::Rejected(format!(
                "'{}' needs Ctrl, Alt or Super to be used as a hotkey",
                combo
            )));
        }

        let key = effective_combo(combo);
        if let Some(owner) = self.claims.get(&key) {
            if owner != action {
                return Err(HostError::Rejected(format!(
                    "'{}' is already bound to '{}'",
                    combo, owner
                )));
            }
        }

        self.claims.insert(key, action.to_string());
        Ok(())
    }

    fn deactivate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        let key = effective_combo(combo);
        match self.claims.get(&key) {
            Some(owner) if owner == action => {
                self.claims.remove(&key);
                Ok(())
            }
            Some(owner) => Err(HostError::Disposal(format!(
                "'{}' is claimed by '{}', not '{}'",
                combo, owner, action
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_combination;

    #[test]
    fn test_unavailable_before_attach() {
        let mut host = FocusedWindowHost::new();
        let combo = parse_combination("Ctrl+Shift+F1").unwrap();
        assert!(!host.is_ready());
        assert!(matches!(
            host.activate("ai_add_event", &combo),
            Err(HostError::Unavailable(_))
        ));

        host.attach_window();
        assert!(host.activate("ai_add_event", &combo).is_ok());
        assert_eq!(host.claimed(), 1);
    }

    #[test]
    fn test_conflicting_claim_rejected() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        let combo = parse_combination("Ctrl+K").unwrap();
        host.activate("first", &combo).unwrap();
        assert!(matches!(
            host.activate("second", &combo),
            Err(HostError::Rejected(_))
        ));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_cmd_or_ctrl_conflicts_with_ctrl() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        host.activate("first", &parse_combination("Ctrl+K").unwrap())
            .unwrap();
        assert!(
            host.activate("second", &parse_combination("CmdOrCtrl+K").unwrap())
                .is_err()
        );
    }

    #[test]
    fn test_shifted_symbol_conflicts_with_its_digit() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        host.activate("one", &parse_combination("Ctrl+Shift+1").unwrap())
            .unwrap();
        assert!(matches!(
            host.activate("bang", &parse_combination("Ctrl+Shift+!").unwrap()),
            Err(HostError::Rejected(_))
        ));
        // Without Shift the digit is a different slot
        assert!(host.activate("plain", &parse_combination("Ctrl+1").unwrap()).is_ok());
    }

    #[test]
    fn test_character_conflicts_with_its_physical_key() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        host.activate("undo", &parse_combination("Ctrl+Z").unwrap())
            .unwrap();
        assert!(
            host.activate("other", &parse_combination("Ctrl+[KeyZ]").unwrap())
                .is_err()
        );
    }

    #[test]
    fn test_bare_character_rejected() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        assert!(matches!(
            host.activate("typing", &parse_combination("Shift+A").unwrap()),
            Err(HostError::Rejected(_))
        ));
        assert!(host.activate("refresh", &parse_combination("F5").unwrap()).is_ok());
    }

    #[test]
    fn test_deactivate_releases_claim() {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        let combo = parse_combination("Ctrl+K").unwrap();
        host.activate("first", &combo).unwrap();
        host.deactivate("first", &combo).unwrap();
        assert_eq!(host.claimed(), 0);
        assert!(host.activate("second", &combo).is_ok());
        // Releasing something never claimed is fine
        assert!(host.deactivate("ghost", &parse_combination("Ctrl+J").unwrap()).is_ok());
    }
}
