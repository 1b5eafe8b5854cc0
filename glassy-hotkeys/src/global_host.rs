//! System-wide hotkey host backed by the `global-hotkey` crate.
//!
//! The OS hook reports presses from outside the event loop. Its handler only
//! consults the [`HookRouter`] and posts a [`crate::HotkeyFired`] through the
//! router's notifier; it never calls into GUI code.
//!
//! `global-hotkey` keeps one process-wide event handler. This host installs it
//! in [`GlobalHookHost::start`] and removes it on drop, so callers never touch
//! that global directly.

use crate::delivery::{HookRouter, HotkeyNotifier};
use crate::error::HostError;
use crate::host::{CaptureScope, HotkeyHost};
use crate::parser::{KeyCombo, ParsedKey};
use crate::platform::{qwerty_position, resolve_cmd_or_ctrl};
use global_hotkey::hotkey::{Code, HotKey, Modifiers as HookModifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::collections::HashMap;
use std::sync::Arc;
use winit::keyboard::{KeyCode, NamedKey};

/// Host that registers combinations with the operating system.
pub struct GlobalHookHost {
    manager: Option<GlobalHotKeyManager>,
    router: Arc<HookRouter>,
    /// action -> registered hotkey
    hotkeys: HashMap<String, HotKey>,
}

impl std::fmt::Debug for GlobalHookHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalHookHost")
            .field("started", &self.manager.is_some())
            .field("hotkeys", &self.hotkeys.len())
            .finish_non_exhaustive()
    }
}

impl GlobalHookHost {
    /// Create a host that posts presses through `notifier`.
    ///
    /// Nothing is registered with the OS until [`GlobalHookHost::start`].
    pub fn new(notifier: Arc<dyn HotkeyNotifier>) -> Self {
        Self {
            manager: None,
            router: Arc::new(HookRouter::new(notifier)),
            hotkeys: HashMap::new(),
        }
    }

    /// Create the OS hook manager and install the event handler.
    ///
    /// On macOS this must be called on the main thread after the event loop
    /// exists.
    pub fn start(&mut self) -> Result<(), HostError> {
        if self.manager.is_some() {
            return Ok(());
        }

        let manager = GlobalHotKeyManager::new()
            .map_err(|e| HostError::Unavailable(format!("global hotkey manager: {e}")))?;

        let router = Arc::clone(&self.router);
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            router.on_hook_event(event.id, event.state == HotKeyState::Pressed);
        }));

        log::info!("Global hotkey hook started");
        self.manager = Some(manager);
        Ok(())
    }
}

impl Drop for GlobalHookHost {
    fn drop(&mut self) {
        if self.manager.is_none() {
            return;
        }
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
        self.router.clear();
        if let Some(manager) = self.manager.take() {
            for (action, hotkey) in self.hotkeys.drain() {
                if let Err(e) = manager.unregister(hotkey) {
                    log::warn!("Failed to release global hotkey for '{}': {}", action, e);
                }
            }
        }
    }
}

impl HotkeyHost for GlobalHookHost {
    fn scope(&self) -> CaptureScope {
        CaptureScope::SystemWide
    }

    fn is_ready(&self) -> bool {
        self.manager.is_some()
    }

    fn activate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        let Some(manager) = self.manager.as_ref() else {
            return Err(HostError::Unavailable(
                "global hotkey hook not started".to_string(),
            ));
        };

        let hotkey = to_hotkey(combo)?;
        manager
            .register(hotkey)
            .map_err(|e| HostError::Rejected(format!("'{}': {}", combo, e)))?;

        self.router.route(hotkey.id(), action);
        self.hotkeys.insert(action.to_string(), hotkey);
        Ok(())
    }

    fn deactivate(&mut self, action: &str, _combo: &KeyCombo) -> Result<(), HostError> {
        let Some(hotkey) = self.hotkeys.remove(action) else {
            return Ok(());
        };
        // Stop routing first so a press racing with the release is not posted
        self.router.unroute(hotkey.id());

        match self.manager.as_ref() {
            Some(manager) => manager
                .unregister(hotkey)
                .map_err(|e| HostError::Disposal(e.to_string())),
            None => Ok(()),
        }
    }
}

/// Convert a parsed combo to a `global-hotkey` hotkey.
pub fn to_hotkey(combo: &KeyCombo) -> Result<HotKey, HostError> {
    let code = hook_code(&combo.key, combo.modifiers.shift).ok_or_else(|| {
        HostError::Rejected(format!("'{}' cannot be registered system-wide", combo))
    })?;

    let (ctrl, super_key) = resolve_cmd_or_ctrl(
        combo.modifiers.cmd_or_ctrl,
        combo.modifiers.ctrl,
        combo.modifiers.super_key,
    );
    let mut mods = HookModifiers::empty();
    if ctrl {
        mods |= HookModifiers::CONTROL;
    }
    if combo.modifiers.alt {
        mods |= HookModifiers::ALT;
    }
    if combo.modifiers.shift {
        mods |= HookModifiers::SHIFT;
    }
    if super_key {
        mods |= HookModifiers::SUPER;
    }

    let mods = if mods.is_empty() { None } else { Some(mods) };
    Ok(HotKey::new(mods, code))
}

/// Scan code for a parsed key. Characters use their US QWERTY position.
fn hook_code(key: &ParsedKey, shift: bool) -> Option<Code> {
    let key_code = match key {
        ParsedKey::Physical(code) => *code,
        ParsedKey::Character(c) => qwerty_position(*c, shift)?,
        ParsedKey::Named(named) => named_key_code(*named)?,
    };
    hook_code_for_key_code(key_code)
}

fn named_key_code(named: NamedKey) -> Option<KeyCode> {
    let code = match named {
        NamedKey::F1 => KeyCode::F1,
        NamedKey::F2 => KeyCode::F2,
        NamedKey::F3 => KeyCode::F3,
        NamedKey::F4 => KeyCode::F4,
        NamedKey::F5 => KeyCode::F5,
        NamedKey::F6 => KeyCode::F6,
        NamedKey::F7 => KeyCode::F7,
        NamedKey::F8 => KeyCode::F8,
        NamedKey::F9 => KeyCode::F9,
        NamedKey::F10 => KeyCode::F10,
        NamedKey::F11 => KeyCode::F11,
        NamedKey::F12 => KeyCode::F12,
        NamedKey::Enter => KeyCode::Enter,
        NamedKey::Escape => KeyCode::Escape,
        NamedKey::Space => KeyCode::Space,
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::Backspace => KeyCode::Backspace,
        NamedKey::Delete => KeyCode::Delete,
        NamedKey::Insert => KeyCode::Insert,
        NamedKey::Home => KeyCode::Home,
        NamedKey::End => KeyCode::End,
        NamedKey::PageUp => KeyCode::PageUp,
        NamedKey::PageDown => KeyCode::PageDown,
        NamedKey::ArrowUp => KeyCode::ArrowUp,
        NamedKey::ArrowDown => KeyCode::ArrowDown,
        NamedKey::ArrowLeft => KeyCode::ArrowLeft,
        NamedKey::ArrowRight => KeyCode::ArrowRight,
        _ => return None,
    };
    Some(code)
}

fn hook_code_for_key_code(code: KeyCode) -> Option<Code> {
    let hook = match code {
        KeyCode::KeyA => Code::KeyA,
        KeyCode::KeyB => Code::KeyB,
        KeyCode::KeyC => Code::KeyC,
        KeyCode::KeyD => Code::KeyD,
        KeyCode::KeyE => Code::KeyE,
        KeyCode::KeyF => Code::KeyF,
        KeyCode::KeyG => Code::KeyG,
        KeyCode::KeyH => Code::KeyH,
        KeyCode::KeyI => Code::KeyI,
        KeyCode::KeyJ => Code::KeyJ,
        KeyCode::KeyK => Code::KeyK,
        KeyCode::KeyL => Code::KeyL,
        KeyCode::KeyM => Code::KeyM,
        KeyCode::KeyN => Code::KeyN,
        KeyCode::KeyO => Code::KeyO,
        KeyCode::KeyP => Code::KeyP,
        KeyCode::KeyQ => Code::KeyQ,
        KeyCode::KeyR => Code::KeyR,
        KeyCode::KeyS => Code::KeyS,
        KeyCode::KeyT => Code::KeyT,
        KeyCode::KeyU => Code::KeyU,
        KeyCode::KeyV => Code::KeyV,
        KeyCode::KeyW => Code::KeyW,
        KeyCode::KeyX => Code::KeyX,
        KeyCode::KeyY => Code::KeyY,
        KeyCode::KeyZ => Code::KeyZ,
        KeyCode::Digit0 => Code::Digit0,
        KeyCode::Digit1 => Code::Digit1,
        KeyCode::Digit2 => Code::Digit2,
        KeyCode::Digit3 => Code::Digit3,
        KeyCode::Digit4 => Code::Digit4,
        KeyCode::Digit5 => Code::Digit5,
        KeyCode::Digit6 => Code::Digit6,
        KeyCode::Digit7 => Code::Digit7,
        KeyCode::Digit8 => Code::Digit8,
        KeyCode::Digit9 => Code::Digit9,
        KeyCode::Minus => Code::Minus,
        KeyCode::Equal => Code::Equal,
        KeyCode::BracketLeft => Code::BracketLeft,
        KeyCode::BracketRight => Code::BracketRight,
        KeyCode::Backslash => Code::Backslash,
        KeyCode::Semicolon => Code::Semicolon,
        KeyCode::Quote => Code::Quote,
        KeyCode::Backquote => Code::Backquote,
        KeyCode::Comma => Code::Comma,
        KeyCode::Period => Code::Period,
        KeyCode::Slash => Code::Slash,
        KeyCode::F1 => Code::F1,
        KeyCode::F2 => Code::F2,
        KeyCode::F3 => Code::F3,
        KeyCode::F4 => Code::F4,
        KeyCode::F5 => Code::F5,
        KeyCode::F6 => Code::F6,
        KeyCode::F7 => Code::F7,
        KeyCode::F8 => Code::F8,
        KeyCode::F9 => Code::F9,
        KeyCode::F10 => Code::F10,
        KeyCode::F11 => Code::F11,
        KeyCode::F12 => Code::F12,
        KeyCode::ArrowUp => Code::ArrowUp,
        KeyCode::ArrowDown => Code::ArrowDown,
        KeyCode::ArrowLeft => Code::ArrowLeft,
        KeyCode::ArrowRight => Code::ArrowRight,
        KeyCode::Home => Code::Home,
        KeyCode::End => Code::End,
        KeyCode::PageUp => Code::PageUp,
        KeyCode::PageDown => Code::PageDown,
        KeyCode::Insert => Code::Insert,
        KeyCode::Delete => Code::Delete,
        KeyCode::Enter => Code::Enter,
        KeyCode::Escape => Code::Escape,
        KeyCode::Space => Code::Space,
        KeyCode::Tab => Code::Tab,
        KeyCode::Backspace => Code::Backspace,
        _ => return None,
    };
    Some(hook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::HotkeyQueue;
    use crate::parser::parse_combination;

    #[test]
    fn test_to_hotkey_modifiers_and_code() {
        let combo = parse_combination("Ctrl+Shift+F1").unwrap();
        let hotkey = to_hotkey(&combo).unwrap();
        let expected = HotKey::new(
            Some(HookModifiers::CONTROL | HookModifiers::SHIFT),
            Code::F1,
        );
        assert_eq!(hotkey.id(), expected.id());
    }

    #[test]
    fn test_character_uses_qwerty_position() {
        let hotkey = to_hotkey(&parse_combination("Alt+/").unwrap()).unwrap();
        let expected = HotKey::new(Some(HookModifiers::ALT), Code::Slash);
        assert_eq!(hotkey.id(), expected.id());
    }

    #[test]
    fn test_shifted_symbol_registers_its_digit_key() {
        let hotkey = to_hotkey(&parse_combination("Ctrl+Shift+!").unwrap()).unwrap();
        let expected = HotKey::new(
            Some(HookModifiers::CONTROL | HookModifiers::SHIFT),
            Code::Digit1,
        );
        assert_eq!(hotkey.id(), expected.id());
    }

    #[test]
    fn test_unmappable_character_rejected() {
        let combo = parse_combination("Ctrl+!").unwrap();
        assert!(matches!(to_hotkey(&combo), Err(HostError::Rejected(_))));
    }

    #[test]
    fn test_unavailable_before_start() {
        let queue = HotkeyQueue::new();
        let mut host = GlobalHookHost::new(Arc::new(queue.notifier()));
        assert!(!host.is_ready());
        let combo = parse_combination("Ctrl+Shift+F1").unwrap();
        assert!(matches!(
            host.activate("ai_add_event", &combo),
            Err(HostError::Unavailable(_))
        ));
        assert!(host.deactivate("ai_add_event", &combo).is_ok());
    }
}
