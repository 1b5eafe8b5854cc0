//! Key name tables and platform-specific resolution.
//!
//! Contains:
//! - `CmdOrCtrl` expansion (Cmd on macOS, Ctrl elsewhere)
//! - The US QWERTY table linking physical key codes to the characters they
//!   type, used for layout-independent matching and for hosts that register
//!   by scan code
//! - Name tables for named keys and physical key codes

use winit::keyboard::{KeyCode, NamedKey};

/// Physical key, the character it types on US QWERTY, and its code name.
const QWERTY_KEYS: &[(KeyCode, char, &str)] = &[
    (KeyCode::KeyA, 'A', "keya"),
    (KeyCode::KeyB, 'B', "keyb"),
    (KeyCode::KeyC, 'C', "keyc"),
    (KeyCode::KeyD, 'D', "keyd"),
    (KeyCode::KeyE, 'E', "keye"),
    (KeyCode::KeyF, 'F', "keyf"),
    (KeyCode::KeyG, 'G', "keyg"),
    (KeyCode::KeyH, 'H', "keyh"),
    (KeyCode::KeyI, 'I', "keyi"),
    (KeyCode::KeyJ, 'J', "keyj"),
    (KeyCode::KeyK, 'K', "keyk"),
    (KeyCode::KeyL, 'L', "keyl"),
    (KeyCode::KeyM, 'M', "keym"),
    (KeyCode::KeyN, 'N', "keyn"),
    (KeyCode::KeyO, 'O', "keyo"),
    (KeyCode::KeyP, 'P', "keyp"),
    (KeyCode::KeyQ, 'Q', "keyq"),
    (KeyCode::KeyR, 'R', "keyr"),
    (KeyCode::KeyS, 'S', "keys"),
    (KeyCode::KeyT, 'T', "keyt"),
    (KeyCode::KeyU, 'U', "keyu"),
    (KeyCode::KeyV, 'V', "keyv"),
    (KeyCode::KeyW, 'W', "keyw"),
    (KeyCode::KeyX, 'X', "keyx"),
    (KeyCode::KeyY, 'Y', "keyy"),
    (KeyCode::KeyZ, 'Z', "keyz"),
    (KeyCode::Digit0, '0', "digit0"),
    (KeyCode::Digit1, '1', "digit1"),
    (KeyCode::Digit2, '2', "digit2"),
    (KeyCode::Digit3, '3', "digit3"),
    (KeyCode::Digit4, '4', "digit4"),
    (KeyCode::Digit5, '5', "digit5"),
    (KeyCode::Digit6, '6', "digit6"),
    (KeyCode::Digit7, '7', "digit7"),
    (KeyCode::Digit8, '8', "digit8"),
    (KeyCode::Digit9, '9', "digit9"),
    (KeyCode::Minus, '-', "minus"),
    (KeyCode::Equal, '=', "equal"),
    (KeyCode::BracketLeft, '[', "bracketleft"),
    (KeyCode::BracketRight, ']', "bracketright"),
    (KeyCode::Backslash, '\\', "backslash"),
    (KeyCode::Semicolon, ';', "semicolon"),
    (KeyCode::Quote, '\'', "quote"),
    (KeyCode::Backquote, '`', "backquote"),
    (KeyCode::Comma, ',', "comma"),
    (KeyCode::Period, '.', "period"),
    (KeyCode::Slash, '/', "slash"),
];

/// Symbols typed with Shift held on US QWERTY.
const SHIFTED_SYMBOLS: &[(KeyCode, char)] = &[
    (KeyCode::Digit1, '!'),
    (KeyCode::Digit2, '@'),
    (KeyCode::Digit3, '#'),
    (KeyCode::Digit4, '$'),
    (KeyCode::Digit5, '%'),
    (KeyCode::Digit6, '^'),
    (KeyCode::Digit7, '&'),
    (KeyCode::Digit8, '*'),
    (KeyCode::Digit9, '('),
    (KeyCode::Digit0, ')'),
    (KeyCode::Minus, '_'),
    (KeyCode::Equal, '+'),
    (KeyCode::BracketLeft, '{'),
    (KeyCode::BracketRight, '}'),
    (KeyCode::Backslash, '|'),
    (KeyCode::Semicolon, ':'),
    (KeyCode::Quote, '"'),
    (KeyCode::Backquote, '~'),
    (KeyCode::Comma, '<'),
    (KeyCode::Period, '>'),
    (KeyCode::Slash, '?'),
];

/// Physical keys that do not type a character.
const NON_CHARACTER_CODES: &[(&str, KeyCode)] = &[
    ("f1", KeyCode::F1),
    ("f2", KeyCode::F2),
    ("f3", KeyCode::F3),
    ("f4", KeyCode::F4),
    ("f5", KeyCode::F5),
    ("f6", KeyCode::F6),
    ("f7", KeyCode::F7),
    ("f8", KeyCode::F8),
    ("f9", KeyCode::F9),
    ("f10", KeyCode::F10),
    ("f11", KeyCode::F11),
    ("f12", KeyCode::F12),
    ("arrowup", KeyCode::ArrowUp),
    ("arrowdown", KeyCode::ArrowDown),
    ("arrowleft", KeyCode::ArrowLeft),
    ("arrowright", KeyCode::ArrowRight),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("insert", KeyCode::Insert),
    ("delete", KeyCode::Delete),
    ("enter", KeyCode::Enter),
    ("escape", KeyCode::Escape),
    ("space", KeyCode::Space),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
];

/// Named key spellings, aliases included.
const NAMED_KEYS: &[(&str, NamedKey)] = &[
    ("f1", NamedKey::F1),
    ("f2", NamedKey::F2),
    ("f3", NamedKey::F3),
    ("f4", NamedKey::F4),
    ("f5", NamedKey::F5),
    ("f6", NamedKey::F6),
    ("f7", NamedKey::F7),
    ("f8", NamedKey::F8),
    ("f9", NamedKey::F9),
    ("f10", NamedKey::F10),
    ("f11", NamedKey::F11),
    ("f12", NamedKey::F12),
    ("enter", NamedKey::Enter),
    ("return", NamedKey::Enter),
    ("escape", NamedKey::Escape),
    ("esc", NamedKey::Escape),
    ("space", NamedKey::Space),
    ("tab", NamedKey::Tab),
    ("backspace", NamedKey::Backspace),
    ("delete", NamedKey::Delete),
    ("del", NamedKey::Delete),
    ("insert", NamedKey::Insert),
    ("ins", NamedKey::Insert),
    ("home", NamedKey::Home),
    ("end", NamedKey::End),
    ("pageup", NamedKey::PageUp),
    ("pgup", NamedKey::PageUp),
    ("pagedown", NamedKey::PageDown),
    ("pgdn", NamedKey::PageDown),
    ("up", NamedKey::ArrowUp),
    ("arrowup", NamedKey::ArrowUp),
    ("down", NamedKey::ArrowDown),
    ("arrowdown", NamedKey::ArrowDown),
    ("left", NamedKey::ArrowLeft),
    ("arrowleft", NamedKey::ArrowLeft),
    ("right", NamedKey::ArrowRight),
    ("arrowright", NamedKey::ArrowRight),
];

/// Resolve the `CmdOrCtrl` modifier for the current platform.
///
/// Returns `(expected_ctrl, expected_super)` for a combo's `cmd_or_ctrl`,
/// `ctrl` and `super_key` flags. On macOS `CmdOrCtrl` means Super (Cmd);
/// everywhere else it means Ctrl.
#[inline]
pub fn resolve_cmd_or_ctrl(cmd_or_ctrl: bool, ctrl: bool, super_key: bool) -> (bool, bool) {
    if !cmd_or_ctrl {
        return (ctrl, super_key);
    }
    if cfg!(target_os = "macos") {
        (ctrl, true)
    } else {
        (true, super_key)
    }
}

/// Whether `code` types `ch` on a US QWERTY layout (letters case-insensitive).
pub fn physical_key_matches_char(code: KeyCode, ch: char) -> bool {
    QWERTY_KEYS
        .iter()
        .any(|&(c, typed, _)| c == code && typed.eq_ignore_ascii_case(&ch))
}

/// The physical key that types `ch` on a US QWERTY layout.
pub fn qwerty_key_code_for_char(ch: char) -> Option<KeyCode> {
    let ch = ch.to_ascii_uppercase();
    QWERTY_KEYS
        .iter()
        .find(|&&(_, typed, _)| typed == ch)
        .map(|&(code, _, _)| code)
}

/// The physical key pressed to type `ch` on US QWERTY, given whether Shift
/// is held. Shifted symbols such as `!` only resolve with `shift` set.
pub fn qwerty_position(ch: char, shift: bool) -> Option<KeyCode> {
    qwerty_key_code_for_char(ch).or_else(|| {
        shift
            .then(|| SHIFTED_SYMBOLS.iter().find(|&&(_, typed)| typed == ch))
            .flatten()
            .map(|&(code, _)| code)
    })
}

/// Parse a named key such as `"Enter"`, `"Esc"`, `"PgUp"` or `"F7"`.
///
/// Case-insensitive. Returns `None` for unrecognised names.
pub fn parse_named_key(s: &str) -> Option<NamedKey> {
    let s = s.to_ascii_lowercase();
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == s)
        .map(|&(_, key)| key)
}

/// Parse a physical key code name such as `"KeyZ"`, `"Digit0"` or `"F1"`.
///
/// Case-insensitive. Returns `None` for unrecognised names.
pub fn parse_physical_key_code(s: &str) -> Option<KeyCode> {
    let s = s.to_ascii_lowercase();
    QWERTY_KEYS
        .iter()
        .find(|(_, _, name)| *name == s)
        .map(|&(code, _, _)| code)
        .or_else(|| {
            NON_CHARACTER_CODES
                .iter()
                .find(|(name, _)| *name == s)
                .map(|&(_, code)| code)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_or_ctrl_resolution() {
        #[cfg(not(target_os = "macos"))]
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (true, false));
        #[cfg(target_os = "macos")]
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (false, true));

        assert_eq!(resolve_cmd_or_ctrl(false, true, false), (true, false));
    }

    #[test]
    fn test_qwerty_mapping_is_inverse_of_match() {
        for ch in "ABCXYZ0189-=[];',./`\\".chars() {
            let code = qwerty_key_code_for_char(ch).expect("mapped character");
            assert!(physical_key_matches_char(code, ch), "{ch} should map back");
        }
        assert_eq!(qwerty_key_code_for_char('q'), Some(KeyCode::KeyQ));
        assert_eq!(qwerty_key_code_for_char('!'), None);
        assert!(!physical_key_matches_char(KeyCode::F1, '1'));
    }

    #[test]
    fn test_shifted_symbols_resolve_only_with_shift() {
        assert_eq!(qwerty_position('!', true), Some(KeyCode::Digit1));
        assert_eq!(qwerty_position('?', true), Some(KeyCode::Slash));
        assert_eq!(qwerty_position('!', false), None);
        assert_eq!(qwerty_position('1', true), Some(KeyCode::Digit1));
        assert_eq!(qwerty_position('k', false), Some(KeyCode::KeyK));
    }

    #[test]
    fn test_named_key_aliases() {
        assert_eq!(parse_named_key("PgDn"), Some(NamedKey::PageDown));
        assert_eq!(parse_named_key("left"), Some(NamedKey::ArrowLeft));
        assert_eq!(parse_named_key("RETURN"), Some(NamedKey::Enter));
        assert_eq!(parse_named_key("F13"), None);
    }

    #[test]
    fn test_physical_code_names() {
        assert_eq!(parse_physical_key_code("DIGIT7"), Some(KeyCode::Digit7));
        assert_eq!(parse_physical_key_code("bracketleft"), Some(KeyCode::BracketLeft));
        assert_eq!(parse_physical_key_code("F12"), Some(KeyCode::F12));
        assert_eq!(parse_physical_key_code("numpad1"), None);
    }

    #[test]
    fn test_every_named_key_round_trips_through_debug_name() {
        // KeyCombo displays named keys by their Debug name; it must parse back
        for &(_, key) in NAMED_KEYS {
            assert_eq!(parse_named_key(&format!("{:?}", key)), Some(key));
        }
    }
}
