//! Key combination parser.
//!
//! Parses human-readable hotkey strings like "Ctrl + Shift + F1" into [`KeyCombo`] values.
//! Parsing is whitespace tolerant and case-insensitive, and modifier order does not matter:
//! "ctrl+shift+f1", "Shift+Ctrl+F1" and "Ctrl + Shift + F1" all produce the same combo.
//! Physical key codes are supported for layout-independent bindings (e.g., "Ctrl+[KeyZ]").

use crate::platform::{parse_named_key, parse_physical_key_code};
use std::fmt;
use thiserror::Error;
use winit::keyboard::{KeyCode, NamedKey};

/// Error type for key combination parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or whitespace only.
    #[error("empty key combination")]
    Empty,
    /// Two `+` separators with nothing between them.
    #[error("empty token in key combination '{0}'")]
    EmptyToken(String),
    /// Only modifiers were given, or the combination ends with `+`.
    #[error("no key specified in '{0}'")]
    MissingKey(String),
    /// More than one non-modifier token was given.
    #[error("multiple keys specified: already have '{first}', found '{second}'")]
    MultipleKeys { first: String, second: String },
    /// A token is neither a known modifier nor a known key.
    #[error("unknown key: '{0}'")]
    UnknownKey(String),
    /// A `[...]` token names an unknown physical key code.
    #[error("unknown physical key code: '{0}'")]
    UnknownPhysicalKey(String),
}

/// Set of active modifiers for a key combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    /// If true, this represents CmdOrCtrl (Cmd on macOS, Ctrl elsewhere)
    pub cmd_or_ctrl: bool,
}

impl Modifiers {
    /// True when no modifier is set.
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.super_key || self.cmd_or_ctrl)
    }

    /// True when a modifier that changes what a printable key types is set.
    ///
    /// Shift alone does not count: Shift+A still types a character.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.super_key || self.cmd_or_ctrl
    }
}

/// A parsed key combination (modifiers + key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl KeyCombo {
    /// Build a combo from parts.
    pub fn new(modifiers: Modifiers, key: ParsedKey) -> Self {
        Self { modifiers, key }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in Modifier::CANONICAL_ORDER {
            if modifier.is_set(&self.modifiers) {
                write!(f, "{}+", modifier.name())?;
            }
        }
        match &self.key {
            ParsedKey::Character(c) => write!(f, "{}", c),
            ParsedKey::Named(n) => write!(f, "{:?}", n),
            ParsedKey::Physical(k) => write!(f, "[{:?}]", k),
        }
    }
}

impl std::str::FromStr for KeyCombo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_combination(s)
    }
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key (e.g., 'A', '1'), stored uppercased
    Character(char),
    /// A named key (e.g., F1, Enter, Escape)
    Named(NamedKey),
    /// A physical key code (e.g., KeyZ, KeyA) for layout-independent bindings.
    /// This matches by key position rather than character produced.
    Physical(KeyCode),
}

/// One modifier token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    CmdOrCtrl,
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    /// Order used by the normalized text form.
    const CANONICAL_ORDER: [Modifier; 5] = [
        Modifier::CmdOrCtrl,
        Modifier::Ctrl,
        Modifier::Alt,
        Modifier::Shift,
        Modifier::Super,
    ];

    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "super" | "cmd" | "command" | "meta" | "win" => Some(Modifier::Super),
            "cmdorctrl" => Some(Modifier::CmdOrCtrl),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Modifier::CmdOrCtrl => "CmdOrCtrl",
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }

    fn flag(self, modifiers: &mut Modifiers) -> &mut bool {
        match self {
            Modifier::CmdOrCtrl => &mut modifiers.cmd_or_ctrl,
            Modifier::Ctrl => &mut modifiers.ctrl,
            Modifier::Alt => &mut modifiers.alt,
            Modifier::Shift => &mut modifiers.shift,
            Modifier::Super => &mut modifiers.super_key,
        }
    }

    fn is_set(self, modifiers: &Modifiers) -> bool {
        match self {
            Modifier::CmdOrCtrl => modifiers.cmd_or_ctrl,
            Modifier::Ctrl => modifiers.ctrl,
            Modifier::Alt => modifiers.alt,
            Modifier::Shift => modifiers.shift,
            Modifier::Super => modifiers.super_key,
        }
    }
}

/// Parse a hotkey string such as `"Ctrl + Shift + F1"` into a [`KeyCombo`].
///
/// Tokens are joined by `+`, with optional whitespace around each one, and
/// may come in any order and case. Exactly one token must be a key.
///
/// Modifiers: `Ctrl`/`Control`, `Alt`/`Option`, `Shift`,
/// `Super`/`Cmd`/`Command`/`Meta`/`Win`, and `CmdOrCtrl` (Cmd on macOS,
/// Ctrl elsewhere).
///
/// Keys: a single printable character, a named key (`F1`-`F12`, `Enter`,
/// `Esc`, `PgUp`, arrows, ...) or a physical key code in brackets (`[KeyZ]`).
pub fn parse_combination(s: &str) -> Result<KeyCombo, ParseError> {
    let text = s.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let tokens: Vec<&str> = text.split('+').map(str::trim).collect();
    let last = tokens.len() - 1;

    let mut modifiers = Modifiers::default();
    let mut key_token: Option<&str> = None;

    for (i, &token) in tokens.iter().enumerate() {
        if token.is_empty() {
            // "ctrl+" has no key; "ctrl++a" has a hole
            return Err(if i == last {
                ParseError::MissingKey(text.to_string())
            } else {
                ParseError::EmptyToken(text.to_string())
            });
        }

        if let Some(modifier) = Modifier::from_token(token) {
            *modifier.flag(&mut modifiers) = true;
            continue;
        }

        if let Some(first) = key_token.replace(token) {
            return Err(ParseError::MultipleKeys {
                first: first.to_string(),
                second: token.to_string(),
            });
        }
    }

    let key_token = key_token.ok_or_else(|| ParseError::MissingKey(text.to_string()))?;
    Ok(KeyCombo::new(modifiers, parse_key(key_token)?))
}

/// Parse the single key token of a combination.
fn parse_key(token: &str) -> Result<ParsedKey, ParseError> {
    if let Some(code_name) = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let code_name = code_name.trim();
        return parse_physical_key_code(code_name)
            .map(ParsedKey::Physical)
            .ok_or_else(|| ParseError::UnknownPhysicalKey(code_name.to_string()));
    }

    // Named keys first so "F1" is never read as a character
    if let Some(named) = parse_named_key(token) {
        return Ok(ParsedKey::Named(named));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_graphic() => Ok(ParsedKey::Character(c.to_ascii_uppercase())),
        _ => Err(ParseError::UnknownKey(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_key() {
        let combo = parse_combination("A").unwrap();
        assert!(combo.modifiers.is_empty());
        assert_eq!(combo.key, ParsedKey::Character('A'));
    }

    #[test]
    fn test_ctrl_shift_function_key() {
        let combo = parse_combination("Ctrl+Shift+F1").unwrap();
        assert!(combo.modifiers.ctrl);
        assert!(combo.modifiers.shift);
        assert!(!combo.modifiers.alt);
        assert_eq!(combo.key, ParsedKey::Named(NamedKey::F1));
    }

    #[test]
    fn test_whitespace_and_case_normalize() {
        let compact = parse_combination("ctrl+shift+f1").unwrap();
        let spaced = parse_combination("Ctrl + Shift + F1").unwrap();
        let padded = parse_combination("  CTRL +shift+ F1 ").unwrap();
        assert_eq!(compact, spaced);
        assert_eq!(compact, padded);
    }

    #[test]
    fn test_modifier_order_normalizes() {
        let a = parse_combination("Shift+Alt+Ctrl+K").unwrap();
        let b = parse_combination("ctrl+alt+shift+k").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Ctrl+Alt+Shift+K");
    }

    #[test]
    fn test_cmd_or_ctrl() {
        let combo = parse_combination("CmdOrCtrl+Shift+B").unwrap();
        assert!(combo.modifiers.cmd_or_ctrl);
        assert!(combo.modifiers.shift);
        assert!(!combo.modifiers.ctrl);
        assert_eq!(combo.key, ParsedKey::Character('B'));
    }

    #[test]
    fn test_modifier_aliases() {
        assert!(parse_combination("Control+A").unwrap().modifiers.ctrl);
        assert!(parse_combination("Option+A").unwrap().modifiers.alt);
        assert!(parse_combination("Cmd+A").unwrap().modifiers.super_key);
        assert!(parse_combination("Win+A").unwrap().modifiers.super_key);
        assert!(parse_combination("Meta+A").unwrap().modifiers.super_key);
    }

    #[test]
    fn test_named_key_aliases() {
        let combo = parse_combination("Ctrl+Return").unwrap();
        assert_eq!(combo.key, ParsedKey::Named(NamedKey::Enter));

        let combo = parse_combination("Esc").unwrap();
        assert_eq!(combo.key, ParsedKey::Named(NamedKey::Escape));

        let combo = parse_combination("Alt+PgUp").unwrap();
        assert_eq!(combo.key, ParsedKey::Named(NamedKey::PageUp));
    }

    #[test]
    fn test_digit_key() {
        let combo = parse_combination("ctrl+1").unwrap();
        assert!(combo.modifiers.ctrl);
        assert_eq!(combo.key, ParsedKey::Character('1'));
    }

    #[test]
    fn test_invalid_empty() {
        assert_eq!(parse_combination(""), Err(ParseError::Empty));
        assert_eq!(parse_combination("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_invalid_trailing_plus() {
        assert!(matches!(
            parse_combination("ctrl+"),
            Err(ParseError::MissingKey(_))
        ));
    }

    #[test]
    fn test_invalid_modifier_only() {
        assert!(matches!(
            parse_combination("Ctrl+Shift"),
            Err(ParseError::MissingKey(_))
        ));
    }

    #[test]
    fn test_invalid_empty_token() {
        assert!(matches!(
            parse_combination("Ctrl++A"),
            Err(ParseError::EmptyToken(_))
        ));
    }

    #[test]
    fn test_invalid_unknown_key() {
        assert_eq!(
            parse_combination("not-a-key"),
            Err(ParseError::UnknownKey("not-a-key".to_string()))
        );
        assert!(parse_combination("Ctrl+UnknownKey").is_err());
    }

    #[test]
    fn test_invalid_multiple_keys() {
        assert!(matches!(
            parse_combination("Ctrl+A+B"),
            Err(ParseError::MultipleKeys { .. })
        ));
    }

    #[test]
    fn test_physical_key() {
        let combo = parse_combination("Ctrl+[KeyZ]").unwrap();
        assert!(combo.modifiers.ctrl);
        assert_eq!(combo.key, ParsedKey::Physical(KeyCode::KeyZ));
        assert_eq!(combo.to_string(), "Ctrl+[KeyZ]");
    }

    #[test]
    fn test_invalid_physical_key() {
        assert_eq!(
            parse_combination("Ctrl+[Unknown]"),
            Err(ParseError::UnknownPhysicalKey("Unknown".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["Ctrl+Shift+F1", "Alt+ArrowUp", "CmdOrCtrl+Super+[Digit3]", "Ctrl+/"] {
            let combo = parse_combination(text).unwrap();
            let reparsed: KeyCombo = combo.to_string().parse().unwrap();
            assert_eq!(combo, reparsed, "display form of {text} must reparse");
        }
    }
}
