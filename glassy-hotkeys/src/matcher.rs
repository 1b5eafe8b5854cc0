//! Key event matching.
//!
//! Matches winit key events against parsed [`KeyCombo`]s.
//! Supports both logical key matching (character-based) and physical key matching
//! (scan code-based) for layout-independent bindings.

use crate::parser::{KeyCombo, Modifiers, ParsedKey};
use crate::platform::{physical_key_matches_char, resolve_cmd_or_ctrl};
use winit::event::{ElementState, KeyEvent, Modifiers as WinitModifiers};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

/// Normalized key for matching purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrokeKey {
    Character(char),
    Named(NamedKey),
}

/// A single observed key press, normalized for matching against hotkeys.
///
/// Built from a winit [`KeyEvent`] on the GUI thread, or directly via
/// [`KeyStroke::new`] when simulating input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    /// Active modifiers at the time of the press
    modifiers: Modifiers,
    /// The logical key
    key: Option<StrokeKey>,
    /// The physical key code (for layout-independent matching)
    physical_key: Option<KeyCode>,
}

impl KeyStroke {
    /// Build a stroke from its parts.
    pub fn new(modifiers: Modifiers, key: Option<StrokeKey>, physical_key: Option<KeyCode>) -> Self {
        Self {
            modifiers: Modifiers {
                cmd_or_ctrl: false,
                ..modifiers
            },
            key: key.map(|k| match k {
                StrokeKey::Character(c) => StrokeKey::Character(c.to_ascii_uppercase()),
                named => named,
            }),
            physical_key,
        }
    }

    /// Build the stroke a user would produce by physically pressing `combo`
    /// on a US QWERTY layout.
    ///
    /// `CmdOrCtrl` resolves to the platform modifier. Used for simulating input.
    pub fn from_combo(combo: &KeyCombo) -> Self {
        let (ctrl, super_key) = resolve_cmd_or_ctrl(
            combo.modifiers.cmd_or_ctrl,
            combo.modifiers.ctrl,
            combo.modifiers.super_key,
        );
        let modifiers = Modifiers {
            ctrl,
            alt: combo.modifiers.alt,
            shift: combo.modifiers.shift,
            super_key,
            cmd_or_ctrl: false,
        };

        let (key, physical_key) = match &combo.key {
            ParsedKey::Character(c) => (
                Some(StrokeKey::Character(*c)),
                crate::platform::qwerty_key_code_for_char(*c),
            ),
            ParsedKey::Named(n) => (Some(StrokeKey::Named(*n)), None),
            ParsedKey::Physical(code) => (None, Some(*code)),
        };

        Self::new(modifiers, key, physical_key)
    }

    /// Create a stroke from a winit key event.
    ///
    /// Returns `None` for key releases and auto-repeats so a held combination
    /// fires once per physical press.
    pub fn from_press(event: &KeyEvent, modifiers: &WinitModifiers) -> Option<Self> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        Some(Self::from_event(event, modifiers))
    }

    /// Create a stroke from a winit key event regardless of its state.
    pub fn from_event(event: &KeyEvent, modifiers: &WinitModifiers) -> Self {
        let mods = Modifiers {
            ctrl: modifiers.state().control_key(),
            alt: modifiers.state().alt_key(),
            shift: modifiers.state().shift_key(),
            super_key: modifiers.state().super_key(),
            cmd_or_ctrl: false, // Resolved during matching
        };

        let key = match &event.logical_key {
            Key::Character(c) => c.chars().next().map(StrokeKey::Character),
            Key::Named(named) => Some(StrokeKey::Named(*named)),
            _ => None,
        };

        let physical_key = match event.physical_key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        };

        Self::new(mods, key, physical_key)
    }

    /// Modifiers held during this stroke.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The logical key of this stroke, if any.
    pub fn key(&self) -> Option<&StrokeKey> {
        self.key.as_ref()
    }

    /// Whether this stroke triggers `combo`.
    ///
    /// Character bindings compare the typed character. With Shift held they
    /// also accept the key's QWERTY position, so `Ctrl+Shift+1` still matches
    /// when Shift turns the typed character into `!`.
    pub fn matches(&self, combo: &KeyCombo) -> bool {
        self.matches_with_physical_preference(combo, false)
    }

    /// Like [`KeyStroke::matches`], but with `use_physical_keys` set a
    /// character binding is decided by key position alone when the position is
    /// known, which keeps bindings stable across keyboard layouts.
    fn matches_with_physical_preference(
        &self,
        combo: &KeyCombo,
        use_physical_keys: bool,
    ) -> bool {
        self.modifiers_match(&combo.modifiers) && self.key_matches(&combo.key, use_physical_keys)
    }

    fn key_matches(&self, key: &ParsedKey, use_physical_keys: bool) -> bool {
        let typed = match &self.key {
            Some(StrokeKey::Character(c)) => Some(*c),
            _ => None,
        };
        let by_position = |ch: char| {
            self.physical_key
                .is_some_and(|code| physical_key_matches_char(code, ch))
        };

        match key {
            ParsedKey::Physical(code) => self.physical_key == Some(*code),
            ParsedKey::Named(named) => self.key == Some(StrokeKey::Named(*named)),
            ParsedKey::Character(ch) if use_physical_keys && self.physical_key.is_some() => {
                by_position(*ch)
            }
            ParsedKey::Character(ch) => {
                typed.is_some_and(|t| t.eq_ignore_ascii_case(ch))
                    || (self.modifiers.shift && by_position(*ch))
            }
        }
    }

    /// Exact modifier comparison with `CmdOrCtrl` resolved for this platform.
    fn modifiers_match(&self, wanted: &Modifiers) -> bool {
        let (ctrl, super_key) =
            resolve_cmd_or_ctrl(wanted.cmd_or_ctrl, wanted.ctrl, wanted.super_key);
        self.modifiers
            == (Modifiers {
                ctrl,
                alt: wanted.alt,
                shift: wanted.shift,
                super_key,
                cmd_or_ctrl: false,
            })
    }
}
