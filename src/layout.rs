//! Static Turkish F keyboard layout and the character → key lookup built from it.
//!
//! Keys are identified by their physical position (`KeyF`, `Semicolon`, ...),
//! independent of the glyph printed on them.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Stable name of a physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub &'static str);

impl KeyId {
    pub const SPACE: KeyId = KeyId("Space");
    pub const BACKSPACE: KeyId = KeyId("Backspace");
    pub const TAB: KeyId = KeyId("Tab");
    pub const ENTER: KeyId = KeyId("Enter");
    pub const SHIFT_LEFT: KeyId = KeyId("ShiftLeft");
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDef {
    pub code: KeyId,
    pub label: &'static str,
    /// Modifier/control keys, drawn dimmed.
    pub special: bool,
    /// Relative width, 1.0 being a letter key.
    pub width: f32,
}

const fn key(code: &'static str, label: &'static str) -> KeyDef {
    KeyDef {
        code: KeyId(code),
        label,
        special: false,
        width: 1.0,
    }
}

const fn wide(code: &'static str, label: &'static str, width: f32) -> KeyDef {
    KeyDef {
        code: KeyId(code),
        label,
        special: false,
        width,
    }
}

const fn special(code: &'static str, label: &'static str, width: f32) -> KeyDef {
    KeyDef {
        code: KeyId(code),
        label,
        special: true,
        width,
    }
}

pub const TURKISH_F_LAYOUT: &[&[KeyDef]] = &[
    // numbers
    &[
        key("Backquote", "+"),
        key("Digit1", "1"),
        key("Digit2", "2"),
        key("Digit3", "3"),
        key("Digit4", "4"),
        key("Digit5", "5"),
        key("Digit6", "6"),
        key("Digit7", "7"),
        key("Digit8", "8"),
        key("Digit9", "9"),
        key("Digit0", "0"),
        key("Minus", "/"),
        key("Equal", "-"),
        special("Backspace", "⌫", 2.0),
    ],
    &[
        special("Tab", "Tab", 1.5),
        key("KeyQ", "F"),
        key("KeyW", "G"),
        key("KeyE", "Ğ"),
        key("KeyR", "I"),
        key("KeyT", "O"),
        key("KeyY", "D"),
        key("KeyU", "R"),
        key("KeyI", "N"),
        key("KeyO", "H"),
        key("KeyP", "P"),
        key("BracketLeft", "Q"),
        key("BracketRight", "W"),
        wide("Backslash", "X", 1.25),
    ],
    // home row
    &[
        special("CapsLock", "Cap", 1.75),
        key("KeyA", "U"),
        key("KeyS", "İ"),
        key("KeyD", "E"),
        key("KeyF", "A"),
        key("KeyG", "Ü"),
        key("KeyH", "T"),
        key("KeyJ", "K"),
        key("KeyK", "M"),
        key("KeyL", "L"),
        key("Semicolon", "Y"),
        key("Quote", "Ş"),
        special("Enter", "Enter", 2.25),
    ],
    &[
        special("ShiftLeft", "Shift", 2.25),
        key("IntlBackslash", "<"),
        key("KeyZ", "J"),
        key("KeyX", "Ö"),
        key("KeyC", "V"),
        key("KeyV", "C"),
        key("KeyB", "Ç"),
        key("KeyN", "Z"),
        key("KeyM", "S"),
        key("Comma", "B"),
        key("Period", "."),
        key("Slash", ","),
        special("ShiftRight", "Shift", 2.75),
    ],
    &[
        special("ControlLeft", "Ctrl", 1.5),
        special("AltLeft", "Alt", 1.5),
        wide("Space", "", 7.0),
        special("AltRight", "Alt", 1.5),
        special("ControlRight", "Ctrl", 1.5),
    ],
];

/// Every key of the layout, row by row.
pub fn all_keys() -> impl Iterator<Item = &'static KeyDef> {
    TURKISH_F_LAYOUT.iter().flat_map(|row| row.iter())
}

/// Uppercases a character the way a Turkish keyboard labels it.
///
/// `i` pairs with `İ` and `ı` with `I`; anything else follows Unicode rules
/// as long as the result is a single character.
pub fn fold_case(c: char) -> char {
    match c {
        'i' => 'İ',
        'ı' => 'I',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

fn fold_label(label: &str) -> String {
    label.chars().map(fold_case).collect()
}

/// Character → physical key lookup.
#[derive(Debug, Clone)]
pub struct KeyMap {
    by_label: HashMap<String, KeyId>,
}

impl KeyMap {
    pub fn from_layout(layout: &[&[KeyDef]]) -> Self {
        let mut by_label: HashMap<String, KeyId> = layout
            .iter()
            .flat_map(|row| row.iter())
            .filter(|k| !k.label.is_empty())
            .map(|k| (fold_label(k.label), k.code))
            .collect();
        // the space bar has no label
        by_label.insert(" ".to_string(), KeyId::SPACE);

        Self { by_label }
    }

    /// Key that produces `c`, if the layout has one.
    pub fn lookup(&self, c: char) -> Option<KeyId> {
        let mut buf = [0u8; 4];
        self.by_label
            .get(&*fold_case(c).encode_utf8(&mut buf))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

static TURKISH_F_KEYMAP: Lazy<KeyMap> = Lazy::new(|| KeyMap::from_layout(TURKISH_F_LAYOUT));

/// The memoized map for [`TURKISH_F_LAYOUT`].
pub fn keymap() -> &'static KeyMap {
    &TURKISH_F_KEYMAP
}
