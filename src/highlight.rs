use std::collections::{HashMap, HashSet};

use crate::layout::{KeyDef, KeyId, TURKISH_F_LAYOUT};

/// How a single key should be drawn. Both flags can be set at once; the
/// renderer picks which one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyHighlight {
    pub is_target: bool,
    pub is_pressed: bool,
}

/// Flags every key of the Turkish F layout against the target key and the
/// keys currently held down.
pub fn resolve_key_highlight(
    target: Option<KeyId>,
    pressed: &HashSet<KeyId>,
) -> HashMap<KeyId, KeyHighlight> {
    resolve_in_layout(TURKISH_F_LAYOUT, target, pressed)
}

pub fn resolve_in_layout(
    layout: &[&[KeyDef]],
    target: Option<KeyId>,
    pressed: &HashSet<KeyId>,
) -> HashMap<KeyId, KeyHighlight> {
    layout
        .iter()
        .flat_map(|row| row.iter())
        .map(|key| {
            (
                key.code,
                KeyHighlight {
                    is_target: target == Some(key.code),
                    is_pressed: pressed.contains(&key.code),
                },
            )
        })
        .collect()
}
