//! Tracks which physical keys are held down, fed by crossterm key events.
//!
//! Terminals only report key releases when the keyboard enhancement
//! protocol is active. Without it a press is shown for `hold` and then
//! dropped on the next [`PressedKeys::expire`].

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::layout::{KeyId, KeyMap};

pub const DEFAULT_HOLD: Duration = Duration::from_millis(150);

/// Physical key behind a terminal key code, if the layout knows it.
pub fn key_id_for(code: &KeyCode, keymap: &KeyMap) -> Option<KeyId> {
    match code {
        KeyCode::Char(c) => keymap.lookup(*c),
        KeyCode::Backspace => Some(KeyId::BACKSPACE),
        KeyCode::Enter => Some(KeyId::ENTER),
        KeyCode::Tab | KeyCode::BackTab => Some(KeyId::TAB),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct PressedKeys {
    held: HashMap<KeyId, Instant>,
    snapshot: HashSet<KeyId>,
    hold: Duration,
    reports_release: bool,
}

impl PressedKeys {
    pub fn new(hold: Duration, reports_release: bool) -> Self {
        Self {
            held: HashMap::new(),
            snapshot: HashSet::new(),
            hold,
            reports_release,
        }
    }

    pub fn press_at(&mut self, key: KeyId, now: Instant) {
        self.held.insert(key, now);
        self.snapshot.insert(key);
    }

    pub fn release(&mut self, key: KeyId) {
        self.held.remove(&key);
        self.snapshot.remove(&key);
    }

    pub fn on_key_event(&mut self, event: &KeyEvent, keymap: &KeyMap) {
        self.on_key_event_at(event, keymap, Instant::now());
    }

    pub fn on_key_event_at(&mut self, event: &KeyEvent, keymap: &KeyMap, now: Instant) {
        let Some(key) = key_id_for(&event.code, keymap) else {
            return;
        };

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press_at(key, now),
            KeyEventKind::Release => self.release(key),
        }
    }

    /// Drops presses older than the hold window when no release events
    /// arrive. Returns true if the set changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.reports_release {
            return false;
        }

        let hold = self.hold;
        let before = self.held.len();
        self.held
            .retain(|_, pressed_at| now.saturating_duration_since(*pressed_at) < hold);

        if self.held.len() == before {
            return false;
        }
        self.snapshot = self.held.keys().copied().collect();
        true
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.snapshot.clear();
    }

    /// Keys currently held down.
    pub fn snapshot(&self) -> &HashSet<KeyId> {
        &self.snapshot
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.snapshot.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

impl Default for PressedKeys {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD, false)
    }
}
