// Shortcut definitions for cut mode

use crate::keyboard_capture::{keycodes, KeyInput, ModifierSet};
use std::fmt;

/// A key plus an exact modifier set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key_code: u16,
    pub modifiers: ModifierSet,
}

impl Keystroke {
    pub const fn new(key_code: u16, modifiers: ModifierSet) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// Exact match: no extra shortcut modifier may be held
    pub fn matches(&self, input: &KeyInput) -> bool {
        input.key_code == self.key_code && input.modifiers == self.modifiers
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.modifiers,
            keycodes::keycode_to_name(self.key_code)
        )
    }
}

/// ⌘X: marks the selection for moving
pub const CUT_HOTKEY: Keystroke = Keystroke::new(keycodes::KEY_X, ModifierSet::COMMAND);
/// ⌘V: completes a pending cut
pub const MOVE_HOTKEY: Keystroke = Keystroke::new(keycodes::KEY_V, ModifierSet::COMMAND);
/// Escape cancels a pending cut regardless of held modifiers
pub const CANCEL_KEY_CODE: u16 = keycodes::KEY_ESCAPE;

/// ⌘C: what the target app receives instead of the cut hotkey
pub const COPY_EQUIVALENT: Keystroke = Keystroke::new(keycodes::KEY_C, ModifierSet::COMMAND);
/// ⌘⌥V: the target app's "move item here"
pub const MOVE_EQUIVALENT: Keystroke = Keystroke::new(
    keycodes::KEY_V,
    ModifierSet::COMMAND.union(ModifierSet::OPTION),
);

/// Role of a key-down in cut mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    Cut,
    Move,
    Cancel,
}

pub fn classify(input: &KeyInput) -> Option<Hotkey> {
    if CUT_HOTKEY.matches(input) {
        Some(Hotkey::Cut)
    } else if MOVE_HOTKEY.matches(input) {
        Some(Hotkey::Move)
    } else if input.key_code == CANCEL_KEY_CODE {
        Some(Hotkey::Cancel)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "hotkeys_test.rs"]
mod tests;
