//! Type definitions for keyboard capture.

use super::modifiers::ModifierSet;

/// A key-down event as seen by the cut-mode state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// The key code (CGKeyCode)
    pub key_code: u16,
    /// Shortcut modifiers held with the key
    pub modifiers: ModifierSet,
}

impl KeyInput {
    pub const fn new(key_code: u16, modifiers: ModifierSet) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// Build from the raw keycode field and CGEventFlags bits of a tapped event
    pub fn from_cg(key_code: i64, flags_raw: u64) -> Self {
        Self {
            key_code: key_code as u16,
            modifiers: ModifierSet::from_cg_flags(flags_raw),
        }
    }
}
