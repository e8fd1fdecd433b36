//! Modifier key flag extraction for macOS.
//!
//! Only the four shortcut modifiers are tracked. Caps Lock, fn, the numeric-pad bit and the
//! left/right device bits are dropped, so two events compare equal when a menu would show the
//! same modifier glyphs for them.

use std::fmt;
use std::ops::BitOr;

// Standard modifier flags from CGEvent
pub const CG_EVENT_FLAG_MASK_SHIFT: u64 = 0x00020000;
pub const CG_EVENT_FLAG_MASK_CONTROL: u64 = 0x00040000;
pub const CG_EVENT_FLAG_MASK_ALTERNATE: u64 = 0x00080000;
pub const CG_EVENT_FLAG_MASK_COMMAND: u64 = 0x00100000;
pub const CG_EVENT_FLAG_MASK_SECONDARY_FN: u64 = 0x00800000;

/// Set of held shortcut modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const NONE: ModifierSet = ModifierSet(0);
    pub const COMMAND: ModifierSet = ModifierSet(1 << 0);
    pub const OPTION: ModifierSet = ModifierSet(1 << 1);
    pub const CONTROL: ModifierSet = ModifierSet(1 << 2);
    pub const SHIFT: ModifierSet = ModifierSet(1 << 3);

    pub const fn union(self, other: ModifierSet) -> ModifierSet {
        ModifierSet(self.0 | other.0)
    }

    pub const fn contains(self, other: ModifierSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Extract the shortcut modifiers from raw CGEventFlags bits
    pub fn from_cg_flags(flags_raw: u64) -> Self {
        let mut set = ModifierSet::NONE;
        if flags_raw & CG_EVENT_FLAG_MASK_COMMAND != 0 {
            set = set.union(ModifierSet::COMMAND);
        }
        if flags_raw & CG_EVENT_FLAG_MASK_ALTERNATE != 0 {
            set = set.union(ModifierSet::OPTION);
        }
        if flags_raw & CG_EVENT_FLAG_MASK_CONTROL != 0 {
            set = set.union(ModifierSet::CONTROL);
        }
        if flags_raw & CG_EVENT_FLAG_MASK_SHIFT != 0 {
            set = set.union(ModifierSet::SHIFT);
        }
        set
    }

    /// Raw CGEventFlags bits for synthesized events
    pub fn to_cg_flags(self) -> u64 {
        let mut flags = 0;
        if self.contains(ModifierSet::COMMAND) {
            flags |= CG_EVENT_FLAG_MASK_COMMAND;
        }
        if self.contains(ModifierSet::OPTION) {
            flags |= CG_EVENT_FLAG_MASK_ALTERNATE;
        }
        if self.contains(ModifierSet::CONTROL) {
            flags |= CG_EVENT_FLAG_MASK_CONTROL;
        }
        if self.contains(ModifierSet::SHIFT) {
            flags |= CG_EVENT_FLAG_MASK_SHIFT;
        }
        flags
    }
}

impl BitOr for ModifierSet {
    type Output = ModifierSet;

    fn bitor(self, rhs: ModifierSet) -> ModifierSet {
        self.union(rhs)
    }
}

impl fmt::Display for ModifierSet {
    /// Menu glyph order: ⌃⌥⇧⌘
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(ModifierSet::CONTROL) {
            f.write_str("⌃")?;
        }
        if self.contains(ModifierSet::OPTION) {
            f.write_str("⌥")?;
        }
        if self.contains(ModifierSet::SHIFT) {
            f.write_str("⇧")?;
        }
        if self.contains(ModifierSet::COMMAND) {
            f.write_str("⌘")?;
        }
        Ok(())
    }
}
