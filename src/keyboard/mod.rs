// Keyboard synthesis - posts the replacement shortcuts chosen by the cut-mode state machine
// Uses Core Graphics on macOS so synthesized events carry a marker the event tap can recognize

use crate::cut_mode::Keystroke;

#[cfg(target_os = "macos")]
mod synth;

#[cfg(target_os = "macos")]
pub use synth::CgEventSynthesizer;

/// Value stamped into the event source user-data field of every synthesized event.
///
/// The event tap passes events carrying this marker through without evaluating them,
/// so a synthesized ⌘C or ⌘⌥V can never re-trigger cut mode.
pub const SYNTHETIC_EVENT_MARKER: i64 = 0x4643_4c50; // "FCLP"

/// Posts a keystroke (key-down followed by key-up) into the system event stream.
///
/// Called from the event tap callback, so implementations must not block, sleep, or
/// take locks. Failures are dropped silently.
pub trait EventSynthesizer: Send + Sync {
    fn emit(&self, stroke: Keystroke);
}
