// Cut-mode decision core
//
// `decide` runs once per key-down on the event tap thread. It must not allocate, block, or log:
// everything observable leaves as a `Decision` the caller acts on.

use super::hotkeys::{self, Hotkey, Keystroke};
use super::state::CutArmState;
use crate::keyboard_capture::KeyInput;
use crate::notifications::CutEvent;
use crate::settings::SharedConfig;
use crate::window_context::FocusProbe;
use std::time::Instant;

/// What happens to the original key-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Deliver the event unchanged
    PassThrough,
    /// Swallow the event
    Consume,
    /// Swallow the event, then post the given keystroke in its place
    ConsumeAndSynthesize(Keystroke),
}

/// Outcome of one key-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    /// A pending cut expired before this key was matched
    pub expired: bool,
    /// Transition to report, if the key caused one
    pub event: Option<CutEvent>,
}

impl Decision {
    fn pass(expired: bool) -> Self {
        Self {
            verdict: Verdict::PassThrough,
            expired,
            event: None,
        }
    }
}

/// Idle/Armed state machine for the target application's cut and paste hotkeys
#[derive(Debug)]
pub struct CutModeMachine {
    state: CutArmState,
    config: SharedConfig,
}

impl CutModeMachine {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            state: CutArmState::new(),
            config,
        }
    }

    pub fn state(&self) -> &CutArmState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Drop any pending cut. Returns whether one was pending.
    pub fn reset(&self) -> bool {
        self.state.clear()
    }

    pub fn decide(&self, input: &KeyInput, probe: &dyn FocusProbe, now: Instant) -> Decision {
        // Staleness is checked before anything else looks at the armed flag
        let timeout = self.config.snapshot().cut_timeout;
        let expired = self.state.take_if_stale(timeout, now);

        let frontmost = match probe.frontmost_app() {
            Some(app) if app.is_target => app,
            _ => {
                let event = if self.state.clear() {
                    Some(CutEvent::FocusLost)
                } else {
                    None
                };
                return Decision {
                    verdict: Verdict::PassThrough,
                    expired,
                    event,
                };
            }
        };

        match hotkeys::classify(input) {
            Some(Hotkey::Cut) => {
                if !probe.text_edit_state(frontmost.pid).allows_cut_mode() {
                    return Decision::pass(expired);
                }
                self.state.arm(now);
                Decision {
                    verdict: Verdict::ConsumeAndSynthesize(hotkeys::COPY_EQUIVALENT),
                    expired,
                    event: Some(CutEvent::Armed),
                }
            }
            Some(Hotkey::Move) if self.state.clear() => Decision {
                verdict: Verdict::ConsumeAndSynthesize(hotkeys::MOVE_EQUIVALENT),
                expired,
                event: Some(CutEvent::Moved),
            },
            Some(Hotkey::Cancel) if self.state.clear() => Decision {
                verdict: Verdict::Consume,
                expired,
                event: Some(CutEvent::Cancelled),
            },
            _ => Decision::pass(expired),
        }
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
