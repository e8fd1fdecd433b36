// Hot-path glue between the event tap callback and the state machine
//
// `on_key_down` is the only thing the tap callback calls for a keyboard event. It decides,
// posts any replacement keystroke, and queues reports for the dispatcher thread, in that order.

use super::machine::{CutModeMachine, Verdict};
use crate::keyboard::EventSynthesizer;
use crate::keyboard_capture::KeyInput;
use crate::notifications::{CutEvent, Notifier};
use crate::settings::SharedConfig;
use crate::window_context::FocusProbe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// What the tap callback should do with the original event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Return the event to the system unchanged
    Pass,
    /// Return null so the event never reaches any application
    Consume,
}

pub struct KeyInterceptor {
    live: AtomicBool,
    machine: CutModeMachine,
    probe: Arc<dyn FocusProbe>,
    synth: Arc<dyn EventSynthesizer>,
    notifier: Notifier,
}

impl KeyInterceptor {
    pub fn new(
        config: SharedConfig,
        probe: Arc<dyn FocusProbe>,
        synth: Arc<dyn EventSynthesizer>,
        notifier: Notifier,
    ) -> Self {
        Self {
            live: AtomicBool::new(false),
            machine: CutModeMachine::new(config),
            probe,
            synth,
            notifier,
        }
    }

    /// Gate for callbacks. While not live every event passes through untouched, which covers
    /// callbacks already in flight when the tap is torn down.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn machine(&self) -> &CutModeMachine {
        &self.machine
    }

    pub fn on_key_down(&self, key: KeyInput) -> Disposition {
        self.on_key_down_at(key, Instant::now())
    }

    pub fn on_key_down_at(&self, key: KeyInput, now: Instant) -> Disposition {
        if !self.is_live() {
            return Disposition::Pass;
        }

        let decision = self.machine.decide(&key, self.probe.as_ref(), now);

        let disposition = match decision.verdict {
            Verdict::PassThrough => Disposition::Pass,
            Verdict::Consume => Disposition::Consume,
            Verdict::ConsumeAndSynthesize(stroke) => {
                self.synth.emit(stroke);
                Disposition::Consume
            }
        };

        if decision.expired {
            self.report(CutEvent::TimedOut);
        }
        if let Some(event) = decision.event {
            self.report(event);
        }

        disposition
    }

    /// Queue an event for the dispatcher thread without blocking
    pub fn report(&self, event: CutEvent) {
        self.notifier.report(event);
    }
}

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod tests;
