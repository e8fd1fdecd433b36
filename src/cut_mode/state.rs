// Pending-cut marker shared by the event tap callback and the enable/disable path

use crate::settings::CutTimeout;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const IDLE: u64 = 0;

/// Whether a cut is pending, and since when.
///
/// The armed flag and the arm timestamp live in one atomic word, so a reader can never see
/// one without the other: `0` is idle, any other value is the arm time as nanoseconds since
/// `origin`, plus one.
#[derive(Debug)]
pub struct CutArmState {
    origin: Instant,
    word: AtomicU64,
}

impl CutArmState {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            word: AtomicU64::new(IDLE),
        }
    }

    /// Arm (or re-arm) at `now`
    pub fn arm(&self, now: Instant) {
        self.word.store(self.encode(now), Ordering::Release);
    }

    /// Clear the marker. Returns whether it was armed.
    pub fn clear(&self) -> bool {
        self.word.swap(IDLE, Ordering::AcqRel) != IDLE
    }

    pub fn is_armed(&self) -> bool {
        self.word.load(Ordering::Acquire) != IDLE
    }

    /// When the current cut was armed, if one is pending
    pub fn armed_since(&self) -> Option<Instant> {
        self.decode(self.word.load(Ordering::Acquire))
    }

    /// Clear the marker if it has outlived `timeout`. Returns whether it was cleared.
    ///
    /// Only the exact arm observed here is cleared; a concurrent re-arm or clear wins.
    pub fn take_if_stale(&self, timeout: CutTimeout, now: Instant) -> bool {
        let word = self.word.load(Ordering::Acquire);
        let Some(since) = self.decode(word) else {
            return false;
        };
        if !timeout.is_expired(since, now) {
            return false;
        }
        self.word
            .compare_exchange(word, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn encode(&self, at: Instant) -> u64 {
        let nanos = at.saturating_duration_since(self.origin).as_nanos();
        u64::try_from(nanos).unwrap_or(u64::MAX - 1).saturating_add(1)
    }

    fn decode(&self, word: u64) -> Option<Instant> {
        if word == IDLE {
            return None;
        }
        Some(self.origin + Duration::from_nanos(word - 1))
    }
}

impl Default for CutArmState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
