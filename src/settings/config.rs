//! Feature configuration shared with the event tap callback.
//!
//! The callback reads the configuration on every key-down while the settings store may be
//! writing it from another thread. The whole snapshot is packed into one `AtomicU64` so a reader
//! always sees either the old or the new configuration, never a mix of both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default cut timeout in seconds (5 minutes)
pub const DEFAULT_CUT_TIMEOUT_SECS: u32 = 300;

/// How long a pending cut stays armed before it expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeoutRepr", into = "TimeoutRepr")]
pub enum CutTimeout {
    /// Expire after the given number of seconds
    Seconds(u32),
    /// Never expire; the cut stays armed until moved, cancelled or focus is lost
    Never,
}

/// On-disk form: a number of seconds or the word "never"
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimeoutRepr {
    Seconds(i64),
    Word(String),
}

impl TryFrom<TimeoutRepr> for CutTimeout {
    type Error = String;

    fn try_from(repr: TimeoutRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeoutRepr::Seconds(secs) => Ok(CutTimeout::from_secs(secs)),
            TimeoutRepr::Word(word) => word.parse(),
        }
    }
}

impl From<CutTimeout> for TimeoutRepr {
    fn from(timeout: CutTimeout) -> Self {
        match timeout {
            CutTimeout::Seconds(secs) => TimeoutRepr::Seconds(i64::from(secs)),
            CutTimeout::Never => TimeoutRepr::Word("never".to_string()),
        }
    }
}

impl CutTimeout {
    /// Build a timeout from a raw seconds value.
    ///
    /// Zero and negative values fall back to the default, matching how the stored preference
    /// has always been interpreted.
    pub fn from_secs(secs: i64) -> Self {
        if secs <= 0 {
            CutTimeout::Seconds(DEFAULT_CUT_TIMEOUT_SECS)
        } else {
            CutTimeout::Seconds(secs.min(i64::from(u32::MAX)) as u32)
        }
    }

    /// The timeout as a duration, or None for `Never`
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            CutTimeout::Seconds(secs) => Some(Duration::from_secs(u64::from(*secs))),
            CutTimeout::Never => None,
        }
    }

    /// Whether a cut armed at `since` is stale at `now`.
    ///
    /// Strictly greater than: a cut is still valid at exactly the timeout boundary.
    pub fn is_expired(&self, since: Instant, now: Instant) -> bool {
        match self.as_duration() {
            Some(limit) => now.saturating_duration_since(since) > limit,
            None => false,
        }
    }
}

impl Default for CutTimeout {
    fn default() -> Self {
        CutTimeout::Seconds(DEFAULT_CUT_TIMEOUT_SECS)
    }
}

impl FromStr for CutTimeout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("never") {
            return Ok(CutTimeout::Never);
        }
        trimmed
            .parse::<i64>()
            .map(CutTimeout::from_secs)
            .map_err(|_| format!("Invalid cut timeout '{}': expected seconds or \"never\"", s))
    }
}

impl fmt::Display for CutTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutTimeout::Seconds(secs) => write!(f, "{}s", secs),
            CutTimeout::Never => write!(f, "never"),
        }
    }
}

/// Snapshot of the settings the cut-mode state machine depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    /// How long a pending cut stays armed
    pub cut_timeout: CutTimeout,
    /// Whether user-visible notifications are posted
    pub notifications_enabled: bool,
    /// Whether notifications play a sound
    pub sound_enabled: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            cut_timeout: CutTimeout::default(),
            notifications_enabled: true,
            sound_enabled: true,
        }
    }
}

// Word layout: bits 0-31 timeout seconds, bit 32 never, bit 33 notifications, bit 34 sound
const SECS_MASK: u64 = 0xFFFF_FFFF;
const NEVER_BIT: u64 = 1 << 32;
const NOTIFICATIONS_BIT: u64 = 1 << 33;
const SOUND_BIT: u64 = 1 << 34;

impl FeatureConfig {
    fn pack(&self) -> u64 {
        let mut word = match self.cut_timeout {
            CutTimeout::Seconds(secs) => u64::from(secs),
            CutTimeout::Never => NEVER_BIT,
        };
        if self.notifications_enabled {
            word |= NOTIFICATIONS_BIT;
        }
        if self.sound_enabled {
            word |= SOUND_BIT;
        }
        word
    }

    fn unpack(word: u64) -> Self {
        let cut_timeout = if word & NEVER_BIT != 0 {
            CutTimeout::Never
        } else {
            CutTimeout::Seconds((word & SECS_MASK) as u32)
        };
        Self {
            cut_timeout,
            notifications_enabled: word & NOTIFICATIONS_BIT != 0,
            sound_enabled: word & SOUND_BIT != 0,
        }
    }
}

/// Lock-free, cloneable handle to the current `FeatureConfig`
#[derive(Debug, Clone)]
pub struct SharedConfig {
    word: Arc<AtomicU64>,
}

impl SharedConfig {
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            word: Arc::new(AtomicU64::new(config.pack())),
        }
    }

    /// Read the current configuration with a single atomic load
    pub fn snapshot(&self) -> FeatureConfig {
        FeatureConfig::unpack(self.word.load(Ordering::Acquire))
    }

    /// Replace the configuration; visible to the next `snapshot()` on any thread
    pub fn publish(&self, config: FeatureConfig) {
        self.word.store(config.pack(), Ordering::Release);
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
