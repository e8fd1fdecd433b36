// Permission gate: the only place the rest of the crate asks about Accessibility access

use super::permissions::PermissionProvider;
use parking_lot::Mutex;
use std::sync::Arc;

type PermissionListener = Box<dyn Fn(bool) + Send + Sync>;

/// Wraps a `PermissionProvider` and tracks grant transitions.
///
/// The OS offers no reliable grant/revoke event stream, so transitions are only noticed when
/// someone calls `check()`. Listeners registered with `on_change` run on the checking thread.
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
    last_observed: Mutex<Option<bool>>,
    listeners: Mutex<Vec<PermissionListener>>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self {
            provider,
            last_observed: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.provider.is_granted()
    }

    /// Show the consent dialog unless already granted. Safe to call repeatedly; never blocks.
    pub fn prompt_if_needed(&self) -> bool {
        if self.provider.is_granted() {
            return true;
        }
        crate::info!("Requesting Accessibility permission");
        self.provider.prompt()
    }

    pub fn open_settings(&self) -> Result<(), String> {
        self.provider.open_settings()
    }

    /// Register a callback for observed grant transitions
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    /// Query the OS and notify listeners if the answer differs from the previous check.
    ///
    /// The first check only records the baseline.
    pub fn check(&self) -> bool {
        let granted = self.provider.is_granted();
        let previous = self.last_observed.lock().replace(granted);

        if matches!(previous, Some(prev) if prev != granted) {
            if granted {
                crate::info!("Accessibility permission granted");
            } else {
                crate::warn!("Accessibility permission revoked");
            }
            for listener in self.listeners.lock().iter() {
                listener(granted);
            }
        }

        granted
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
