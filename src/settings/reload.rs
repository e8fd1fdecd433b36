// Periodic re-read of the settings file so edits from the CLI reach the running service

use super::store::SettingsStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Spawn a task that calls `SettingsStore::reload` every `interval`.
///
/// Each reload runs on the blocking pool: change listeners may tear down the event tap, which
/// waits on the tap thread.
pub fn spawn_reload_task(
    runtime: &Handle,
    store: Arc<SettingsStore>,
    interval: Duration,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.reload()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => crate::warn!("Failed to reload settings: {}", e),
                Err(e) => crate::error!("Settings reload task failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
#[path = "reload_test.rs"]
mod tests;
