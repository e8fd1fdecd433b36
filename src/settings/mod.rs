//! User preferences for the cut/paste feature.
//!
//! - `config`: the `FeatureConfig` snapshot read by the event tap callback
//! - `store`: JSON-backed `SettingsStore` that persists preferences and publishes snapshots
//! - `reload`: periodic re-read so changes made by the CLI reach the running service

mod config;
mod reload;
mod store;

pub use config::{CutTimeout, FeatureConfig, SharedConfig, DEFAULT_CUT_TIMEOUT_SECS};
pub use reload::spawn_reload_task;
pub use store::{Settings, SettingsStore, SettingsStoreError, SETTINGS_FILE_NAME};
