// Settings store - persists user preferences to settings.json
// Uses the temp file + rename write so a crash never leaves a truncated file behind

use super::config::{CutTimeout, FeatureConfig, SharedConfig};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the persisted preferences
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error types for settings store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsStoreError {
    /// Failed to persist settings
    #[error("Failed to persist settings: {0}")]
    PersistenceError(String),
    /// Failed to load settings
    #[error("Failed to load settings: {0}")]
    LoadError(String),
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether cut/paste interception is turned on
    pub enabled: bool,
    /// How long a pending cut stays armed
    pub cut_timeout_seconds: CutTimeout,
    /// Whether to post notifications on cut/cancel/timeout
    pub show_notifications: bool,
    /// Whether notifications play a sound
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            cut_timeout_seconds: CutTimeout::default(),
            show_notifications: true,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// The part of the settings the interception core reads
    pub fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            cut_timeout: self.cut_timeout_seconds,
            notifications_enabled: self.show_notifications,
            sound_enabled: self.sound_enabled,
        }
    }
}

type ChangeListener = Box<dyn Fn(&Settings) + Send + Sync>;

/// File-backed preference store
///
/// Every successful setter persists the file, publishes a fresh `FeatureConfig` to the
/// `SharedConfig` handed to the interception core, then notifies change listeners.
pub struct SettingsStore {
    /// Current settings
    settings: Mutex<Settings>,
    /// Path to persistence file
    config_path: PathBuf,
    /// Snapshot read by the event tap callback
    shared: SharedConfig,
    /// Called after each change, in registration order
    listeners: Mutex<Vec<ChangeListener>>,
}

impl SettingsStore {
    /// Create a store with default settings backed by the given path
    pub fn new(config_path: PathBuf) -> Self {
        let settings = Settings::default();
        let shared = SharedConfig::new(settings.feature_config());
        Self {
            settings: Mutex::new(settings),
            config_path,
            shared,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Create a store at `<config dir>/finderclip/settings.json`
    pub fn with_default_path() -> Result<Self, SettingsStoreError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            SettingsStoreError::LoadError("Could not determine config directory".to_string())
        })?;
        Ok(Self::new(config_dir.join("finderclip").join(SETTINGS_FILE_NAME)))
    }

    /// Load settings from the persistence file
    ///
    /// A missing file is not an error; defaults stay in effect.
    pub fn load(&self) -> Result<(), SettingsStoreError> {
        crate::debug!("Loading settings from {:?}", self.config_path);

        let Some(loaded) = self.read_file()? else {
            crate::debug!("No settings file found, using defaults");
            return Ok(());
        };

        self.shared.publish(loaded.feature_config());
        *self.settings.lock() = loaded;

        crate::info!("Loaded settings: {:?}", self.settings());
        Ok(())
    }

    /// Re-read the persistence file and apply it if another process changed it.
    ///
    /// Returns whether anything changed. Listeners fire as for a setter.
    pub fn reload(&self) -> Result<bool, SettingsStoreError> {
        let Some(loaded) = self.read_file()? else {
            return Ok(false);
        };

        {
            let mut guard = self.settings.lock();
            if *guard == loaded {
                return Ok(false);
            }
            *guard = loaded.clone();
        }

        crate::info!("Settings changed on disk: {:?}", loaded);
        self.shared.publish(loaded.feature_config());
        for listener in self.listeners.lock().iter() {
            listener(&loaded);
        }
        Ok(true)
    }

    fn read_file(&self) -> Result<Option<Settings>, SettingsStoreError> {
        if !self.config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsStoreError::LoadError(e.to_string()))?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SettingsStoreError::LoadError(e.to_string()))
    }

    /// Current settings
    pub fn settings(&self) -> Settings {
        self.settings.lock().clone()
    }

    /// Handle to the lock-free configuration snapshot
    pub fn shared_config(&self) -> SharedConfig {
        self.shared.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Register a listener fired after every persisted change.
    ///
    /// Listeners must not register further listeners from inside the callback.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), SettingsStoreError> {
        self.update(|s| s.enabled = enabled)
    }

    pub fn set_cut_timeout(&self, timeout: CutTimeout) -> Result<(), SettingsStoreError> {
        self.update(|s| s.cut_timeout_seconds = timeout)
    }

    pub fn set_show_notifications(&self, show: bool) -> Result<(), SettingsStoreError> {
        self.update(|s| s.show_notifications = show)
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<(), SettingsStoreError> {
        self.update(|s| s.sound_enabled = enabled)
    }

    /// Apply a mutation, persist it, publish it and notify listeners.
    ///
    /// A no-op mutation skips all three. On a persistence failure the in-memory settings
    /// are left untouched.
    fn update<F>(&self, mutate: F) -> Result<(), SettingsStoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let updated = {
            let mut guard = self.settings.lock();
            let mut next = guard.clone();
            mutate(&mut next);
            if next == *guard {
                return Ok(());
            }
            self.save(&next)?;
            *guard = next.clone();
            next
        };

        self.shared.publish(updated.feature_config());

        for listener in self.listeners.lock().iter() {
            listener(&updated);
        }
        Ok(())
    }

    /// Persist settings to the file using atomic write (temp file + rename)
    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        crate::debug!("Persisting settings to {:?}", self.config_path);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsStoreError::PersistenceError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| SettingsStoreError::PersistenceError(e.to_string()))?;

        let temp_path = self.config_path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path).map_err(|e| {
                SettingsStoreError::PersistenceError(format!("Failed to create temp file: {}", e))
            })?;
            file.write_all(content.as_bytes()).map_err(|e| {
                SettingsStoreError::PersistenceError(format!("Failed to write: {}", e))
            })?;
            file.sync_all().map_err(|e| {
                SettingsStoreError::PersistenceError(format!("Failed to sync: {}", e))
            })?;
        }

        fs::rename(&temp_path, &self.config_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SettingsStoreError::PersistenceError(format!("Failed to rename: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
