// Command-line surface

use crate::keyboard_capture::{AccessibilityPermissionError, PermissionProvider};
use crate::settings::{CutTimeout, SettingsStore, SettingsStoreError};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "finderclip", version, about = "True cut and paste for Finder")]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Intercept ⌘X / ⌘V in Finder until interrupted (default)
    Run,
    /// Show whether cut/paste is enabled and permitted
    Status,
    /// Open System Settings at Privacy & Security > Accessibility
    OpenAccessibilitySettings,
    /// Read or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings as JSON
    Show,
    /// Seconds a pending cut stays armed, or "never"
    SetTimeout { timeout: CutTimeout },
    /// Show notifications on cut, cancel and timeout
    Notifications { state: Toggle },
    /// Play a sound with notifications
    Sound { state: Toggle },
    /// Turn the whole feature on or off
    Enabled { state: Toggle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

/// Apply a config subcommand and return what to print
pub fn apply_config(
    store: &SettingsStore,
    action: &ConfigCommand,
) -> Result<String, SettingsStoreError> {
    match action {
        ConfigCommand::Show => {}
        ConfigCommand::SetTimeout { timeout } => store.set_cut_timeout(*timeout)?,
        ConfigCommand::Notifications { state } => store.set_show_notifications(state.is_on())?,
        ConfigCommand::Sound { state } => store.set_sound_enabled(state.is_on())?,
        ConfigCommand::Enabled { state } => store.set_enabled(state.is_on())?,
    }

    serde_json::to_string_pretty(&store.settings())
        .map_err(|e| SettingsStoreError::PersistenceError(e.to_string()))
}

/// Human-readable status for the `status` subcommand
pub fn status_report(store: &SettingsStore, permission: &dyn PermissionProvider) -> String {
    let settings = store.settings();
    let granted = permission.is_granted();

    let mut report = String::new();
    let _ = writeln!(
        report,
        "Cut/paste:      {}",
        if settings.enabled { "enabled" } else { "disabled" }
    );
    let _ = writeln!(
        report,
        "Accessibility:  {}",
        if granted { "granted" } else { "not granted" }
    );
    let _ = writeln!(report, "Cut timeout:    {}", settings.cut_timeout_seconds);
    let _ = writeln!(
        report,
        "Notifications:  {}{}",
        if settings.show_notifications { "on" } else { "off" },
        if settings.show_notifications && settings.sound_enabled {
            " (with sound)"
        } else {
            ""
        }
    );
    let _ = write!(report, "Settings file:  {}", store.config_path().display());

    if settings.enabled && !granted {
        let _ = write!(report, "\n\n{}", AccessibilityPermissionError::new());
    }
    report
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
