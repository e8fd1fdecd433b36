// Notification sinks
//
// On macOS notifications go through `osascript`, which needs no bundle or entitlement.
// Elsewhere they are only logged.

use super::NotificationSink;
#[cfg(target_os = "macos")]
use std::process::Command;

/// Sound played with a notification when sound is enabled
pub const NOTIFICATION_SOUND: &str = "Glass";

/// Posts notifications through AppleScript's `display notification`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsascriptNotificationSink;

impl OsascriptNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

/// Build the AppleScript source for a notification
pub fn notification_script(title: &str, subtitle: &str, sound: bool) -> String {
    let mut script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(subtitle),
        escape_applescript(title)
    );
    if sound {
        script.push_str(&format!(" sound name \"{}\"", NOTIFICATION_SOUND));
    }
    script
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl NotificationSink for OsascriptNotificationSink {
    #[cfg(target_os = "macos")]
    fn post(&self, title: &str, subtitle: &str, sound: bool) -> Result<(), String> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(notification_script(title, subtitle, sound))
            .output()
            .map_err(|e| format!("Failed to run osascript: {}", e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "osascript exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn post(&self, title: &str, subtitle: &str, sound: bool) -> Result<(), String> {
        LogNotificationSink.post(title, subtitle, sound)
    }
}

/// Writes notifications to the log instead of showing them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn post(&self, title: &str, subtitle: &str, _sound: bool) -> Result<(), String> {
        if subtitle.is_empty() {
            crate::info!("Notification: {}", title);
        } else {
            crate::info!("Notification: {} ({})", title, subtitle);
        }
        Ok(())
    }
}
