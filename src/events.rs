// Cut/paste status events for the UI layer
// Defines the status payload and emission trait for testability

use serde::Serialize;

/// Event names as constants for consistency
pub mod event_names {
    pub const CUT_PASTE_STATUS: &str = "cut_paste_status";
}

/// Payload for the cut_paste_status event
///
/// Backs the persistent status indicator: whether the feature is on, whether the tap is live,
/// and whether Accessibility permission is granted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CutPasteStatus {
    /// The user-facing toggle
    pub enabled: bool,
    /// Whether the event tap is installed
    pub active: bool,
    /// Accessibility permission at the time of the event
    pub permission_granted: bool,
    /// ISO 8601 timestamp when the status was taken
    pub timestamp: String,
}

impl CutPasteStatus {
    pub fn new(enabled: bool, active: bool, permission_granted: bool) -> Self {
        Self {
            enabled,
            active,
            permission_granted,
            timestamp: current_timestamp(),
        }
    }

    /// Enabled but unable to run because permission is missing
    pub fn needs_permission(&self) -> bool {
        self.enabled && !self.permission_granted
    }

    /// One-line human summary
    pub fn describe(&self) -> &'static str {
        match (self.enabled, self.active, self.permission_granted) {
            (false, _, _) => "disabled",
            (true, true, _) => "active",
            (true, false, false) => "waiting for Accessibility permission",
            (true, false, true) => "starting",
        }
    }
}

/// Trait for emitting status events
/// Allows mocking in tests and swapping the presentation layer
pub trait StatusEmitter: Send + Sync {
    fn emit_status(&self, status: CutPasteStatus);
}

/// Emitter that writes status transitions to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusEmitter;

impl StatusEmitter for LogStatusEmitter {
    fn emit_status(&self, status: CutPasteStatus) {
        if status.needs_permission() {
            crate::warn!(
                "{}: {}",
                event_names::CUT_PASTE_STATUS,
                crate::keyboard_capture::AccessibilityPermissionError::new()
            );
        } else {
            crate::info!(
                "{}: {} (enabled={}, active={}, permission={})",
                event_names::CUT_PASTE_STATUS,
                status.describe(),
                status.enabled,
                status.active,
                status.permission_granted
            );
        }
    }
}

/// Get current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_camel_case() {
        let status = CutPasteStatus {
            enabled: true,
            active: false,
            permission_granted: false,
            timestamp: "2025-01-01T12:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&status).expect("serialize");
        assert_eq!(json["enabled"], true);
        assert_eq!(json["active"], false);
        assert_eq!(json["permissionGranted"], false);
        assert_eq!(json["timestamp"], "2025-01-01T12:00:00Z");
    }

    #[test]
    fn test_describe() {
        assert_eq!(CutPasteStatus::new(false, false, true).describe(), "disabled");
        assert_eq!(CutPasteStatus::new(true, true, true).describe(), "active");
        assert_eq!(
            CutPasteStatus::new(true, false, false).describe(),
            "waiting for Accessibility permission"
        );
    }

    #[test]
    fn test_needs_permission_only_when_enabled() {
        assert!(CutPasteStatus::new(true, false, false).needs_permission());
        assert!(!CutPasteStatus::new(false, false, false).needs_permission());
    }

    #[test]
    fn test_current_timestamp_is_rfc3339() {
        let ts = current_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
