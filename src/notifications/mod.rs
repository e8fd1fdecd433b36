// User-facing feedback for cut-mode transitions
//
// The event tap callback only enqueues a `CutEvent`; logging and notification posting happen on
// the dispatcher thread.

mod dispatcher;
mod osascript;

pub use dispatcher::{NotificationDispatcher, Notifier, DISPATCH_QUEUE_CAPACITY};
pub use osascript::{
    notification_script, LogNotificationSink, OsascriptNotificationSink, NOTIFICATION_SOUND,
};

/// Something the state machine or the tap wants reported outside the hot path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutEvent {
    /// ⌘X in the target app armed (or re-armed) cut mode
    Armed,
    /// ⌘V while armed was rewritten into a move paste
    Moved,
    /// Escape cancelled an armed cut
    Cancelled,
    /// The armed cut outlived the configured timeout
    TimedOut,
    /// The target app lost focus while armed
    FocusLost,
    /// The OS disabled the tap and it was re-enabled
    TapReenabled,
    /// A single callback invocation took longer than expected
    SlowCallback { micros: u64 },
    /// A permission check observed Accessibility access being granted or revoked
    PermissionChanged { granted: bool },
}

impl CutEvent {
    /// The user notification for this event, if it has one
    pub fn notification(&self) -> Option<NotificationKind> {
        match self {
            CutEvent::Armed => Some(NotificationKind::Cut),
            CutEvent::Cancelled => Some(NotificationKind::Cancelled),
            CutEvent::TimedOut => Some(NotificationKind::TimedOut),
            CutEvent::PermissionChanged { granted: false } => {
                Some(NotificationKind::PermissionRequired)
            }
            CutEvent::Moved
            | CutEvent::FocusLost
            | CutEvent::TapReenabled
            | CutEvent::SlowCallback { .. }
            | CutEvent::PermissionChanged { granted: true } => None,
        }
    }
}

/// User notifications the service can post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Cut,
    Cancelled,
    TimedOut,
    /// Accessibility access was revoked while the feature is on
    PermissionRequired,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::Cut => "Cut",
            NotificationKind::Cancelled => "Cut Cancelled",
            NotificationKind::TimedOut => "Cut Timed Out",
            NotificationKind::PermissionRequired => "Accessibility Permission Required",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            NotificationKind::Cut => "⌘V / Esc",
            NotificationKind::PermissionRequired => "Privacy & Security › Accessibility",
            NotificationKind::Cancelled | NotificationKind::TimedOut => "",
        }
    }
}

/// Destination for user notifications
pub trait NotificationSink: Send + Sync {
    /// Post a notification. Errors are logged by the caller and never retried.
    fn post(&self, title: &str, subtitle: &str, sound: bool) -> Result<(), String>;
}

#[cfg(test)]
#[path = "notifications_test.rs"]
mod tests;
