//! CGEventTap backend for the event tap session (macOS)
//!
//! Installs a session-level tap for key-down events on a dedicated thread with its own
//! CFRunLoop, and hands each event to the `KeyInterceptor`.
//!
//! CGEventTap requires Accessibility permission (System Settings > Privacy & Security > Accessibility)
//!
//! ## Module Organization
//!
//! - `capture`: `CgEventTapBackend` and the tap thread lifecycle
//! - `callback`: the raw C callback that runs for every event

mod callback;
mod capture;

pub use capture::CgEventTapBackend;

/// Callbacks slower than this are reported; macOS disables taps that stall input
pub const SLOW_CALLBACK_THRESHOLD: std::time::Duration = std::time::Duration::from_millis(10);
