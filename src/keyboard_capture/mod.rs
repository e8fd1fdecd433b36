// Keyboard capture: the OS listener that feeds key-downs to the cut-mode interceptor
//
// The session and permission gate are platform-neutral and talk to the OS through the
// `TapBackend` and `PermissionProvider` traits. The CGEventTap backend is macOS-only.
//
// Requires Accessibility permission (System Settings > Privacy & Security > Accessibility)

#[cfg(target_os = "macos")]
pub mod cgeventtap;
mod gate;
pub mod keycodes;
pub mod modifiers;
pub mod permissions;
mod session;
mod types;

#[cfg(target_os = "macos")]
pub use cgeventtap::CgEventTapBackend;
pub use gate::PermissionGate;
pub use modifiers::ModifierSet;
pub use permissions::{AccessibilityPermissionError, MacAccessibility, PermissionProvider};
pub use session::{CaptureError, EventTapSession, TapBackend};
pub use types::KeyInput;

#[cfg(test)]
#[path = "modifiers_test.rs"]
mod tests;
