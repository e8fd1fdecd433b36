// Focus context for the cut-mode state machine: which app is frontmost, whether it is editing
// text, and when another app becomes active

mod activation;
#[cfg(target_os = "macos")]
mod detector;
mod types;

#[cfg(target_os = "macos")]
pub use activation::ActivationObserver;
pub use activation::{clear_activation_handler, notify_app_activated, set_activation_handler};
#[cfg(target_os = "macos")]
pub use detector::MacFocusProbe;
pub use types::{FocusProbe, FrontmostApp, TextEditState, TARGET_BUNDLE_ID};

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
