// Accessibility permission handling
// Installing an event tap that can consume events requires the Accessibility permission, and so
// does reading another app's focused element. The OS owns the permission: every query goes back
// to it rather than trusting a cached answer.

/// OS capability queries consumed by the permission gate
pub trait PermissionProvider: Send + Sync {
    /// Side-effect-free check of the current grant
    fn is_granted(&self) -> bool;

    /// Show the system consent dialog if not granted. Returns the grant as observed now.
    fn prompt(&self) -> bool;

    /// Open the Accessibility pane of System Settings
    fn open_settings(&self) -> Result<(), String>;
}

/// `PermissionProvider` backed by the macOS Accessibility API
#[derive(Debug, Default, Clone, Copy)]
pub struct MacAccessibility;

impl PermissionProvider for MacAccessibility {
    fn is_granted(&self) -> bool {
        check_accessibility_permission()
    }

    fn prompt(&self) -> bool {
        check_accessibility_permission_with_prompt()
    }

    fn open_settings(&self) -> Result<(), String> {
        open_accessibility_settings()
    }
}

#[cfg(target_os = "macos")]
mod ffi {
    use std::ffi::c_void;

    #[link(name = "ApplicationServices", kind = "framework")]
    extern "C" {
        pub fn AXIsProcessTrusted() -> bool;

        /// With kAXTrustedCheckOptionPrompt set to true, shows the consent dialog and adds
        /// the app (disabled) to the Accessibility list
        pub fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;

        pub static kAXTrustedCheckOptionPrompt: *const c_void;
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    extern "C" {
        pub fn CFDictionaryCreate(
            allocator: *const c_void,
            keys: *const *const c_void,
            values: *const *const c_void,
            num_values: isize,
            key_callbacks: *const c_void,
            value_callbacks: *const c_void,
        ) -> *const c_void;

        pub fn CFRelease(cf: *const c_void);

        pub static kCFTypeDictionaryKeyCallBacks: c_void;
        pub static kCFTypeDictionaryValueCallBacks: c_void;
        pub static kCFBooleanTrue: *const c_void;
    }
}

/// Check if the application has Accessibility permission
#[cfg(target_os = "macos")]
pub fn check_accessibility_permission() -> bool {
    // SAFETY: AXIsProcessTrusted only reads the permission state
    unsafe { ffi::AXIsProcessTrusted() }
}

/// Check if the application has Accessibility permission, prompting if not.
///
/// The prompt does not block; the returned value is the grant before the user answers.
#[cfg(target_os = "macos")]
pub fn check_accessibility_permission_with_prompt() -> bool {
    unsafe {
        let keys = [ffi::kAXTrustedCheckOptionPrompt];
        let values = [ffi::kCFBooleanTrue];

        let options = ffi::CFDictionaryCreate(
            std::ptr::null(),
            keys.as_ptr(),
            values.as_ptr(),
            1,
            &ffi::kCFTypeDictionaryKeyCallBacks,
            &ffi::kCFTypeDictionaryValueCallBacks,
        );

        let result = ffi::AXIsProcessTrustedWithOptions(options);

        if !options.is_null() {
            ffi::CFRelease(options);
        }

        result
    }
}

/// Open System Settings > Privacy & Security > Accessibility
#[cfg(target_os = "macos")]
pub fn open_accessibility_settings() -> Result<(), String> {
    let url = "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";

    std::process::Command::new("open")
        .arg(url)
        .spawn()
        .map_err(|e| format!("Failed to open System Settings: {}", e))?;

    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn check_accessibility_permission() -> bool {
    false
}

#[cfg(not(target_os = "macos"))]
pub fn check_accessibility_permission_with_prompt() -> bool {
    false
}

#[cfg(not(target_os = "macos"))]
pub fn open_accessibility_settings() -> Result<(), String> {
    Err("Accessibility settings are only available on macOS".to_string())
}

/// Error returned when Accessibility permission is not granted
#[derive(Debug, Clone)]
pub struct AccessibilityPermissionError {
    pub message: String,
}

impl std::fmt::Display for AccessibilityPermissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AccessibilityPermissionError {}

impl AccessibilityPermissionError {
    pub fn new() -> Self {
        Self {
            message: "Accessibility permission required. Allow FinderClip in System Settings > Privacy & Security > Accessibility; cut and paste will start working as soon as it is granted.".to_string(),
        }
    }
}

impl Default for AccessibilityPermissionError {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "permissions_test.rs"]
mod tests;
