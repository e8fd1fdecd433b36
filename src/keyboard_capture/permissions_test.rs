use super::*;

#[test]
fn test_check_accessibility_permission_matches_provider() {
    // The actual value depends on system state; both paths must agree
    assert_eq!(
        check_accessibility_permission(),
        MacAccessibility.is_granted()
    );
}

#[test]
#[cfg(not(target_os = "macos"))]
fn test_never_granted_off_macos() {
    assert!(!MacAccessibility.is_granted());
    assert!(!MacAccessibility.prompt());
    assert!(MacAccessibility.open_settings().is_err());
}

#[test]
#[ignore] // Opens System Settings - skip during automated test runs
fn test_open_accessibility_settings_succeeds() {
    let result = open_accessibility_settings();
    assert!(result.is_ok(), "open_accessibility_settings should succeed: {:?}", result);
}

#[test]
fn test_accessibility_permission_error_display() {
    let error = AccessibilityPermissionError::new();
    let display = format!("{}", error);
    assert!(display.contains("Accessibility permission required"));
    assert!(display.contains("System Settings"));
}

#[test]
fn test_accessibility_permission_error_default() {
    let error = AccessibilityPermissionError::default();
    assert!(error.message.contains("Accessibility permission required"));
}
