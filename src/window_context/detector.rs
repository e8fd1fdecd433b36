// Frontmost application and text-editing detection for macOS
//
// Uses NSWorkspace for the frontmost application and the Accessibility API for the focused
// element's selected text. Both are called from the event tap thread: the bundle identifier is
// compared in place without building a Rust string, and every accessibility call carries a short
// messaging timeout so a hung target app cannot stall keyboard input.

use super::types::{FocusProbe, FrontmostApp, TextEditState, TARGET_BUNDLE_ID};
use cocoa::base::{id, nil};
use cocoa::foundation::{NSAutoreleasePool, NSString};
use core_foundation::base::{CFGetTypeID, CFRelease, CFTypeID, CFTypeRef, TCFType};
use core_foundation::string::{CFString, CFStringRef};
use objc::{class, msg_send, sel, sel_impl};
use std::ffi::{c_void, CStr};

type AXUIElementRef = *const c_void;
type AXError = i32;

const K_AX_ERROR_SUCCESS: AXError = 0;
const K_AX_ERROR_ATTRIBUTE_UNSUPPORTED: AXError = -25205;
const K_AX_ERROR_NOT_IMPLEMENTED: AXError = -25208;
const K_AX_ERROR_NO_VALUE: AXError = -25212;

/// Upper bound on a single cross-process accessibility call
const AX_MESSAGING_TIMEOUT_SECS: f32 = 0.05;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXUIElementCreateApplication(pid: i32) -> AXUIElementRef;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *mut CFTypeRef,
    ) -> AXError;
    fn AXUIElementSetMessagingTimeout(element: AXUIElementRef, timeout_secs: f32) -> AXError;
    fn AXUIElementGetTypeID() -> CFTypeID;
}

/// `FocusProbe` backed by NSWorkspace and the Accessibility API
pub struct MacFocusProbe {
    target_bundle_id: &'static str,
}

impl MacFocusProbe {
    /// Probe that treats Finder as the target application
    pub fn new() -> Self {
        Self::for_bundle(TARGET_BUNDLE_ID)
    }

    pub fn for_bundle(target_bundle_id: &'static str) -> Self {
        Self { target_bundle_id }
    }
}

impl Default for MacFocusProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusProbe for MacFocusProbe {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        // SAFETY: plain Objective-C message sends on NSWorkspace objects, drained by a local pool
        unsafe {
            let pool = NSAutoreleasePool::new(nil);
            let app = frontmost_app_impl(self.target_bundle_id);
            pool.drain();
            app
        }
    }

    fn text_edit_state(&self, pid: i32) -> TextEditState {
        // SAFETY: every CF object copied here is released before returning
        unsafe { text_edit_state_impl(pid) }
    }
}

#[allow(deprecated)]
unsafe fn frontmost_app_impl(target_bundle_id: &str) -> Option<FrontmostApp> {
    let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
    if workspace == nil {
        return None;
    }

    let frontmost_app: id = msg_send![workspace, frontmostApplication];
    if frontmost_app == nil {
        return None;
    }

    let pid: i32 = msg_send![frontmost_app, processIdentifier];
    if pid <= 0 {
        return None;
    }

    let bundle_id_ns: id = msg_send![frontmost_app, bundleIdentifier];
    let is_target = if bundle_id_ns != nil {
        let cstr: *const std::os::raw::c_char = NSString::UTF8String(bundle_id_ns);
        !cstr.is_null() && CStr::from_ptr(cstr).to_bytes() == target_bundle_id.as_bytes()
    } else {
        false
    };

    Some(FrontmostApp { pid, is_target })
}

unsafe fn text_edit_state_impl(pid: i32) -> TextEditState {
    let app = AXUIElementCreateApplication(pid);
    if app.is_null() {
        return TextEditState::Unknown;
    }
    AXUIElementSetMessagingTimeout(app, AX_MESSAGING_TIMEOUT_SECS);

    let focused_attr = CFString::from_static_string("AXFocusedUIElement");
    let mut focused: CFTypeRef = std::ptr::null();
    let err = AXUIElementCopyAttributeValue(app, focused_attr.as_concrete_TypeRef(), &mut focused);
    CFRelease(app as CFTypeRef);

    match err {
        K_AX_ERROR_SUCCESS if !focused.is_null() => {}
        // Nothing focused, so nothing is being edited
        K_AX_ERROR_SUCCESS | K_AX_ERROR_NO_VALUE => return TextEditState::NotEditing,
        _ => return TextEditState::Unknown,
    }

    if CFGetTypeID(focused) != AXUIElementGetTypeID() {
        CFRelease(focused);
        return TextEditState::NotEditing;
    }

    let element = focused as AXUIElementRef;
    AXUIElementSetMessagingTimeout(element, AX_MESSAGING_TIMEOUT_SECS);

    let selected_attr = CFString::from_static_string("AXSelectedText");
    let mut selected: CFTypeRef = std::ptr::null();
    let err =
        AXUIElementCopyAttributeValue(element, selected_attr.as_concrete_TypeRef(), &mut selected);
    CFRelease(focused);
    if !selected.is_null() {
        CFRelease(selected);
    }

    match err {
        K_AX_ERROR_SUCCESS => TextEditState::Editing,
        K_AX_ERROR_ATTRIBUTE_UNSUPPORTED | K_AX_ERROR_NO_VALUE | K_AX_ERROR_NOT_IMPLEMENTED => {
            TextEditState::NotEditing
        }
        _ => TextEditState::Unknown,
    }
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod tests;
