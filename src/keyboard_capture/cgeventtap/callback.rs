//! CGEventTap callback handling.
//!
//! Runs on the tap thread for every key-down in the login session. Nothing here logs or takes
//! a lock; reports go through the interceptor's non-blocking queue.

use super::SLOW_CALLBACK_THRESHOLD;
use crate::cut_mode::{Disposition, KeyInterceptor};
use crate::keyboard::SYNTHETIC_EVENT_MARKER;
use crate::keyboard_capture::KeyInput;
use crate::notifications::CutEvent;
use core_foundation::mach_port::CFMachPortRef;
use core_graphics::event::{CGEvent, CGEventTapProxy, CGEventType, EventField};
use foreign_types::ForeignType;
use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;
use std::time::Instant;

// Raw CGEventType values (CGEventType doesn't implement PartialEq)
const EVENT_TYPE_KEY_DOWN: u32 = 10;
const EVENT_TYPE_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
const EVENT_TYPE_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    pub(super) fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

/// State the C callback reaches through `user_info`.
///
/// Owned by the tap thread, which keeps it alive until after the tap is released.
pub(super) struct TapContext {
    interceptor: Arc<KeyInterceptor>,
    port: AtomicPtr<c_void>,
}

impl TapContext {
    pub(super) fn new(interceptor: Arc<KeyInterceptor>) -> Self {
        Self {
            interceptor,
            port: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub(super) fn set_port(&self, port: CFMachPortRef) {
        self.port.store(port as *mut c_void, Ordering::Release);
    }

    pub(super) fn clear_port(&self) {
        self.port.store(ptr::null_mut(), Ordering::Release);
    }
}

/// Raw CGEventTap callback
///
/// Returns:
/// - the event pointer: passes the event through to other applications
/// - null_mut(): consumes the event
pub(super) unsafe extern "C" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    event_ref: *mut c_void,
    user_info: *mut c_void,
) -> *mut c_void {
    if user_info.is_null() || event_ref.is_null() {
        return event_ref;
    }
    let context = &*(user_info as *const TapContext);

    // A panic must never take keyboard input down with it
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        handle_event(context, event_type as u32, event_ref)
    }));

    match result {
        Ok(Disposition::Consume) => ptr::null_mut(),
        Ok(Disposition::Pass) | Err(_) => event_ref,
    }
}

fn handle_event(context: &TapContext, event_type: u32, event_ref: *mut c_void) -> Disposition {
    match event_type {
        EVENT_TYPE_TAP_DISABLED_BY_TIMEOUT | EVENT_TYPE_TAP_DISABLED_BY_USER_INPUT => {
            reenable_tap(context);
            return Disposition::Pass;
        }
        EVENT_TYPE_KEY_DOWN => {}
        _ => return Disposition::Pass,
    }

    // The tap owns the event; borrow it without releasing
    let event = ManuallyDrop::new(unsafe { CGEvent::from_ptr(event_ref as *mut _) });

    if event.get_integer_value_field(EventField::EVENT_SOURCE_USER_DATA) == SYNTHETIC_EVENT_MARKER {
        return Disposition::Pass;
    }

    let key = KeyInput::from_cg(
        event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE),
        event.get_flags().bits(),
    );

    let started = Instant::now();
    let disposition = context.interceptor.on_key_down_at(key, started);

    let elapsed = started.elapsed();
    if elapsed > SLOW_CALLBACK_THRESHOLD {
        context.interceptor.report(CutEvent::SlowCallback {
            micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        });
    }

    disposition
}

fn reenable_tap(context: &TapContext) {
    if !context.interceptor.is_live() {
        return;
    }
    let port = context.port.load(Ordering::Acquire);
    if port.is_null() {
        return;
    }
    // SAFETY: the port is cleared before the tap thread releases the mach port
    unsafe { CGEventTapEnable(port as CFMachPortRef, true) };
    context.interceptor.report(CutEvent::TapReenabled);
}
