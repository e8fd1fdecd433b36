//! CGEventTap lifecycle management.
//!
//! `CgEventTapBackend` owns the tap thread. The thread creates the tap, attaches it to its own
//! run loop, reports readiness back to `install`, and tears everything down when asked to stop.

use super::callback::{tap_callback, CGEventTapEnable, TapContext};
use crate::cut_mode::KeyInterceptor;
use crate::keyboard_capture::{CaptureError, TapBackend};
use core_foundation::base::TCFType;
use core_foundation::mach_port::{CFMachPort, CFMachPortRef};
use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop, CFRunLoopStop};
use core_graphics::event::{
    CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventTapProxy, CGEventType,
};
use parking_lot::Mutex;
use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// CGEventMask type for raw FFI
type CGEventMask = u64;

/// Internal callback type for raw FFI
type CGEventTapCallBackInternal = unsafe extern "C" fn(
    proxy: CGEventTapProxy,
    event_type: CGEventType,
    event: *mut c_void,
    user_info: *mut c_void,
) -> *mut c_void;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapCreate(
        tap: CGEventTapLocation,
        place: CGEventTapPlacement,
        options: CGEventTapOptions,
        events_of_interest: CGEventMask,
        callback: CGEventTapCallBackInternal,
        user_info: *mut c_void,
    ) -> CFMachPortRef;
}

/// How long `install` waits for the tap thread to report
const INSTALL_TIMEOUT: Duration = Duration::from_secs(2);
/// How long `uninstall` waits for the tap thread to exit
const STOP_TIMEOUT: Duration = Duration::from_secs(2);
/// Run loop slice between checks of the running flag
const RUN_LOOP_SLICE: Duration = Duration::from_millis(500);

/// `TapBackend` that installs a real CGEventTap
pub struct CgEventTapBackend {
    running: Arc<AtomicBool>,
    run_loop: Arc<Mutex<Option<CFRunLoop>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl CgEventTapBackend {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            run_loop: Arc::new(Mutex::new(None)),
            thread_handle: None,
        }
    }

    fn stop_run_loop(&self) {
        if let Some(ref run_loop) = *self.run_loop.lock() {
            unsafe {
                CFRunLoopStop(run_loop.as_concrete_TypeRef());
            }
        }
    }

    fn join_thread(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        let start = Instant::now();
        while !handle.is_finished() && start.elapsed() < STOP_TIMEOUT {
            thread::sleep(Duration::from_millis(10));
        }
        if handle.is_finished() {
            if handle.join().is_err() {
                crate::error!("Event tap thread panicked");
            }
        } else {
            crate::warn!("Event tap thread did not exit within {:?}", STOP_TIMEOUT);
        }
    }
}

impl Default for CgEventTapBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TapBackend for CgEventTapBackend {
    fn install(&mut self, interceptor: Arc<KeyInterceptor>) -> Result<(), CaptureError> {
        if self.is_installed() {
            return Ok(());
        }
        // A previous thread that exited on its own
        self.join_thread();

        self.running.store(true, Ordering::SeqCst);
        let (ready_tx, ready_rx) = mpsc::channel();
        let running = self.running.clone();
        let run_loop = self.run_loop.clone();

        let handle = thread::Builder::new()
            .name("event-tap".to_string())
            .spawn(move || run_tap_loop(interceptor, running, run_loop, ready_tx))
            .map_err(|e| {
                CaptureError::InstallFailed(format!("Failed to spawn tap thread: {}", e))
            })?;
        self.thread_handle = Some(handle);

        let outcome = ready_rx
            .recv_timeout(INSTALL_TIMEOUT)
            .unwrap_or_else(|_| {
                Err(CaptureError::InstallFailed(
                    "Event tap thread did not start".to_string(),
                ))
            });

        if outcome.is_err() {
            self.running.store(false, Ordering::SeqCst);
            self.stop_run_loop();
            self.join_thread();
        }
        outcome
    }

    fn uninstall(&mut self) {
        if self.thread_handle.is_none() {
            return;
        }
        self.running.store(false, Ordering::SeqCst);
        self.stop_run_loop();
        self.join_thread();
    }

    fn is_installed(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self
                .thread_handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for CgEventTapBackend {
    fn drop(&mut self) {
        self.uninstall();
    }
}

/// Body of the tap thread
fn run_tap_loop(
    interceptor: Arc<KeyInterceptor>,
    running: Arc<AtomicBool>,
    run_loop_slot: Arc<Mutex<Option<CFRunLoop>>>,
    ready: Sender<Result<(), CaptureError>>,
) {
    let context = Box::new(TapContext::new(interceptor));
    let user_info = &*context as *const TapContext as *mut c_void;

    let event_mask: CGEventMask = 1 << (CGEventType::KeyDown as u64);

    let event_tap_ref = unsafe {
        CGEventTapCreate(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::Default,
            event_mask,
            tap_callback,
            user_info,
        )
    };

    if event_tap_ref.is_null() {
        running.store(false, Ordering::SeqCst);
        let _ = ready.send(Err(CaptureError::PermissionDenied));
        return;
    }

    let mach_port = unsafe { CFMachPort::wrap_under_create_rule(event_tap_ref) };
    context.set_port(event_tap_ref);

    let Ok(run_loop_source) = mach_port.create_runloop_source(0) else {
        context.clear_port();
        running.store(false, Ordering::SeqCst);
        let _ = ready.send(Err(CaptureError::InstallFailed(
            "Failed to create run loop source".to_string(),
        )));
        return;
    };

    let run_loop = CFRunLoop::get_current();
    *run_loop_slot.lock() = Some(run_loop.clone());
    crate::shutdown::register_event_tap_run_loop(run_loop.clone());

    run_loop.add_source(&run_loop_source, unsafe { kCFRunLoopDefaultMode });
    unsafe {
        CGEventTapEnable(mach_port.as_concrete_TypeRef(), true);
    }

    let _ = ready.send(Ok(()));

    while running.load(Ordering::SeqCst) && !crate::shutdown::is_shutting_down() {
        CFRunLoop::run_in_mode(unsafe { kCFRunLoopDefaultMode }, RUN_LOOP_SLICE, false);
    }

    unsafe {
        CGEventTapEnable(mach_port.as_concrete_TypeRef(), false);
    }
    context.clear_port();
    run_loop.remove_source(&run_loop_source, unsafe { kCFRunLoopDefaultMode });

    crate::shutdown::unregister_event_tap_run_loop();
    *run_loop_slot.lock() = None;

    // The tap must be released before the context it points at
    drop(run_loop_source);
    drop(mach_port);
    drop(context);
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod tests;
