// Main thread run loop for the service
//
// AppKit only refreshes NSWorkspace's frontmost application and delivers workspace
// notifications while the main run loop turns. The process runs as a background-only app with
// no Dock icon, and the loop exits once shutdown is signaled.

use cocoa::appkit::{NSApp, NSApplication, NSApplicationActivationPolicyProhibited};
use cocoa::base::nil;
use cocoa::foundation::NSAutoreleasePool;
use core_foundation::base::TCFType;
use core_foundation::date::CFDate;
use core_foundation::runloop::{
    kCFRunLoopCommonModes, CFRunLoop, CFRunLoopStop, CFRunLoopTimer, CFRunLoopTimerRef,
};
use std::ffi::c_void;
use std::ptr;

/// Seconds between checks of the shutdown flag
const SHUTDOWN_CHECK_INTERVAL_SECS: f64 = 0.25;

extern "C" fn check_shutdown(_timer: CFRunLoopTimerRef, _info: *mut c_void) {
    if crate::shutdown::is_shutting_down() {
        unsafe {
            CFRunLoopStop(CFRunLoop::get_current().as_concrete_TypeRef());
        }
    }
}

/// Turn the current (main) thread into a background-only AppKit app
pub fn init_app() {
    // SAFETY: must run on the main thread, which `run_service` guarantees
    unsafe {
        let pool = NSAutoreleasePool::new(nil);
        let app = NSApp();
        app.setActivationPolicy_(NSApplicationActivationPolicyProhibited);
        pool.drain();
    }
}

/// Run the main run loop until `shutdown::signal_shutdown` is called.
///
/// A repeating timer both keeps the loop alive without other sources and notices a shutdown
/// signaled before the loop started.
pub fn run_until_shutdown() {
    let timer = CFRunLoopTimer::new(
        CFDate::now().abs_time() + SHUTDOWN_CHECK_INTERVAL_SECS,
        SHUTDOWN_CHECK_INTERVAL_SECS,
        0,
        0,
        check_shutdown,
        ptr::null_mut(),
    );

    let run_loop = CFRunLoop::get_current();
    unsafe {
        run_loop.add_timer(&timer, kCFRunLoopCommonModes);
    }

    crate::debug!("Main run loop started");
    CFRunLoop::run_current();
    crate::debug!("Main run loop stopped");

    unsafe {
        run_loop.remove_timer(&timer, kCFRunLoopCommonModes);
    }
}

/// Wake the main run loop so it exits. Safe to call from any thread.
pub fn stop() {
    let main = CFRunLoop::get_main();
    unsafe {
        CFRunLoopStop(main.as_concrete_TypeRef());
    }
}
