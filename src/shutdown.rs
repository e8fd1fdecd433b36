// Shutdown coordination module
// Provides a global flag to prevent operations during app shutdown

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag - set to true when app is shutting down
static APP_SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Signal that the app is shutting down
/// Call this first, before any cleanup
pub fn signal_shutdown() {
    APP_SHUTTING_DOWN.store(true, Ordering::SeqCst);
    crate::info!("App shutdown signaled");
}

/// Check if the app is shutting down
/// Returns true after signal_shutdown() has been called
pub fn is_shutting_down() -> bool {
    APP_SHUTTING_DOWN.load(Ordering::SeqCst)
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    APP_SHUTTING_DOWN.store(false, Ordering::SeqCst);
}

#[cfg(target_os = "macos")]
mod run_loop {
    use core_foundation::base::TCFType;
    use core_foundation::runloop::{CFRunLoop, CFRunLoopStop};
    use std::sync::Mutex;

    /// Run loop of the event tap thread, for stopping it from a signal handler
    static EVENT_TAP_RUN_LOOP: Mutex<Option<CFRunLoop>> = Mutex::new(None);

    /// Register the event tap's run loop for graceful shutdown
    pub fn register_event_tap_run_loop(run_loop: CFRunLoop) {
        if let Ok(mut guard) = EVENT_TAP_RUN_LOOP.lock() {
            *guard = Some(run_loop);
            crate::debug!("Event tap run loop registered for shutdown coordination");
        }
    }

    pub fn unregister_event_tap_run_loop() {
        if let Ok(mut guard) = EVENT_TAP_RUN_LOOP.lock() {
            *guard = None;
        }
    }

    /// Wake the event tap's run loop so its thread notices the shutdown flag
    pub fn stop_event_tap() {
        if let Ok(guard) = EVENT_TAP_RUN_LOOP.lock() {
            if let Some(ref run_loop) = *guard {
                unsafe {
                    CFRunLoopStop(run_loop.as_concrete_TypeRef());
                }
                crate::debug!("Event tap run loop stopped");
            }
        }
    }
}

#[cfg(target_os = "macos")]
pub use run_loop::{register_event_tap_run_loop, stop_event_tap, unregister_event_tap_run_loop};

#[cfg(not(target_os = "macos"))]
pub fn stop_event_tap() {}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(shutdown)]
    fn test_shutdown_flag_transitions() {
        reset_for_tests();

        // Initially not shutting down
        assert!(!is_shutting_down());

        // After signal, should be shutting down
        signal_shutdown();
        assert!(is_shutting_down());

        // Should remain true
        assert!(is_shutting_down());

        reset_for_tests();
    }

    #[test]
    #[serial(shutdown)]
    fn test_stop_event_tap_without_registered_run_loop() {
        stop_event_tap();
    }
}
