// Application activation events
//
// On macOS an NSWorkspace observer fires whenever any application becomes active. The callback
// arrives on the main thread and is forwarded to the single registered handler.

use parking_lot::{const_mutex, Mutex};

type ActivationHandler = Box<dyn Fn() + Send + Sync>;

static ACTIVATION_HANDLER: Mutex<Option<ActivationHandler>> = const_mutex(None);

/// Install the handler run for each activation, replacing any previous one
pub fn set_activation_handler<F>(handler: F)
where
    F: Fn() + Send + Sync + 'static,
{
    *ACTIVATION_HANDLER.lock() = Some(Box::new(handler));
}

pub fn clear_activation_handler() {
    *ACTIVATION_HANDLER.lock() = None;
}

/// Run the registered handler. Returns whether one was registered.
pub fn notify_app_activated() -> bool {
    let guard = ACTIVATION_HANDLER.lock();
    match guard.as_ref() {
        Some(handler) => {
            handler();
            true
        }
        None => false,
    }
}

#[cfg(target_os = "macos")]
pub use observer::ActivationObserver;

#[cfg(target_os = "macos")]
mod observer {
    use super::notify_app_activated;
    use cocoa::base::{id, nil};
    use cocoa::foundation::{NSAutoreleasePool, NSString};
    use objc::declare::ClassDecl;
    use objc::runtime::{Class, Object, Sel};
    use objc::{class, msg_send, sel, sel_impl};

    const OBSERVER_CLASS_NAME: &str = "FinderClipActivationObserver";
    const DID_ACTIVATE_NOTIFICATION: &str = "NSWorkspaceDidActivateApplicationNotification";

    extern "C" fn did_activate_app(_this: &Object, _cmd: Sel, _notification: id) {
        // A panic must not unwind into AppKit
        let _ = std::panic::catch_unwind(notify_app_activated);
    }

    fn observer_class() -> Option<&'static Class> {
        if let Some(class) = Class::get(OBSERVER_CLASS_NAME) {
            return Some(class);
        }
        let mut decl = ClassDecl::new(OBSERVER_CLASS_NAME, class!(NSObject))?;
        unsafe {
            decl.add_method(
                sel!(workspaceDidActivateApp:),
                did_activate_app as extern "C" fn(&Object, Sel, id),
            );
        }
        Some(decl.register())
    }

    /// Registration with the shared workspace's notification center.
    ///
    /// Notifications are only delivered while the main run loop runs. Must be created and
    /// dropped on the main thread.
    pub struct ActivationObserver {
        observer: id,
        center: id,
    }

    impl ActivationObserver {
        pub fn register() -> Result<Self, String> {
            let class = observer_class()
                .ok_or_else(|| "Failed to declare the activation observer class".to_string())?;

            // SAFETY: message sends on NSWorkspace objects; the temporary name is released and
            // everything autoreleased is drained before returning
            unsafe {
                let pool = NSAutoreleasePool::new(nil);

                let observer: id = msg_send![class, new];
                let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
                let center: id = msg_send![workspace, notificationCenter];
                if observer == nil || center == nil {
                    pool.drain();
                    return Err("NSWorkspace notification center is unavailable".to_string());
                }

                let name = NSString::alloc(nil).init_str(DID_ACTIVATE_NOTIFICATION);
                let _: () = msg_send![center,
                    addObserver: observer
                    selector: sel!(workspaceDidActivateApp:)
                    name: name
                    object: nil
                ];
                let _: () = msg_send![name, release];
                let _: () = msg_send![center, retain];

                pool.drain();
                crate::debug!("Listening for application activation");
                Ok(Self { observer, center })
            }
        }
    }

    impl Drop for ActivationObserver {
        fn drop(&mut self) {
            // SAFETY: both objects were retained in `register`
            unsafe {
                let _: () = msg_send![self.center, removeObserver: self.observer];
                let _: () = msg_send![self.observer, release];
                let _: () = msg_send![self.center, release];
            }
        }
    }
}

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
