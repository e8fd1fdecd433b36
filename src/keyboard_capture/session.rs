// Event tap session: owns the installed OS listener and its lifecycle

use crate::cut_mode::KeyInterceptor;
use std::sync::Arc;
use thiserror::Error;

/// Errors from installing the keyboard listener
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The OS refused the tap; almost always missing Accessibility permission
    #[error("Accessibility permission is required to intercept keyboard shortcuts")]
    PermissionDenied,
    /// The tap could not be set up for another reason
    #[error("Failed to install event tap: {0}")]
    InstallFailed(String),
}

/// An OS facility that delivers key-down events to a `KeyInterceptor`.
///
/// `install` must have the listener running when it returns Ok; `uninstall` must have
/// stopped delivery when it returns.
pub trait TapBackend: Send {
    fn install(&mut self, interceptor: Arc<KeyInterceptor>) -> Result<(), CaptureError>;
    fn uninstall(&mut self);
    fn is_installed(&self) -> bool;
}

/// At most one live listener, plus the rule that no cut stays armed without one
pub struct EventTapSession<B: TapBackend> {
    backend: B,
    interceptor: Arc<KeyInterceptor>,
}

impl<B: TapBackend> EventTapSession<B> {
    pub fn new(backend: B, interceptor: Arc<KeyInterceptor>) -> Self {
        Self {
            backend,
            interceptor,
        }
    }

    /// Install and enable the listener. No-op while already active.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.backend.is_installed() {
            return Ok(());
        }

        self.interceptor.machine().reset();
        self.backend.install(self.interceptor.clone())?;
        self.interceptor.set_live(true);
        crate::info!("Event tap installed");
        Ok(())
    }

    /// Disable and release the listener, then drop any pending cut.
    ///
    /// Delivery is gated off before teardown, so a callback racing with `stop` passes its
    /// event through untouched.
    pub fn stop(&mut self) {
        self.interceptor.set_live(false);
        if self.backend.is_installed() {
            self.backend.uninstall();
            crate::info!("Event tap removed");
        }
        if self.interceptor.machine().reset() {
            crate::debug!("Pending cut cleared by stop");
        }
    }

    pub fn is_active(&self) -> bool {
        self.backend.is_installed()
    }

    pub fn interceptor(&self) -> &Arc<KeyInterceptor> {
        &self.interceptor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: TapBackend> Drop for EventTapSession<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
