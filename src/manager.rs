// Cut/paste feature manager
// Owns the enable toggle and keeps the event tap session in step with Accessibility permission.
//
// Permission changes have no reliable push source, so every trigger (startup, the delayed
// install retry, the follow-up poll after a prompt, app activation, the fallback poll) funnels
// into `recheck_permission`. Background work runs as tokio tasks that hold only a weak
// reference and are aborted when the feature is disabled.

use crate::events::{CutPasteStatus, StatusEmitter};
use crate::keyboard_capture::{CaptureError, EventTapSession, PermissionGate, TapBackend};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// What prompted a permission re-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecheckTrigger {
    Startup,
    InstallRetry,
    PromptFollowUp,
    AppActivated,
    Poll,
    Manual,
}

/// Timing of the background re-checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecheckSchedule {
    /// Delay before the single retry after a failed install
    pub install_retry_delay: Duration,
    /// Interval of the poll that follows a permission prompt
    pub prompt_poll_interval: Duration,
    /// Attempts before the post-prompt poll gives up
    pub prompt_poll_attempts: u32,
    /// Interval of the burst that follows app activation
    pub activation_interval: Duration,
    /// Attempts in the activation burst
    pub activation_attempts: u32,
    /// Interval of the always-on fallback poll while enabled
    pub fallback_poll_interval: Duration,
}

impl Default for RecheckSchedule {
    fn default() -> Self {
        Self {
            install_retry_delay: Duration::from_millis(800),
            prompt_poll_interval: Duration::from_secs(1),
            prompt_poll_attempts: 30,
            activation_interval: Duration::from_millis(500),
            activation_attempts: 8,
            fallback_poll_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Default)]
struct BackgroundTasks {
    install_retry: Option<JoinHandle<()>>,
    prompt_poll: Option<JoinHandle<()>>,
    activation: Option<JoinHandle<()>>,
    fallback_poll: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    fn abort_all(&mut self) {
        for task in [
            self.install_retry.take(),
            self.prompt_poll.take(),
            self.activation.take(),
            self.fallback_poll.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

fn replace_task(slot: &mut Option<JoinHandle<()>>, task: JoinHandle<()>) {
    if let Some(previous) = slot.replace(task) {
        previous.abort();
    }
}

struct ManagerInner<B: TapBackend> {
    session: Mutex<EventTapSession<B>>,
    enabled: AtomicBool,
    gate: PermissionGate,
    status_emitter: Arc<dyn StatusEmitter>,
    last_status: Mutex<Option<(bool, bool, bool)>>,
    runtime: Handle,
    schedule: RecheckSchedule,
    tasks: Mutex<BackgroundTasks>,
}

impl<B: TapBackend> Drop for ManagerInner<B> {
    fn drop(&mut self) {
        self.tasks.get_mut().abort_all();
    }
}

/// Manager for the cut/paste feature
///
/// Cheap to clone; all clones drive the same session.
pub struct CutPasteManager<B: TapBackend + 'static> {
    inner: Arc<ManagerInner<B>>,
}

impl<B: TapBackend + 'static> Clone for CutPasteManager<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: TapBackend + 'static> CutPasteManager<B> {
    /// Create a disabled manager. Background tasks are spawned on `runtime`.
    pub fn new(
        session: EventTapSession<B>,
        gate: PermissionGate,
        status_emitter: Arc<dyn StatusEmitter>,
        runtime: Handle,
        schedule: RecheckSchedule,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                session: Mutex::new(session),
                enabled: AtomicBool::new(false),
                gate,
                status_emitter,
                last_status: Mutex::new(None),
                runtime,
                schedule,
                tasks: Mutex::new(BackgroundTasks::default()),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.inner.session.lock().is_active()
    }

    pub fn status(&self) -> CutPasteStatus {
        CutPasteStatus::new(
            self.is_enabled(),
            self.is_active(),
            self.inner.gate.is_granted(),
        )
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.inner.gate
    }

    /// Turn the whole feature on or off.
    ///
    /// Disabling tears the tap down synchronously and drops any pending cut before returning.
    pub fn set_enabled(&self, enabled: bool) {
        if self.inner.enabled.swap(enabled, Ordering::SeqCst) == enabled {
            return;
        }

        if enabled {
            crate::info!("Cut/paste enabled");
            self.inner.gate.check();
            self.try_start(true);
            self.spawn_fallback_poll();
        } else {
            crate::info!("Cut/paste disabled");
            self.inner.tasks.lock().abort_all();
            self.inner.session.lock().stop();
        }
        self.emit_status();
    }

    /// Bring the session in line with the current permission. Returns whether it is active.
    ///
    /// Granted and inactive starts the session; revoked and active stops it, since the OS has
    /// already stopped delivering events to the tap.
    pub fn recheck_permission(&self, trigger: RecheckTrigger) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let granted = self.inner.gate.check();
        let active = self.is_active();

        let active = match (granted, active) {
            (true, false) => {
                crate::debug!("Permission recheck ({:?}): granted, starting", trigger);
                self.try_start(false)
            }
            (false, true) => {
                crate::warn!("Permission recheck ({:?}): revoked, stopping", trigger);
                self.inner.session.lock().stop();
                false
            }
            (_, active) => active,
        };

        self.emit_status();
        active
    }

    /// Prompt for permission if needed, open the Accessibility settings pane, then poll
    /// until the grant arrives.
    pub fn open_system_preferences(&self) {
        self.inner.gate.prompt_if_needed();
        if let Err(e) = self.inner.gate.open_settings() {
            crate::warn!("{}", e);
        }
        self.spawn_prompt_follow_up();
    }

    /// The app came to the foreground: the user may just have granted permission
    pub fn on_app_activated(&self) {
        if !self.is_enabled() || self.is_active() {
            return;
        }
        self.spawn_burst(
            RecheckTrigger::AppActivated,
            self.inner.schedule.activation_interval,
            self.inner.schedule.activation_attempts,
            |tasks| &mut tasks.activation,
        );
    }

    /// Try to install the tap. On failure, optionally prompt, then schedule one retry.
    fn try_start(&self, allow_prompt: bool) -> bool {
        let Some(result) = self.start_if_enabled() else {
            return false;
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                crate::warn!("{}", e);
                if allow_prompt && !self.inner.gate.prompt_if_needed() {
                    self.spawn_prompt_follow_up();
                }
                self.spawn_install_retry();
                false
            }
        }
    }

    /// Start the session unless the feature is disabled. None when disabled.
    ///
    /// The enabled flag is read under the session lock, so a concurrent `set_enabled(false)`
    /// either sees the started tap and stops it or makes this a no-op.
    fn start_if_enabled(&self) -> Option<Result<(), CaptureError>> {
        let mut session = self.inner.session.lock();
        if !self.is_enabled() {
            return None;
        }
        Some(session.start())
    }

    fn spawn_install_retry(&self) {
        let weak = Arc::downgrade(&self.inner);
        let delay = self.inner.schedule.install_retry_delay;
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(manager) = upgrade(&weak) else {
                return;
            };
            if manager.is_active() {
                return;
            }
            match manager.start_if_enabled() {
                Some(Ok(())) => crate::info!("Event tap installed on retry"),
                Some(Err(e)) => crate::warn!("Retry failed: {}", e),
                None => return,
            }
            manager.emit_status();
        });
        replace_task(&mut self.inner.tasks.lock().install_retry, task);
    }

    fn spawn_prompt_follow_up(&self) {
        self.spawn_burst(
            RecheckTrigger::PromptFollowUp,
            self.inner.schedule.prompt_poll_interval,
            self.inner.schedule.prompt_poll_attempts,
            |tasks| &mut tasks.prompt_poll,
        );
    }

    /// Re-check at `interval` up to `attempts` times, stopping once the session is live
    fn spawn_burst(
        &self,
        trigger: RecheckTrigger,
        interval: Duration,
        attempts: u32,
        slot: fn(&mut BackgroundTasks) -> &mut Option<JoinHandle<()>>,
    ) {
        let weak = Arc::downgrade(&self.inner);
        let task = self.inner.runtime.spawn(async move {
            for _ in 0..attempts {
                tokio::time::sleep(interval).await;
                let Some(manager) = upgrade(&weak) else {
                    return;
                };
                if manager.recheck_permission(trigger) {
                    return;
                }
            }
            crate::debug!("{:?} re-checks finished without an active session", trigger);
        });
        let mut tasks = self.inner.tasks.lock();
        replace_task(slot(&mut tasks), task);
    }

    fn spawn_fallback_poll(&self) {
        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.schedule.fallback_poll_interval;
        let task = self.inner.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(manager) = upgrade(&weak) else {
                    return;
                };
                manager.recheck_permission(RecheckTrigger::Poll);
            }
        });
        replace_task(&mut self.inner.tasks.lock().fallback_poll, task);
    }

    fn emit_status(&self) {
        let status = self.status();
        let key = (status.enabled, status.active, status.permission_granted);
        {
            let mut last = self.inner.last_status.lock();
            if *last == Some(key) {
                return;
            }
            *last = Some(key);
        }
        self.inner.status_emitter.emit_status(status);
    }
}

fn upgrade<B: TapBackend + 'static>(weak: &Weak<ManagerInner<B>>) -> Option<CutPasteManager<B>> {
    weak.upgrade().map(|inner| CutPasteManager { inner })
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
