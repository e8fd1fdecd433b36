// Mock OS seams shared by unit tests

use crate::cut_mode::{Disposition, KeyInterceptor, Keystroke};
use crate::keyboard::EventSynthesizer;
use crate::keyboard_capture::{CaptureError, KeyInput, PermissionProvider, TapBackend};
use crate::notifications::{Notifier, NotificationDispatcher, NotificationSink};
use crate::settings::SharedConfig;
use crate::window_context::{FocusProbe, FrontmostApp, TextEditState};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const TARGET_PID: i32 = 100;
pub const OTHER_PID: i32 = 200;

/// Focus probe whose answers are set by the test
pub struct MockFocusProbe {
    frontmost: Mutex<Option<FrontmostApp>>,
    text_state: Mutex<TextEditState>,
    text_queries: AtomicUsize,
}

impl MockFocusProbe {
    /// Target app frontmost, nothing being edited
    pub fn target() -> Self {
        Self {
            frontmost: Mutex::new(Some(FrontmostApp {
                pid: TARGET_PID,
                is_target: true,
            })),
            text_state: Mutex::new(TextEditState::NotEditing),
            text_queries: AtomicUsize::new(0),
        }
    }

    pub fn set_frontmost(&self, app: Option<FrontmostApp>) {
        *self.frontmost.lock() = app;
    }

    pub fn set_target_frontmost(&self) {
        self.set_frontmost(Some(FrontmostApp {
            pid: TARGET_PID,
            is_target: true,
        }));
    }

    pub fn set_other_frontmost(&self) {
        self.set_frontmost(Some(FrontmostApp {
            pid: OTHER_PID,
            is_target: false,
        }));
    }

    pub fn set_text_state(&self, state: TextEditState) {
        *self.text_state.lock() = state;
    }

    pub fn text_queries(&self) -> usize {
        self.text_queries.load(Ordering::SeqCst)
    }
}

impl FocusProbe for MockFocusProbe {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        *self.frontmost.lock()
    }

    fn text_edit_state(&self, _pid: i32) -> TextEditState {
        self.text_queries.fetch_add(1, Ordering::SeqCst);
        *self.text_state.lock()
    }
}

/// Synthesizer that records what it was asked to post
#[derive(Default)]
pub struct RecordingSynthesizer {
    emitted: Mutex<Vec<Keystroke>>,
}

impl RecordingSynthesizer {
    pub fn emitted(&self) -> Vec<Keystroke> {
        self.emitted.lock().clone()
    }
}

impl EventSynthesizer for RecordingSynthesizer {
    fn emit(&self, stroke: Keystroke) {
        self.emitted.lock().push(stroke);
    }
}

/// Notification sink that records titles
#[derive(Default)]
pub struct RecordingSink {
    titles: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn post(&self, title: &str, _subtitle: &str, _sound: bool) -> Result<(), String> {
        self.titles.lock().push(title.to_string());
        Ok(())
    }
}

/// Observable state behind `FakeTapBackend`
#[derive(Default)]
pub struct FakeTap {
    pub installs: AtomicUsize,
    pub uninstalls: AtomicUsize,
    /// Install attempts that fail before the next one succeeds
    pub failures_remaining: AtomicUsize,
    /// Make every install fail, regardless of `failures_remaining`
    pub always_fail: AtomicBool,
    interceptor: Mutex<Option<Arc<KeyInterceptor>>>,
}

impl FakeTap {
    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn uninstalls(&self) -> usize {
        self.uninstalls.load(Ordering::SeqCst)
    }

    pub fn is_installed(&self) -> bool {
        self.interceptor.lock().is_some()
    }

    /// Deliver a key-down as the OS would. None when no listener is installed.
    pub fn deliver(&self, key: KeyInput) -> Option<Disposition> {
        let interceptor = self.interceptor.lock().clone()?;
        Some(interceptor.on_key_down(key))
    }
}

/// In-memory `TapBackend`
pub struct FakeTapBackend {
    pub tap: Arc<FakeTap>,
}

impl FakeTapBackend {
    pub fn new() -> (Self, Arc<FakeTap>) {
        let tap = Arc::new(FakeTap::default());
        (Self { tap: tap.clone() }, tap)
    }
}

impl TapBackend for FakeTapBackend {
    fn install(&mut self, interceptor: Arc<KeyInterceptor>) -> Result<(), CaptureError> {
        if self.tap.always_fail.load(Ordering::SeqCst) {
            return Err(CaptureError::PermissionDenied);
        }
        let remaining = self.tap.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.tap
                .failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(CaptureError::PermissionDenied);
        }
        self.tap.installs.fetch_add(1, Ordering::SeqCst);
        *self.tap.interceptor.lock() = Some(interceptor);
        Ok(())
    }

    fn uninstall(&mut self) {
        self.tap.uninstalls.fetch_add(1, Ordering::SeqCst);
        *self.tap.interceptor.lock() = None;
    }

    fn is_installed(&self) -> bool {
        self.tap.is_installed()
    }
}

/// Permission provider toggled by the test
#[derive(Default)]
pub struct FakePermission {
    pub granted: AtomicBool,
    pub prompts: AtomicUsize,
    pub settings_opened: AtomicUsize,
}

impl FakePermission {
    pub fn granted() -> Self {
        let permission = Self::default();
        permission.set_granted(true);
        permission
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl PermissionProvider for FakePermission {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn prompt(&self) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.is_granted()
    }

    fn open_settings(&self) -> Result<(), String> {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Interceptor wired to mocks, with target app frontmost and nothing being edited
pub struct InterceptorFixture {
    pub interceptor: Arc<KeyInterceptor>,
    pub probe: Arc<MockFocusProbe>,
    pub synth: Arc<RecordingSynthesizer>,
    pub notifier: Notifier,
    pub dispatcher: NotificationDispatcher,
}

impl InterceptorFixture {
    pub fn new(config: SharedConfig) -> Self {
        let probe = Arc::new(MockFocusProbe::target());
        let synth = Arc::new(RecordingSynthesizer::default());
        let dispatcher =
            NotificationDispatcher::spawn(Arc::new(RecordingSink::default()), config.clone())
                .expect("spawn dispatcher");
        let notifier = dispatcher.notifier();
        let interceptor = Arc::new(KeyInterceptor::new(
            config,
            probe.clone(),
            synth.clone(),
            notifier.clone(),
        ));
        Self {
            interceptor,
            probe,
            synth,
            notifier,
            dispatcher,
        }
    }
}
