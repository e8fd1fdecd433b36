// Dispatcher thread for cut-mode events
//
// Follows the same handle-plus-thread shape as a dedicated worker: a bounded channel feeds a
// named thread, and dropping the handle shuts the thread down and joins it. Producers never block:
// when the queue is full the event is counted and dropped.

use super::{CutEvent, NotificationSink};
use crate::settings::SharedConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Events that can wait in the queue before new ones are dropped
pub const DISPATCH_QUEUE_CAPACITY: usize = 64;

enum DispatchMessage {
    Event(CutEvent),
    Shutdown,
}

/// Cheap, cloneable producer side of the dispatch queue.
///
/// `report` never blocks, allocates, or logs, so it is safe to call from the event tap callback.
#[derive(Clone)]
pub struct Notifier {
    sender: SyncSender<DispatchMessage>,
    dropped: Arc<AtomicU64>,
}

impl Notifier {
    pub fn report(&self, event: CutEvent) {
        match self.sender.try_send(DispatchMessage::Event(event)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of events dropped since the dispatcher last reported drops
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Handle to the dispatcher thread
///
/// When dropped, queued events are drained, then the thread exits and is joined.
pub struct NotificationDispatcher {
    notifier: Notifier,
    thread: Option<JoinHandle<()>>,
}

impl NotificationDispatcher {
    /// Spawn the dispatcher thread.
    ///
    /// Notification preferences are read from `config` when each event is handled, so changes
    /// apply to the next event without restarting anything.
    pub fn spawn(sink: Arc<dyn NotificationSink>, config: SharedConfig) -> std::io::Result<Self> {
        Self::spawn_with_capacity(sink, config, DISPATCH_QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(
        sink: Arc<dyn NotificationSink>,
        config: SharedConfig,
        capacity: usize,
    ) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let dropped = Arc::new(AtomicU64::new(0));
        let thread_dropped = dropped.clone();

        let thread = thread::Builder::new()
            .name("cut-event-dispatch".to_string())
            .spawn(move || dispatcher_main(receiver, sink, config, thread_dropped))?;

        Ok(Self {
            notifier: Notifier { sender, dropped },
            thread: Some(thread),
        })
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }
}

impl Drop for NotificationDispatcher {
    fn drop(&mut self) {
        // Ignore errors if the thread already exited
        let _ = self.notifier.sender.send(DispatchMessage::Shutdown);

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn dispatcher_main(
    receiver: Receiver<DispatchMessage>,
    sink: Arc<dyn NotificationSink>,
    config: SharedConfig,
    dropped: Arc<AtomicU64>,
) {
    crate::debug!("Cut event dispatcher started");

    while let Ok(message) = receiver.recv() {
        report_dropped(&dropped);
        match message {
            DispatchMessage::Event(event) => handle_event(event, sink.as_ref(), &config),
            DispatchMessage::Shutdown => break,
        }
    }

    report_dropped(&dropped);
    crate::debug!("Cut event dispatcher stopped");
}

fn report_dropped(dropped: &AtomicU64) {
    let count = dropped.swap(0, Ordering::Relaxed);
    if count > 0 {
        crate::warn!("Dropped {} cut-mode events: dispatch queue was full", count);
    }
}

fn handle_event(event: CutEvent, sink: &dyn NotificationSink, config: &SharedConfig) {
    match event {
        CutEvent::Armed => crate::info!("Cut mode armed"),
        CutEvent::Moved => crate::info!("Paste converted to move"),
        CutEvent::Cancelled => crate::info!("Cut mode cancelled"),
        CutEvent::TimedOut => crate::info!("Cut mode timed out"),
        CutEvent::FocusLost => crate::debug!("Cut mode cleared: target app lost focus"),
        CutEvent::TapReenabled => crate::warn!("Event tap was disabled by the system, re-enabled"),
        CutEvent::SlowCallback { micros } => {
            crate::warn!("Event tap callback took {}µs", micros)
        }
        CutEvent::PermissionChanged { granted } => {
            crate::debug!("Accessibility permission transition: granted={}", granted)
        }
    }

    let Some(kind) = event.notification() else {
        return;
    };

    let snapshot = config.snapshot();
    if !snapshot.notifications_enabled {
        return;
    }

    if let Err(e) = sink.post(kind.title(), kind.subtitle(), snapshot.sound_enabled) {
        crate::warn!("Failed to post '{}' notification: {}", kind.title(), e);
    }
}
