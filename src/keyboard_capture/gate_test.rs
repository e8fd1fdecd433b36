use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct FakeProvider {
    granted: AtomicBool,
    prompts: AtomicUsize,
}

impl PermissionProvider for FakeProvider {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn prompt(&self) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.is_granted()
    }

    fn open_settings(&self) -> Result<(), String> {
        Ok(())
    }
}

fn gate() -> (PermissionGate, Arc<FakeProvider>) {
    let provider = Arc::new(FakeProvider::default());
    (PermissionGate::new(provider.clone()), provider)
}

#[test]
fn prompt_skipped_when_granted() {
    let (gate, provider) = gate();
    provider.granted.store(true, Ordering::SeqCst);

    assert!(gate.prompt_if_needed());
    assert_eq!(provider.prompts.load(Ordering::SeqCst), 0);
}

#[test]
fn prompt_shown_when_not_granted() {
    let (gate, provider) = gate();

    assert!(!gate.prompt_if_needed());
    assert!(!gate.prompt_if_needed());
    assert_eq!(provider.prompts.load(Ordering::SeqCst), 2);
}

#[test]
fn first_check_records_baseline_only() {
    let (gate, _provider) = gate();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    gate.on_change(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!gate.check());
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn listeners_fire_on_each_transition() {
    let (gate, provider) = gate();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    gate.on_change(move |granted| sink.lock().push(granted));

    gate.check();
    provider.granted.store(true, Ordering::SeqCst);
    assert!(gate.check());
    assert!(gate.check());
    provider.granted.store(false, Ordering::SeqCst);
    assert!(!gate.check());

    assert_eq!(*seen.lock(), vec![true, false]);
}

#[test]
fn is_granted_always_requeries() {
    let (gate, provider) = gate();
    assert!(!gate.is_granted());
    provider.granted.store(true, Ordering::SeqCst);
    assert!(gate.is_granted());
}
