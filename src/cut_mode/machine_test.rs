use super::*;
use crate::cut_mode::hotkeys::{COPY_EQUIVALENT, MOVE_EQUIVALENT};
use crate::keyboard_capture::keycodes::{KEY_ESCAPE, KEY_V, KEY_X};
use crate::keyboard_capture::ModifierSet;
use crate::settings::{CutTimeout, FeatureConfig};
use crate::test_support::MockFocusProbe;
use crate::window_context::TextEditState;
use std::time::Duration;

const KEY_A: u16 = 0;

fn cut() -> KeyInput {
    KeyInput::new(KEY_X, ModifierSet::COMMAND)
}

fn paste() -> KeyInput {
    KeyInput::new(KEY_V, ModifierSet::COMMAND)
}

fn escape() -> KeyInput {
    KeyInput::new(KEY_ESCAPE, ModifierSet::NONE)
}

fn letter_a() -> KeyInput {
    KeyInput::new(KEY_A, ModifierSet::NONE)
}

fn machine_with_timeout(cut_timeout: CutTimeout) -> CutModeMachine {
    CutModeMachine::new(SharedConfig::new(FeatureConfig {
        cut_timeout,
        ..FeatureConfig::default()
    }))
}

fn machine() -> CutModeMachine {
    machine_with_timeout(CutTimeout::Seconds(300))
}

#[test]
fn other_app_passes_everything_through() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    probe.set_other_frontmost();
    let now = Instant::now();

    for key in [cut(), paste(), escape(), letter_a()] {
        let decision = machine.decide(&key, &probe, now);
        assert_eq!(decision.verdict, Verdict::PassThrough);
        assert_eq!(decision.event, None);
        assert!(!machine.is_armed());
    }
    assert_eq!(probe.text_queries(), 0);
}

#[test]
fn unknown_frontmost_app_passes_through() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    probe.set_frontmost(None);

    let decision = machine.decide(&cut(), &probe, Instant::now());
    assert_eq!(decision.verdict, Verdict::PassThrough);
    assert!(!machine.is_armed());
}

#[test]
fn text_editing_leaves_cut_alone() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    probe.set_text_state(TextEditState::Editing);

    let decision = machine.decide(&cut(), &probe, Instant::now());
    assert_eq!(decision, Decision::pass(false));
    assert!(!machine.is_armed());
    assert_eq!(probe.text_queries(), 1);
}

#[test]
fn failed_accessibility_query_leaves_cut_alone() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    probe.set_text_state(TextEditState::Unknown);

    let decision = machine.decide(&cut(), &probe, Instant::now());
    assert_eq!(decision.verdict, Verdict::PassThrough);
    assert!(!machine.is_armed());
}

#[test]
fn cut_then_move_round_trip() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let now = Instant::now();

    let armed = machine.decide(&cut(), &probe, now);
    assert_eq!(
        armed.verdict,
        Verdict::ConsumeAndSynthesize(COPY_EQUIVALENT)
    );
    assert_eq!(armed.event, Some(CutEvent::Armed));
    assert_eq!(machine.state().armed_since(), Some(now));

    let moved = machine.decide(&paste(), &probe, now + Duration::from_secs(1));
    assert_eq!(
        moved.verdict,
        Verdict::ConsumeAndSynthesize(MOVE_EQUIVALENT)
    );
    assert_eq!(moved.event, Some(CutEvent::Moved));
    assert!(!machine.is_armed());
}

#[test]
fn paste_while_idle_is_ordinary_paste() {
    let machine = machine();
    let probe = MockFocusProbe::target();

    let decision = machine.decide(&paste(), &probe, Instant::now());
    assert_eq!(decision, Decision::pass(false));
}

#[test]
fn move_does_not_consult_text_edit_guard() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let now = Instant::now();
    machine.decide(&cut(), &probe, now);

    probe.set_text_state(TextEditState::Editing);
    let moved = machine.decide(&paste(), &probe, now);
    assert_eq!(moved.event, Some(CutEvent::Moved));
    assert_eq!(probe.text_queries(), 1);
}

#[test]
fn escape_cancels_without_synthesis() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let now = Instant::now();
    machine.decide(&cut(), &probe, now);

    let cancelled = machine.decide(&escape(), &probe, now);
    assert_eq!(cancelled.verdict, Verdict::Consume);
    assert_eq!(cancelled.event, Some(CutEvent::Cancelled));
    assert!(!machine.is_armed());
}

#[test]
fn escape_while_idle_passes_through() {
    let machine = machine();
    let probe = MockFocusProbe::target();

    let decision = machine.decide(&escape(), &probe, Instant::now());
    assert_eq!(decision, Decision::pass(false));
}

#[test]
fn cut_while_armed_refreshes_timestamp() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let first = Instant::now();
    let second = first + Duration::from_secs(5);

    machine.decide(&cut(), &probe, first);
    let rearmed = machine.decide(&cut(), &probe, second);
    assert_eq!(rearmed.event, Some(CutEvent::Armed));
    assert_eq!(machine.state().armed_since(), Some(second));
}

#[test]
fn timeout_clears_before_hotkey_matching() {
    let machine = machine_with_timeout(CutTimeout::Seconds(1));
    let probe = MockFocusProbe::target();
    let armed_at = Instant::now();
    machine.decide(&cut(), &probe, armed_at);

    // The paste arrives after expiry, so it is an ordinary paste
    let decision = machine.decide(&paste(), &probe, armed_at + Duration::from_millis(1500));
    assert_eq!(decision, Decision::pass(true));
    assert!(!machine.is_armed());
}

#[test]
fn timeout_is_strictly_greater_than() {
    let machine = machine_with_timeout(CutTimeout::Seconds(1));
    let probe = MockFocusProbe::target();
    let armed_at = Instant::now();
    machine.decide(&cut(), &probe, armed_at);

    let decision = machine.decide(&letter_a(), &probe, armed_at + Duration::from_secs(1));
    assert!(!decision.expired);
    assert!(machine.is_armed());
}

#[test]
fn cut_after_expiry_reports_expiry_and_rearms() {
    let machine = machine_with_timeout(CutTimeout::Seconds(1));
    let probe = MockFocusProbe::target();
    let armed_at = Instant::now();
    machine.decide(&cut(), &probe, armed_at);

    let later = armed_at + Duration::from_secs(2);
    let decision = machine.decide(&cut(), &probe, later);
    assert!(decision.expired);
    assert_eq!(decision.event, Some(CutEvent::Armed));
    assert_eq!(machine.state().armed_since(), Some(later));
}

#[test]
fn never_timeout_never_expires() {
    let machine = machine_with_timeout(CutTimeout::Never);
    let probe = MockFocusProbe::target();
    let armed_at = Instant::now();
    machine.decide(&cut(), &probe, armed_at);

    let much_later = armed_at + Duration::from_secs(60 * 60 * 24 * 30);
    let decision = machine.decide(&letter_a(), &probe, much_later);
    assert!(!decision.expired);
    assert!(machine.is_armed());

    let moved = machine.decide(&paste(), &probe, much_later);
    assert_eq!(moved.event, Some(CutEvent::Moved));
}

#[test]
fn timeout_change_applies_to_next_key() {
    let config = SharedConfig::default();
    let machine = CutModeMachine::new(config.clone());
    let probe = MockFocusProbe::target();
    let armed_at = Instant::now();
    machine.decide(&cut(), &probe, armed_at);

    config.publish(FeatureConfig {
        cut_timeout: CutTimeout::Seconds(1),
        ..config.snapshot()
    });
    let decision = machine.decide(&letter_a(), &probe, armed_at + Duration::from_secs(2));
    assert!(decision.expired);
}

#[test]
fn extra_modifier_never_arms() {
    let machine = machine();
    let probe = MockFocusProbe::target();

    for extra in [ModifierSet::SHIFT, ModifierSet::OPTION, ModifierSet::CONTROL] {
        let key = KeyInput::new(KEY_X, ModifierSet::COMMAND | extra);
        let decision = machine.decide(&key, &probe, Instant::now());
        assert_eq!(decision.verdict, Verdict::PassThrough);
        assert!(!machine.is_armed());
    }
    assert_eq!(probe.text_queries(), 0);
}

#[test]
fn losing_focus_clears_silently() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let now = Instant::now();
    machine.decide(&cut(), &probe, now);

    probe.set_other_frontmost();
    let decision = machine.decide(&paste(), &probe, now);
    assert_eq!(decision.verdict, Verdict::PassThrough);
    assert_eq!(decision.event, Some(CutEvent::FocusLost));
    assert_eq!(decision.event.and_then(|e| e.notification()), None);
    assert!(!machine.is_armed());

    // Returning to the target does not resurrect the cut
    probe.set_target_frontmost();
    let decision = machine.decide(&paste(), &probe, now);
    assert_eq!(decision, Decision::pass(false));
}

#[test]
fn unrelated_key_keeps_armed_state() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    let now = Instant::now();
    machine.decide(&cut(), &probe, now);

    let decision = machine.decide(&letter_a(), &probe, now);
    assert_eq!(decision, Decision::pass(false));
    assert!(machine.is_armed());
}

#[test]
fn reset_reports_whether_armed() {
    let machine = machine();
    let probe = MockFocusProbe::target();
    assert!(!machine.reset());
    machine.decide(&cut(), &probe, Instant::now());
    assert!(machine.reset());
    assert!(!machine.is_armed());
}
