use super::{EventSynthesizer, SYNTHETIC_EVENT_MARKER};
use crate::cut_mode::Keystroke;
use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation, CGKeyCode, EventField};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

/// `EventSynthesizer` that posts marked keyboard events at the HID level
#[derive(Debug, Default, Clone, Copy)]
pub struct CgEventSynthesizer;

impl CgEventSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl EventSynthesizer for CgEventSynthesizer {
    fn emit(&self, stroke: Keystroke) {
        // Don't start new synthesis during shutdown.
        if crate::shutdown::is_shutting_down() {
            return;
        }

        let Ok(source) = CGEventSource::new(CGEventSourceStateID::HIDSystemState) else {
            return;
        };

        let key_code = stroke.key_code as CGKeyCode;

        // Create BOTH events before posting any, so we never post key-down without also
        // being able to post a key-up.
        let Ok(event_down) = CGEvent::new_keyboard_event(source.clone(), key_code, true) else {
            return;
        };
        let Ok(event_up) = CGEvent::new_keyboard_event(source, key_code, false) else {
            return;
        };

        let flags = CGEventFlags::from_bits_truncate(stroke.modifiers.to_cg_flags());
        for event in [&event_down, &event_up] {
            event.set_flags(flags);
            event.set_integer_value_field(
                EventField::EVENT_SOURCE_USER_DATA,
                SYNTHETIC_EVENT_MARKER,
            );
        }

        event_down.post(CGEventTapLocation::HID);
        event_up.post(CGEventTapLocation::HID);
    }
}
