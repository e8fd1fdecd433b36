// Cut-mode: reinterprets ⌘X / ⌘V in the target app as "mark for move" / "move here"

mod hotkeys;
mod interceptor;
mod machine;
mod state;

pub use hotkeys::{
    classify, Hotkey, Keystroke, CANCEL_KEY_CODE, COPY_EQUIVALENT, CUT_HOTKEY, MOVE_EQUIVALENT,
    MOVE_HOTKEY,
};
pub use interceptor::{Disposition, KeyInterceptor};
pub use machine::{CutModeMachine, Decision, Verdict};
pub use state::CutArmState;
