// Focus context types for the cut-mode state machine

/// Bundle identifier of the application whose cut/paste is augmented
pub const TARGET_BUNDLE_ID: &str = "com.apple.finder";

/// The frontmost application at the moment a key went down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmostApp {
    /// Process identifier, used for accessibility queries
    pub pid: i32,
    /// Whether the app's bundle identifier equals the target's
    pub is_target: bool,
}

/// Result of asking the focused UI element whether it is editing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditState {
    /// The focused element exposes a text selection (e.g. renaming a file)
    Editing,
    /// The focused element has no text selection attribute
    NotEditing,
    /// The query failed or timed out
    Unknown,
}

impl TextEditState {
    /// Only a definite "not editing" may reinterpret ⌘X as a file cut.
    /// Unknown is treated like editing so a real text cut is never swallowed.
    pub fn allows_cut_mode(&self) -> bool {
        matches!(self, TextEditState::NotEditing)
    }
}

/// OS queries the state machine makes for every key-down.
///
/// Implementations are called on the event tap thread and must return quickly.
pub trait FocusProbe: Send + Sync {
    /// The current frontmost application, or None if it cannot be determined
    fn frontmost_app(&self) -> Option<FrontmostApp>;

    /// Whether the focused element of `pid` is in a text-editing context
    fn text_edit_state(&self, pid: i32) -> TextEditState;
}
