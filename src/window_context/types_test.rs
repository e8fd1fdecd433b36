use super::*;

#[test]
fn only_definite_not_editing_allows_cut_mode() {
    assert!(TextEditState::NotEditing.allows_cut_mode());
    assert!(!TextEditState::Editing.allows_cut_mode());
    assert!(!TextEditState::Unknown.allows_cut_mode());
}

#[test]
fn target_is_finder() {
    assert_eq!(TARGET_BUNDLE_ID, "com.apple.finder");
}
