//! macOS virtual key codes used by the cut/paste hotkeys.

/// X key (cut)
pub const KEY_X: u16 = 7;
/// C key (copy)
pub const KEY_C: u16 = 8;
/// V key (paste / move)
pub const KEY_V: u16 = 9;
/// Escape key (cancel)
pub const KEY_ESCAPE: u16 = 53;

/// Convert macOS key code to human-readable key name
pub fn keycode_to_name(key_code: u16) -> String {
    let name = match key_code {
        0 => "A",
        1 => "S",
        2 => "D",
        3 => "F",
        4 => "H",
        5 => "G",
        6 => "Z",
        KEY_X => "X",
        KEY_C => "C",
        KEY_V => "V",
        11 => "B",
        12 => "Q",
        13 => "W",
        14 => "E",
        15 => "R",
        16 => "Y",
        17 => "T",
        31 => "O",
        32 => "U",
        34 => "I",
        35 => "P",
        37 => "L",
        38 => "J",
        40 => "K",
        45 => "N",
        46 => "M",
        36 => "Enter",
        48 => "Tab",
        49 => "Space",
        51 => "Backspace",
        KEY_ESCAPE => "Escape",
        _ => return format!("Key({})", key_code),
    };
    name.to_string()
}
