//! Engine logical key codes.
//!
//! Printable keys use their upper-case ASCII value. Everything else lives in the
//! special range, `SPECIAL | n`.

pub const NONE: u32 = 0;
pub const SPECIAL: u32 = 1 << 22;

pub const ESCAPE: u32 = SPECIAL | 0x01;
pub const TAB: u32 = SPECIAL | 0x02;
pub const BACKTAB: u32 = SPECIAL | 0x03;
pub const BACKSPACE: u32 = SPECIAL | 0x04;
pub const ENTER: u32 = SPECIAL | 0x05;
pub const KP_ENTER: u32 = SPECIAL | 0x06;
pub const INSERT: u32 = SPECIAL | 0x07;
pub const DELETE: u32 = SPECIAL | 0x08;
pub const PAUSE: u32 = SPECIAL | 0x09;
pub const PRINT: u32 = SPECIAL | 0x0A;
pub const SYSREQ: u32 = SPECIAL | 0x0B;
pub const CLEAR: u32 = SPECIAL | 0x0C;
pub const HOME: u32 = SPECIAL | 0x0D;
pub const END: u32 = SPECIAL | 0x0E;
pub const LEFT: u32 = SPECIAL | 0x0F;
pub const UP: u32 = SPECIAL | 0x10;
pub const RIGHT: u32 = SPECIAL | 0x11;
pub const DOWN: u32 = SPECIAL | 0x12;
pub const PAGEUP: u32 = SPECIAL | 0x13;
pub const PAGEDOWN: u32 = SPECIAL | 0x14;
pub const SHIFT: u32 = SPECIAL | 0x15;
pub const CTRL: u32 = SPECIAL | 0x16;
pub const META: u32 = SPECIAL | 0x17;
pub const ALT: u32 = SPECIAL | 0x18;
pub const CAPSLOCK: u32 = SPECIAL | 0x19;
pub const NUMLOCK: u32 = SPECIAL | 0x1A;
pub const SCROLLLOCK: u32 = SPECIAL | 0x1B;

/// `F1..=F35` are contiguous starting here.
pub const F1: u32 = SPECIAL | 0x1C;

pub const KP_MULTIPLY: u32 = SPECIAL | 0x81;
pub const KP_DIVIDE: u32 = SPECIAL | 0x82;
pub const KP_SUBTRACT: u32 = SPECIAL | 0x83;
pub const KP_PERIOD: u32 = SPECIAL | 0x84;
pub const KP_ADD: u32 = SPECIAL | 0x85;
/// `KP_0..=KP_9` are contiguous starting here.
pub const KP_0: u32 = SPECIAL | 0x86;

pub const MENU: u32 = SPECIAL | 0x42;
pub const HELP: u32 = SPECIAL | 0x45;
pub const BACK: u32 = SPECIAL | 0x48;
pub const FORWARD: u32 = SPECIAL | 0x49;
pub const STOP: u32 = SPECIAL | 0x4A;
pub const REFRESH: u32 = SPECIAL | 0x4B;
pub const VOLUME_DOWN: u32 = SPECIAL | 0x4C;
pub const VOLUME_MUTE: u32 = SPECIAL | 0x4D;
pub const VOLUME_UP: u32 = SPECIAL | 0x4E;
pub const MEDIA_PLAY: u32 = SPECIAL | 0x54;
pub const MEDIA_STOP: u32 = SPECIAL | 0x55;
pub const MEDIA_PREVIOUS: u32 = SPECIAL | 0x56;
pub const MEDIA_NEXT: u32 = SPECIAL | 0x57;

pub const SPACE: u32 = 0x20;
pub const APOSTROPHE: u32 = 0x27;
pub const COMMA: u32 = 0x2C;
pub const MINUS: u32 = 0x2D;
pub const PERIOD: u32 = 0x2E;
pub const SLASH: u32 = 0x2F;
pub const SEMICOLON: u32 = 0x3B;
pub const EQUAL: u32 = 0x3D;
pub const BRACKET_LEFT: u32 = 0x5B;
pub const BACKSLASH: u32 = 0x5C;
pub const BRACKET_RIGHT: u32 = 0x5D;
pub const QUOTE_LEFT: u32 = 0x60;

/// `F1` through `F35`.
pub fn function_key(n: u32) -> Option<u32> {
    (1..=35).contains(&n).then(|| F1 + n - 1)
}

/// Keypad digits `0..=9`.
pub fn keypad_digit(n: u32) -> Option<u32> {
    (n <= 9).then(|| KP_0 + n)
}

/// Digit row `0..=9`.
pub fn digit(n: u32) -> Option<u32> {
    (n <= 9).then(|| u32::from(b'0') + n)
}

/// Letter keys map to their upper-case ASCII code.
pub fn letter(c: char) -> Option<u32> {
    c.is_ascii_alphabetic()
        .then(|| u32::from(c.to_ascii_uppercase()))
}

pub fn is_special(code: u32) -> bool {
    code & SPECIAL != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_are_contiguous() {
        assert_eq!(function_key(1), Some(F1));
        assert_eq!(function_key(12), Some(SPECIAL | 0x27));
        assert_eq!(function_key(35), Some(SPECIAL | 0x3E));
        assert_eq!(function_key(0), None);
        assert_eq!(function_key(36), None);
    }

    #[test]
    fn test_letters_are_upper_case_ascii() {
        assert_eq!(letter('a'), Some(65));
        assert_eq!(letter('Z'), Some(90));
        assert_eq!(letter('1'), None);
    }

    #[test]
    fn test_printable_codes_are_not_special() {
        assert!(!is_special(SPACE));
        assert!(!is_special(letter('q').unwrap()));
        assert!(is_special(ESCAPE));
        assert!(is_special(keypad_digit(9).unwrap()));
    }

    #[test]
    fn test_digit_row_uses_ascii() {
        assert_eq!(digit(0), Some(0x30));
        assert_eq!(digit(9), Some(0x39));
        assert_eq!(digit(10), None);
    }
}
