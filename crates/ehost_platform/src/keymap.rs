//! Physical key to engine key code table.
//!
//! Keys without an entry fall through as their raw native code, so the engine
//! still sees a stable, distinct value for them.

use std::collections::HashMap;

use ehost_core::keys;
use once_cell::sync::Lazy;
use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

const FIXED: &[(KeyCode, u32)] = &[
    (KeyCode::Escape, keys::ESCAPE),
    (KeyCode::Tab, keys::TAB),
    (KeyCode::Backspace, keys::BACKSPACE),
    (KeyCode::Enter, keys::ENTER),
    (KeyCode::NumpadEnter, keys::KP_ENTER),
    (KeyCode::Insert, keys::INSERT),
    (KeyCode::Delete, keys::DELETE),
    (KeyCode::Pause, keys::PAUSE),
    (KeyCode::PrintScreen, keys::PRINT),
    (KeyCode::NumpadClear, keys::CLEAR),
    (KeyCode::Home, keys::HOME),
    (KeyCode::End, keys::END),
    (KeyCode::ArrowLeft, keys::LEFT),
    (KeyCode::ArrowUp, keys::UP),
    (KeyCode::ArrowRight, keys::RIGHT),
    (KeyCode::ArrowDown, keys::DOWN),
    (KeyCode::PageUp, keys::PAGEUP),
    (KeyCode::PageDown, keys::PAGEDOWN),
    (KeyCode::ShiftLeft, keys::SHIFT),
    (KeyCode::ShiftRight, keys::SHIFT),
    (KeyCode::ControlLeft, keys::CTRL),
    (KeyCode::ControlRight, keys::CTRL),
    (KeyCode::SuperLeft, keys::META),
    (KeyCode::SuperRight, keys::META),
    (KeyCode::AltLeft, keys::ALT),
    (KeyCode::AltRight, keys::ALT),
    (KeyCode::CapsLock, keys::CAPSLOCK),
    (KeyCode::NumLock, keys::NUMLOCK),
    (KeyCode::ScrollLock, keys::SCROLLLOCK),
    (KeyCode::NumpadMultiply, keys::KP_MULTIPLY),
    (KeyCode::NumpadDivide, keys::KP_DIVIDE),
    (KeyCode::NumpadSubtract, keys::KP_SUBTRACT),
    (KeyCode::NumpadDecimal, keys::KP_PERIOD),
    (KeyCode::NumpadAdd, keys::KP_ADD),
    (KeyCode::ContextMenu, keys::MENU),
    (KeyCode::Help, keys::HELP),
    (KeyCode::BrowserBack, keys::BACK),
    (KeyCode::BrowserForward, keys::FORWARD),
    (KeyCode::BrowserStop, keys::STOP),
    (KeyCode::BrowserRefresh, keys::REFRESH),
    (KeyCode::AudioVolumeDown, keys::VOLUME_DOWN),
    (KeyCode::AudioVolumeMute, keys::VOLUME_MUTE),
    (KeyCode::AudioVolumeUp, keys::VOLUME_UP),
    (KeyCode::MediaPlayPause, keys::MEDIA_PLAY),
    (KeyCode::MediaStop, keys::MEDIA_STOP),
    (KeyCode::MediaTrackPrevious, keys::MEDIA_PREVIOUS),
    (KeyCode::MediaTrackNext, keys::MEDIA_NEXT),
    (KeyCode::Space, keys::SPACE),
    (KeyCode::Quote, keys::APOSTROPHE),
    (KeyCode::Comma, keys::COMMA),
    (KeyCode::Minus, keys::MINUS),
    (KeyCode::Period, keys::PERIOD),
    (KeyCode::Slash, keys::SLASH),
    (KeyCode::Semicolon, keys::SEMICOLON),
    (KeyCode::Equal, keys::EQUAL),
    (KeyCode::BracketLeft, keys::BRACKET_LEFT),
    (KeyCode::Backslash, keys::BACKSLASH),
    (KeyCode::BracketRight, keys::BRACKET_RIGHT),
    (KeyCode::Backquote, keys::QUOTE_LEFT),
];

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const KEYPAD_DIGITS: [KeyCode; 10] = [
    KeyCode::Numpad0,
    KeyCode::Numpad1,
    KeyCode::Numpad2,
    KeyCode::Numpad3,
    KeyCode::Numpad4,
    KeyCode::Numpad5,
    KeyCode::Numpad6,
    KeyCode::Numpad7,
    KeyCode::Numpad8,
    KeyCode::Numpad9,
];

const FUNCTION_KEYS: [KeyCode; 35] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
    KeyCode::F13,
    KeyCode::F14,
    KeyCode::F15,
    KeyCode::F16,
    KeyCode::F17,
    KeyCode::F18,
    KeyCode::F19,
    KeyCode::F20,
    KeyCode::F21,
    KeyCode::F22,
    KeyCode::F23,
    KeyCode::F24,
    KeyCode::F25,
    KeyCode::F26,
    KeyCode::F27,
    KeyCode::F28,
    KeyCode::F29,
    KeyCode::F30,
    KeyCode::F31,
    KeyCode::F32,
    KeyCode::F33,
    KeyCode::F34,
    KeyCode::F35,
];

static KEY_TABLE: Lazy<HashMap<KeyCode, u32>> = Lazy::new(|| {
    let mut table: HashMap<KeyCode, u32> = FIXED.iter().copied().collect();
    for (code, c) in LETTERS.into_iter().zip('A'..='Z') {
        table.extend(keys::letter(c).map(|k| (code, k)));
    }
    for (n, code) in (0u32..).zip(DIGITS) {
        table.extend(keys::digit(n).map(|k| (code, k)));
    }
    for (n, code) in (0u32..).zip(KEYPAD_DIGITS) {
        table.extend(keys::keypad_digit(n).map(|k| (code, k)));
    }
    for (n, code) in (1u32..).zip(FUNCTION_KEYS) {
        table.extend(keys::function_key(n).map(|k| (code, k)));
    }
    table
});

/// Engine key code for a physical key, if the table knows it.
pub fn lookup(code: KeyCode) -> Option<u32> {
    KEY_TABLE.get(&code).copied()
}

/// Engine key code for `key`, falling back to the raw native code.
pub fn engine_keycode(key: PhysicalKey) -> u32 {
    match key {
        PhysicalKey::Code(code) => lookup(code).unwrap_or_else(|| raw_code(key)),
        PhysicalKey::Unidentified(_) => raw_code(key),
    }
}

/// Raw platform scancode of a physical key, or 0 when none is known.
#[cfg(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub fn raw_code(key: PhysicalKey) -> u32 {
    use winit::platform::scancode::PhysicalKeyExtScancode;

    match key {
        PhysicalKey::Unidentified(native) => native_raw(native),
        PhysicalKey::Code(_) => key.to_scancode().unwrap_or(0),
    }
}

#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
pub fn raw_code(key: PhysicalKey) -> u32 {
    match key {
        PhysicalKey::Unidentified(native) => native_raw(native),
        PhysicalKey::Code(_) => 0,
    }
}

fn native_raw(native: NativeKeyCode) -> u32 {
    match native {
        NativeKeyCode::Unidentified => 0,
        NativeKeyCode::Android(code) => code,
        NativeKeyCode::MacOS(code) => u32::from(code),
        NativeKeyCode::Windows(code) => u32::from(code),
        NativeKeyCode::Xkb(code) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_uppercase_ascii() {
        assert_eq!(lookup(KeyCode::KeyA), Some(u32::from(b'A')));
        assert_eq!(lookup(KeyCode::KeyZ), Some(u32::from(b'Z')));
        assert_eq!(lookup(KeyCode::KeyQ), Some(u32::from(b'Q')));
    }

    #[test]
    fn test_digit_rows_and_keypad_are_distinct() {
        assert_eq!(lookup(KeyCode::Digit7), Some(u32::from(b'7')));
        assert_eq!(lookup(KeyCode::Numpad7), Some(keys::KP_0 + 7));
        assert_ne!(lookup(KeyCode::Digit7), lookup(KeyCode::Numpad7));
    }

    #[test]
    fn test_function_keys_cover_f1_to_f35() {
        assert_eq!(lookup(KeyCode::F1), Some(keys::F1));
        assert_eq!(lookup(KeyCode::F12), Some(keys::F1 + 11));
        assert_eq!(lookup(KeyCode::F35), keys::function_key(35));
    }

    #[test]
    fn test_left_and_right_modifiers_share_a_code() {
        assert_eq!(lookup(KeyCode::ShiftLeft), lookup(KeyCode::ShiftRight));
        assert_eq!(lookup(KeyCode::AltLeft), Some(keys::ALT));
        assert_eq!(lookup(KeyCode::SuperRight), Some(keys::META));
    }

    #[test]
    fn test_special_keys_carry_the_special_bit() {
        for code in [KeyCode::Escape, KeyCode::ArrowUp, KeyCode::NumpadEnter] {
            assert!(keys::is_special(engine_keycode(PhysicalKey::Code(code))));
        }
        assert!(!keys::is_special(engine_keycode(PhysicalKey::Code(KeyCode::Space))));
    }

    #[test]
    fn test_unmapped_keys_fall_back_to_native_code() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Xkb(0x1234));
        assert_eq!(engine_keycode(key), 0x1234);
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(engine_keycode(key), 0);
    }
}
