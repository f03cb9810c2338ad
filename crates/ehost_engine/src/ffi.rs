//! `#[repr(C)]` structures exchanged with the engine library.

use std::ffi::{c_char, c_void};

use ehost_core::abi::{Rect2i, Vector2i};
use ehost_core::events::EngineEvent;

/// Opaque pointer handed back to every display-server callback.
pub type UserData = *mut c_void;

/// The only window id the host exposes.
pub const MAIN_WINDOW_ID: i32 = 0;

/// Display-server capability table. Registered once, before the engine's first
/// iteration, and never modified afterwards. `userdata` must stay valid for as
/// long as the engine may call through the table.
#[repr(C)]
pub struct DisplayServerInterface {
    pub userdata: UserData,

    pub screen_get_count: unsafe extern "C" fn(UserData) -> i32,
    pub screen_get_primary: unsafe extern "C" fn(UserData) -> i32,
    pub screen_get_position: unsafe extern "C" fn(UserData, i32) -> Vector2i,
    pub screen_get_size: unsafe extern "C" fn(UserData, i32) -> Vector2i,
    pub screen_get_usable_rect: unsafe extern "C" fn(UserData, i32) -> Rect2i,
    pub screen_get_dpi: unsafe extern "C" fn(UserData, i32) -> i32,
    pub screen_get_scale: unsafe extern "C" fn(UserData, i32) -> f32,
    pub screen_get_refresh_rate: unsafe extern "C" fn(UserData, i32) -> f32,

    pub window_get_position: unsafe extern "C" fn(UserData, i32) -> Vector2i,
    pub window_get_size: unsafe extern "C" fn(UserData, i32) -> Vector2i,
    pub window_set_position: unsafe extern "C" fn(UserData, i32, Vector2i),
    pub window_set_size: unsafe extern "C" fn(UserData, i32, Vector2i),
    pub window_set_title: unsafe extern "C" fn(UserData, i32, *const c_char),
    pub window_is_focused: unsafe extern "C" fn(UserData, i32) -> bool,
    pub window_can_draw: unsafe extern "C" fn(UserData, i32) -> bool,
    pub window_get_native_handle: unsafe extern "C" fn(UserData, i32, i32) -> i64,

    pub mouse_set_mode: unsafe extern "C" fn(UserData, i32),
    pub mouse_get_mode: unsafe extern "C" fn(UserData) -> i32,
    pub mouse_get_position: unsafe extern "C" fn(UserData) -> Vector2i,
    pub mouse_get_button_state: unsafe extern "C" fn(UserData) -> u32,
    pub warp_mouse: unsafe extern "C" fn(UserData, Vector2i),
    pub cursor_set_shape: unsafe extern "C" fn(UserData, i32),
    pub cursor_get_shape: unsafe extern "C" fn(UserData) -> i32,

    pub swap_buffers: unsafe extern "C" fn(UserData),
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Key = 0,
    Text = 1,
    MouseButton = 2,
    MouseMotion = 3,
    MouseWheel = 4,
    Window = 5,
    Resized = 6,
}

/// Flat wire form of [`EngineEvent`]. Fields that do not apply to `kind` are zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEngineEvent {
    pub kind: RawEventKind,
    pub keycode: u32,
    pub physical_keycode: u32,
    pub unicode: u32,
    pub pressed: bool,
    pub echo: bool,
    pub modifiers: u32,
    pub button: i32,
    pub button_mask: u32,
    pub x: f64,
    pub y: f64,
    /// Relative motion or wheel delta.
    pub dx: f64,
    pub dy: f64,
    pub window_event: i32,
    pub size: Vector2i,
}

impl RawEngineEvent {
    fn empty(kind: RawEventKind) -> Self {
        Self {
            kind,
            keycode: 0,
            physical_keycode: 0,
            unicode: 0,
            pressed: false,
            echo: false,
            modifiers: 0,
            button: 0,
            button_mask: 0,
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            window_event: 0,
            size: Vector2i::ZERO,
        }
    }
}

impl From<&EngineEvent> for RawEngineEvent {
    fn from(event: &EngineEvent) -> Self {
        match *event {
            EngineEvent::Key(key) => Self {
                keycode: key.keycode,
                physical_keycode: key.physical_keycode,
                unicode: key.unicode,
                pressed: key.pressed,
                echo: key.echo,
                modifiers: key.modifiers.bits(),
                ..Self::empty(RawEventKind::Key)
            },
            EngineEvent::Text(c) => Self {
                unicode: u32::from(c),
                ..Self::empty(RawEventKind::Text)
            },
            EngineEvent::MouseButton {
                button,
                pressed,
                position,
                button_mask,
                modifiers,
            } => Self {
                button: button.as_raw(),
                pressed,
                x: position.x,
                y: position.y,
                button_mask: button_mask.bits(),
                modifiers: modifiers.bits(),
                ..Self::empty(RawEventKind::MouseButton)
            },
            EngineEvent::MouseMotion {
                position,
                relative,
                button_mask,
                modifiers,
            } => Self {
                x: position.x,
                y: position.y,
                dx: relative.x,
                dy: relative.y,
                button_mask: button_mask.bits(),
                modifiers: modifiers.bits(),
                ..Self::empty(RawEventKind::MouseMotion)
            },
            EngineEvent::MouseWheel {
                position,
                delta,
                button_mask,
                modifiers,
            } => Self {
                x: position.x,
                y: position.y,
                dx: delta.x,
                dy: delta.y,
                button_mask: button_mask.bits(),
                modifiers: modifiers.bits(),
                ..Self::empty(RawEventKind::MouseWheel)
            },
            EngineEvent::Window(kind) => Self {
                window_event: kind.as_raw(),
                ..Self::empty(RawEventKind::Window)
            },
            EngineEvent::Resized(size) => Self {
                size: Vector2i::new(
                    i32::try_from(size.x).unwrap_or(i32::MAX),
                    i32::try_from(size.y).unwrap_or(i32::MAX),
                ),
                ..Self::empty(RawEventKind::Resized)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehost_core::abi::{ButtonMask, ModifierFlags, MouseButton, WindowEventKind};
    use ehost_core::events::KeyInput;
    use ehost_core::glam::{DVec2, UVec2};

    #[test]
    fn test_key_event_fields_are_copied() {
        let raw = RawEngineEvent::from(&EngineEvent::Key(KeyInput {
            keycode: 65,
            physical_keycode: 0x1E,
            unicode: 97,
            pressed: true,
            echo: false,
            modifiers: ModifierFlags::SHIFT | ModifierFlags::CTRL,
        }));
        assert_eq!(raw.kind, RawEventKind::Key);
        assert_eq!(raw.keycode, 65);
        assert_eq!(raw.unicode, 97);
        assert_eq!(raw.modifiers, 0b101);
        assert!(raw.pressed);
    }

    #[test]
    fn test_mouse_button_event_carries_mask_and_position() {
        let raw = RawEngineEvent::from(&EngineEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
            position: DVec2::new(12.0, 34.0),
            button_mask: ButtonMask::LEFT | ButtonMask::RIGHT,
            modifiers: ModifierFlags::empty(),
        });
        assert_eq!(raw.kind, RawEventKind::MouseButton);
        assert_eq!(raw.button, 2);
        assert_eq!(raw.button_mask, 3);
        assert!((raw.x - 12.0).abs() < f64::EPSILON);
        assert!((raw.y - 34.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_window_and_resize_events() {
        let raw = RawEngineEvent::from(&EngineEvent::Window(WindowEventKind::DpiChange));
        assert_eq!(raw.kind, RawEventKind::Window);
        assert_eq!(raw.window_event, 6);

        let raw = RawEngineEvent::from(&EngineEvent::Resized(UVec2::new(1600, 1200)));
        assert_eq!(raw.kind, RawEventKind::Resized);
        assert_eq!(raw.size, Vector2i::new(1600, 1200));
    }

    #[test]
    fn test_text_event_carries_scalar() {
        let raw = RawEngineEvent::from(&EngineEvent::Text('é'));
        assert_eq!(raw.kind, RawEventKind::Text);
        assert_eq!(raw.unicode, 0xE9);
    }
}
