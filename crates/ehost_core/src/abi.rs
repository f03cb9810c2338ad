//! Value domains shared with the embedded engine across the C boundary.
//!
//! Every enum here is `#[repr(i32)]` and its discriminants are the exact integers
//! the engine passes through the display-server table. Values coming from the
//! engine are decoded with `TryFrom<i32>`; an out-of-domain value is rejected
//! rather than coerced.

use bitflags::bitflags;

/// Unknown discriminant received from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value {value} is outside the {domain} domain")]
pub struct OutOfDomain {
    pub domain: &'static str,
    pub value: i32,
}

macro_rules! abi_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $domain:literal {
            $($variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_raw(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = OutOfDomain;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(OutOfDomain { domain: $domain, value }),
                }
            }
        }
    };
}

abi_enum! {
    /// Cursor visibility and confinement requested by the engine.
    MouseMode, "mouse mode" {
        Visible = 0,
        Hidden = 1,
        Captured = 2,
        Confined = 3,
        ConfinedHidden = 4,
    }
}

impl MouseMode {
    pub fn cursor_visible(self) -> bool {
        matches!(self, MouseMode::Visible | MouseMode::Confined)
    }

    /// Captured mode reports relative motion only; the cursor is locked in place.
    pub fn is_captured(self) -> bool {
        self == MouseMode::Captured
    }

    pub fn is_confined(self) -> bool {
        matches!(self, MouseMode::Confined | MouseMode::ConfinedHidden)
    }
}

impl Default for MouseMode {
    fn default() -> Self {
        MouseMode::Visible
    }
}

abi_enum! {
    CursorShape, "cursor shape" {
        Arrow = 0,
        IBeam = 1,
        PointingHand = 2,
        Cross = 3,
        Wait = 4,
        Busy = 5,
        Drag = 6,
        CanDrop = 7,
        Forbidden = 8,
        VSize = 9,
        HSize = 10,
        BDiagSize = 11,
        FDiagSize = 12,
        Move = 13,
        VSplit = 14,
        HSplit = 15,
        Help = 16,
    }
}

impl Default for CursorShape {
    fn default() -> Self {
        CursorShape::Arrow
    }
}

abi_enum! {
    /// Window-level notifications delivered to the engine.
    WindowEventKind, "window event" {
        MouseEnter = 0,
        MouseExit = 1,
        FocusIn = 2,
        FocusOut = 3,
        CloseRequest = 4,
        GoBackRequest = 5,
        DpiChange = 6,
        TitlebarChange = 7,
    }
}

abi_enum! {
    /// Which native object `window_get_native_handle` should export.
    HandleType, "handle type" {
        DisplayHandle = 0,
        WindowHandle = 1,
        WindowView = 2,
        OpenGlContext = 3,
        EglDisplay = 4,
        EglConfig = 5,
    }
}

abi_enum! {
    MouseButton, "mouse button" {
        Left = 1,
        Right = 2,
        Middle = 3,
        WheelUp = 4,
        WheelDown = 5,
        WheelLeft = 6,
        WheelRight = 7,
        Extra1 = 8,
        Extra2 = 9,
    }
}

impl MouseButton {
    /// Bit this button occupies in a [`ButtonMask`]. Wheel "buttons" never stay held.
    pub fn mask(self) -> ButtonMask {
        match self {
            MouseButton::WheelUp
            | MouseButton::WheelDown
            | MouseButton::WheelLeft
            | MouseButton::WheelRight => ButtonMask::empty(),
            other => ButtonMask::from_bits_truncate(1 << (other.as_raw() - 1)),
        }
    }
}

bitflags! {
    /// Held mouse buttons, one bit per [`MouseButton`] at `1 << (button - 1)`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const EXTRA1 = 1 << 7;
        const EXTRA2 = 1 << 8;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const SHIFT = 1 << 0;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
        const META = 1 << 3;
        const CAPS_LOCK = 1 << 4;
    }
}

impl Default for ButtonMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for ModifierFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Integer pair used by every geometry callback.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    pub const ZERO: Vector2i = Vector2i { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer rectangle used for usable-screen queries.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2i {
    pub position: Vector2i,
    pub size: Vector2i,
}
