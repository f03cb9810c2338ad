//! Native input as seen by the host, and the engine's event vocabulary.

use glam::{DVec2, UVec2};

use crate::abi::{ButtonMask, ModifierFlags, MouseButton, WindowEventKind};

/// Modifier snapshot carried by a native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeModifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub caps_lock: bool,
}

impl NativeModifiers {
    pub fn flags(&self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        flags.set(ModifierFlags::SHIFT, self.shift);
        flags.set(ModifierFlags::ALT, self.alt);
        flags.set(ModifierFlags::CTRL, self.ctrl);
        flags.set(ModifierFlags::META, self.meta);
        flags.set(ModifierFlags::CAPS_LOCK, self.caps_lock);
        flags
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    /// Line-based wheel notches.
    Lines(DVec2),
    /// High-precision (trackpad) delta in logical points.
    Precise(DVec2),
}

/// A keyboard event whose physical key has already been resolved through the key table.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeKey {
    /// Engine logical key code, or the raw native code when the table has no entry.
    pub keycode: u32,
    /// Raw native code of the physical key.
    pub physical_keycode: u32,
    pub pressed: bool,
    pub repeat: bool,
    pub text: Option<String>,
    pub modifiers: NativeModifiers,
}

/// Input delivered by the native window layer. Positions are logical
/// window-content points (see [`crate::geometry`]).
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    MouseButton {
        button: MouseButton,
        pressed: bool,
        position: DVec2,
        modifiers: NativeModifiers,
    },
    CursorMoved {
        position: DVec2,
        modifiers: NativeModifiers,
    },
    Scroll {
        delta: ScrollDelta,
        position: DVec2,
        modifiers: NativeModifiers,
    },
    /// Unaccelerated device motion, used while the pointer is captured.
    RawMotion {
        delta: DVec2,
        modifiers: NativeModifiers,
    },
    Key(NativeKey),
    CursorEntered,
    CursorLeft,
    FocusChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub keycode: u32,
    pub physical_keycode: u32,
    /// Unicode scalar of the produced character, 0 when none.
    pub unicode: u32,
    pub pressed: bool,
    pub echo: bool,
    pub modifiers: ModifierFlags,
}

/// Everything the host pushes into the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Key(KeyInput),
    Text(char),
    MouseButton {
        button: MouseButton,
        pressed: bool,
        position: DVec2,
        button_mask: ButtonMask,
        modifiers: ModifierFlags,
    },
    MouseMotion {
        position: DVec2,
        relative: DVec2,
        button_mask: ButtonMask,
        modifiers: ModifierFlags,
    },
    MouseWheel {
        position: DVec2,
        delta: DVec2,
        button_mask: ButtonMask,
        modifiers: ModifierFlags,
    },
    Window(WindowEventKind),
    /// New drawable size in pixels.
    Resized(UVec2),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_flags_are_built_from_snapshot() {
        let mods = NativeModifiers {
            shift: true,
            meta: true,
            ..Default::default()
        };
        assert_eq!(mods.flags(), ModifierFlags::SHIFT | ModifierFlags::META);
        assert!(NativeModifiers::default().flags().is_empty());
    }
}
