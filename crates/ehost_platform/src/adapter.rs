//! winit events to [`NativeEvent`]s.
//!
//! Pointer input only counts when it comes from the render window; the host
//! window's pointer belongs to the toolbar. Positions arrive in render-window
//! physical pixels and leave as host window-content points.

use ehost_core::abi::MouseButton;
use ehost_core::events::{NativeEvent, NativeKey, NativeModifiers, ScrollDelta};
use ehost_core::geometry::Layout;
use ehost_core::glam::DVec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::ModifiersState;

use crate::keymap;

/// Which of the two host windows an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Host,
    RenderArea,
}

pub struct NativeInputAdapter {
    modifiers: ModifiersState,
    caps_lock: bool,
    cursor: DVec2,
}

impl NativeInputAdapter {
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            caps_lock: false,
            cursor: DVec2::ZERO,
        }
    }

    pub fn modifiers(&self) -> NativeModifiers {
        NativeModifiers {
            shift: self.modifiers.shift_key(),
            alt: self.modifiers.alt_key(),
            ctrl: self.modifiers.control_key(),
            meta: self.modifiers.super_key(),
            caps_lock: self.caps_lock,
        }
    }

    /// Last known pointer position in window-content points.
    pub fn cursor(&self) -> DVec2 {
        self.cursor
    }

    pub fn adapt(
        &mut self,
        surface: Surface,
        event: &WindowEvent,
        layout: &Layout,
    ) -> Option<NativeEvent> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                None
            }
            WindowEvent::KeyboardInput {
                event,
                is_synthetic: false,
                ..
            } => {
                let shift = self.modifiers.shift_key();
                if let Some(caps) = caps_lock_from_text(event.text.as_deref(), shift) {
                    self.caps_lock = caps;
                }
                Some(NativeEvent::Key(NativeKey {
                    keycode: keymap::engine_keycode(event.physical_key),
                    physical_keycode: keymap::raw_code(event.physical_key),
                    pressed: event.state == ElementState::Pressed,
                    repeat: event.repeat,
                    text: event.text.as_ref().map(|t| t.to_string()),
                    modifiers: self.modifiers(),
                }))
            }
            _ if surface != Surface::RenderArea => None,
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = content_point(*position, layout);
                Some(NativeEvent::CursorMoved {
                    position: self.cursor,
                    modifiers: self.modifiers(),
                })
            }
            WindowEvent::MouseInput { state, button, .. } => Some(NativeEvent::MouseButton {
                button: mouse_button(*button)?,
                pressed: *state == ElementState::Pressed,
                position: self.cursor,
                modifiers: self.modifiers(),
            }),
            WindowEvent::MouseWheel { delta, .. } => Some(NativeEvent::Scroll {
                delta: scroll_delta(*delta, layout.scale()),
                position: self.cursor,
                modifiers: self.modifiers(),
            }),
            WindowEvent::CursorEntered { .. } => Some(NativeEvent::CursorEntered),
            WindowEvent::CursorLeft { .. } => Some(NativeEvent::CursorLeft),
            _ => None,
        }
    }

    /// Unaccelerated device motion. Device deltas are already physical pixels,
    /// the same unit as engine coordinates, so they pass through unscaled.
    pub fn raw_motion(&self, delta: (f64, f64)) -> NativeEvent {
        NativeEvent::RawMotion {
            delta: DVec2::new(delta.0, delta.1),
            modifiers: self.modifiers(),
        }
    }
}

impl Default for NativeInputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render-window physical position to a host window-content point.
pub fn content_point(position: PhysicalPosition<f64>, layout: &Layout) -> DVec2 {
    DVec2::new(position.x, position.y) / layout.scale() + layout.render_origin()
}

pub fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Back => Some(MouseButton::Extra1),
        winit::event::MouseButton::Forward => Some(MouseButton::Extra2),
        winit::event::MouseButton::Other(_) => None,
    }
}

pub fn scroll_delta(delta: MouseScrollDelta, scale: f64) -> ScrollDelta {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            ScrollDelta::Lines(DVec2::new(f64::from(x), f64::from(y)))
        }
        MouseScrollDelta::PixelDelta(p) => ScrollDelta::Precise(DVec2::new(p.x, p.y) / scale),
    }
}

/// winit does not report lock-key state. A single alphabetic character whose
/// case disagrees with shift means caps lock is on; anything else says nothing.
pub fn caps_lock_from_text(text: Option<&str>, shift: bool) -> Option<bool> {
    let mut chars = text?.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_alphabetic() || c.is_uppercase() == c.is_lowercase() {
        return None;
    }
    Some(c.is_uppercase() != shift)
}
