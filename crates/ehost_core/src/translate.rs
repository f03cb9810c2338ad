//! Native input to engine events.
//!
//! Translation is a function of the native event, the current [`Layout`] and the
//! pointer state in [`InputState`]. Modifier flags are rebuilt from each event's own
//! snapshot. The button mask is updated before the engine event is built, so a
//! press carries a mask that already includes the pressed button.
//!
//! Whether an event should reach the engine at all is decided by the caller
//! (see `ProjectController::should_forward_input`); events handed to the
//! translator are always converted.

use glam::DVec2;

use crate::abi::{MouseMode, WindowEventKind};
use crate::events::{EngineEvent, KeyInput, NativeEvent, NativeKey, ScrollDelta};
use crate::geometry::Layout;
use crate::input::InputState;

/// High-precision scroll deltas are multiplied by this to match line-based magnitudes.
pub const PRECISE_SCROLL_FACTOR: f64 = 0.03;

pub fn translate(
    event: &NativeEvent,
    layout: &Layout,
    input: &mut InputState,
) -> Vec<EngineEvent> {
    match event {
        NativeEvent::MouseButton {
            button,
            pressed,
            position,
            modifiers,
        } => {
            let position = layout.to_engine(*position);
            input.move_to(position);
            let button_mask = if *pressed {
                input.button_down(*button)
            } else {
                input.button_up(*button)
            };
            vec![EngineEvent::MouseButton {
                button: *button,
                pressed: *pressed,
                position,
                button_mask,
                modifiers: modifiers.flags(),
            }]
        }

        NativeEvent::CursorMoved {
            position,
            modifiers,
        } => {
            // Captured pointers report motion through `RawMotion` only.
            if input.mouse_mode() == MouseMode::Captured {
                return Vec::new();
            }
            let position = layout.to_engine(*position);
            let relative = input.move_to(position);
            if relative == DVec2::ZERO {
                return Vec::new();
            }
            vec![EngineEvent::MouseMotion {
                position,
                relative,
                button_mask: input.buttons(),
                modifiers: modifiers.flags(),
            }]
        }

        NativeEvent::RawMotion { delta, modifiers } => {
            if input.mouse_mode() != MouseMode::Captured || *delta == DVec2::ZERO {
                return Vec::new();
            }
            vec![EngineEvent::MouseMotion {
                position: input.mouse_position(),
                relative: *delta,
                button_mask: input.buttons(),
                modifiers: modifiers.flags(),
            }]
        }

        NativeEvent::Scroll {
            delta,
            position,
            modifiers,
        } => {
            let delta = match delta {
                ScrollDelta::Lines(lines) => *lines,
                ScrollDelta::Precise(points) => *points * PRECISE_SCROLL_FACTOR,
            };
            if delta == DVec2::ZERO {
                return Vec::new();
            }
            let position = layout.to_engine(*position);
            input.move_to(position);
            vec![EngineEvent::MouseWheel {
                position,
                delta,
                button_mask: input.buttons(),
                modifiers: modifiers.flags(),
            }]
        }

        NativeEvent::Key(key) => translate_key(key),

        NativeEvent::CursorEntered => vec![EngineEvent::Window(WindowEventKind::MouseEnter)],
        NativeEvent::CursorLeft => vec![EngineEvent::Window(WindowEventKind::MouseExit)],
        NativeEvent::FocusChanged(true) => vec![EngineEvent::Window(WindowEventKind::FocusIn)],
        NativeEvent::FocusChanged(false) => vec![EngineEvent::Window(WindowEventKind::FocusOut)],
    }
}

fn translate_key(key: &NativeKey) -> Vec<EngineEvent> {
    let printable: Vec<char> = if key.pressed {
        key.text
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_control())
            .collect()
    } else {
        Vec::new()
    };

    let mut events = Vec::with_capacity(1 + printable.len());
    events.push(EngineEvent::Key(KeyInput {
        keycode: key.keycode,
        physical_keycode: key.physical_keycode,
        unicode: printable.first().map_or(0, |&c| u32::from(c)),
        pressed: key.pressed,
        echo: key.repeat,
        modifiers: key.modifiers.flags(),
    }));
    events.extend(printable.into_iter().map(EngineEvent::Text));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{ButtonMask, ModifierFlags, MouseButton};
    use crate::events::NativeModifiers;
    use crate::geometry::Insets;
    use crate::keys;

    fn layout() -> Layout {
        Layout::for_render_area(DVec2::new(640.0, 480.0), 2.0, Insets::top_bar(40.0))
    }

    fn press(button: MouseButton, pressed: bool) -> NativeEvent {
        NativeEvent::MouseButton {
            button,
            pressed,
            position: DVec2::new(100.0, 140.0),
            modifiers: NativeModifiers::default(),
        }
    }

    fn key(keycode: u32, text: Option<&str>, pressed: bool) -> NativeEvent {
        NativeEvent::Key(NativeKey {
            keycode,
            physical_keycode: 0x26,
            pressed,
            repeat: false,
            text: text.map(str::to_string),
            modifiers: NativeModifiers::default(),
        })
    }

    #[test]
    fn test_press_carries_post_transition_mask() {
        let mut input = InputState::new();
        let events = translate(&press(MouseButton::Left, true), &layout(), &mut input);
        match events.as_slice() {
            [EngineEvent::MouseButton {
                button_mask,
                position,
                pressed,
                ..
            }] => {
                assert!(*pressed);
                assert_eq!(*button_mask, ButtonMask::LEFT);
                assert_eq!(*position, DVec2::new(200.0, 200.0));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_release_carries_cleared_mask() {
        let mut input = InputState::new();
        translate(&press(MouseButton::Right, true), &layout(), &mut input);
        translate(&press(MouseButton::Left, true), &layout(), &mut input);
        let events = translate(&press(MouseButton::Right, false), &layout(), &mut input);
        let [EngineEvent::MouseButton { button_mask, .. }] = events.as_slice() else {
            panic!("expected a single button event");
        };
        assert_eq!(*button_mask, ButtonMask::LEFT);
    }

    #[test]
    fn test_duplicate_press_keeps_bit_set() {
        let mut input = InputState::new();
        translate(&press(MouseButton::Middle, true), &layout(), &mut input);
        translate(&press(MouseButton::Middle, true), &layout(), &mut input);
        assert_eq!(input.buttons(), ButtonMask::MIDDLE);
    }

    #[test]
    fn test_motion_reports_scaled_relative_delta() {
        let mut input = InputState::new();
        let l = layout();
        let moved = |x, y| NativeEvent::CursorMoved {
            position: DVec2::new(x, y),
            modifiers: NativeModifiers::default(),
        };
        translate(&moved(10.0, 50.0), &l, &mut input);
        let events = translate(&moved(15.0, 45.0), &l, &mut input);
        let [EngineEvent::MouseMotion {
            position, relative, ..
        }] = events.as_slice()
        else {
            panic!("expected motion");
        };
        assert_eq!(*position, DVec2::new(30.0, 10.0));
        assert_eq!(*relative, DVec2::new(10.0, -10.0));
    }

    #[test]
    fn test_motion_without_movement_is_dropped() {
        let mut input = InputState::new();
        let event = NativeEvent::CursorMoved {
            position: DVec2::new(0.0, 40.0),
            modifiers: NativeModifiers::default(),
        };
        assert!(translate(&event, &layout(), &mut input).is_empty());
    }

    #[test]
    fn test_captured_mode_uses_raw_motion_only() {
        let mut input = InputState::new();
        input.set_mouse_mode(MouseMode::Captured);
        let cursor = NativeEvent::CursorMoved {
            position: DVec2::new(50.0, 90.0),
            modifiers: NativeModifiers::default(),
        };
        assert!(translate(&cursor, &layout(), &mut input).is_empty());

        let raw = NativeEvent::RawMotion {
            delta: DVec2::new(3.0, -2.0),
            modifiers: NativeModifiers::default(),
        };
        let events = translate(&raw, &layout(), &mut input);
        assert!(matches!(
            events.as_slice(),
            [EngineEvent::MouseMotion { relative, .. }] if *relative == DVec2::new(3.0, -2.0)
        ));

        input.set_mouse_mode(MouseMode::Visible);
        assert!(translate(&raw, &layout(), &mut input).is_empty());
    }

    #[test]
    fn test_precise_scroll_is_scaled_down() {
        let mut input = InputState::new();
        let event = NativeEvent::Scroll {
            delta: ScrollDelta::Precise(DVec2::new(0.0, 100.0)),
            position: DVec2::new(10.0, 50.0),
            modifiers: NativeModifiers::default(),
        };
        let events = translate(&event, &layout(), &mut input);
        let [EngineEvent::MouseWheel { delta, .. }] = events.as_slice() else {
            panic!("expected wheel");
        };
        assert!((delta.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_scroll_is_unscaled() {
        let mut input = InputState::new();
        let event = NativeEvent::Scroll {
            delta: ScrollDelta::Lines(DVec2::new(0.0, 100.0)),
            position: DVec2::new(10.0, 50.0),
            modifiers: NativeModifiers::default(),
        };
        let events = translate(&event, &layout(), &mut input);
        let [EngineEvent::MouseWheel { delta, .. }] = events.as_slice() else {
            panic!("expected wheel");
        };
        assert!((delta.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_printable_key_emits_text_event() {
        let events = translate(
            &key(keys::letter('a').unwrap(), Some("a"), true),
            &layout(),
            &mut InputState::new(),
        );
        assert_eq!(events.len(), 2);
        let EngineEvent::Key(input) = events[0] else {
            panic!("key event must come first");
        };
        assert_eq!(input.keycode, 65);
        assert_eq!(input.unicode, u32::from('a'));
        assert_eq!(events[1], EngineEvent::Text('a'));
    }

    #[test]
    fn test_control_characters_emit_no_text() {
        let events = translate(
            &key(keys::ENTER, Some("\r"), true),
            &layout(),
            &mut InputState::new(),
        );
        assert_eq!(events.len(), 1);
        let EngineEvent::Key(input) = events[0] else {
            panic!("expected key");
        };
        assert_eq!(input.unicode, 0);

        let events = translate(
            &key(keys::BACKSPACE, Some("\u{7f}"), true),
            &layout(),
            &mut InputState::new(),
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_release_emits_no_text() {
        let events = translate(&key(65, Some("a"), false), &layout(), &mut InputState::new());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unmapped_raw_code_passes_through() {
        let raw = 0xE057;
        let events = translate(&key(raw, None, true), &layout(), &mut InputState::new());
        let EngineEvent::Key(input) = events[0] else {
            panic!("expected key");
        };
        assert_eq!(input.keycode, raw);
    }

    #[test]
    fn test_modifiers_come_from_each_event() {
        let mut input = InputState::new();
        let shifted = NativeEvent::Key(NativeKey {
            keycode: 65,
            physical_keycode: 0,
            pressed: true,
            repeat: true,
            text: Some("A".into()),
            modifiers: NativeModifiers {
                shift: true,
                ..Default::default()
            },
        });
        let events = translate(&shifted, &layout(), &mut input);
        let EngineEvent::Key(first) = events[0] else {
            panic!("expected key");
        };
        assert_eq!(first.modifiers, ModifierFlags::SHIFT);
        assert!(first.echo);

        let events = translate(&key(65, None, false), &layout(), &mut input);
        let EngineEvent::Key(second) = events[0] else {
            panic!("expected key");
        };
        assert!(second.modifiers.is_empty());
    }

    #[test]
    fn test_focus_and_hover_map_to_window_events() {
        let mut input = InputState::new();
        let l = layout();
        assert_eq!(
            translate(&NativeEvent::FocusChanged(true), &l, &mut input),
            vec![EngineEvent::Window(WindowEventKind::FocusIn)]
        );
        assert_eq!(
            translate(&NativeEvent::CursorLeft, &l, &mut input),
            vec![EngineEvent::Window(WindowEventKind::MouseExit)]
        );
    }
}
