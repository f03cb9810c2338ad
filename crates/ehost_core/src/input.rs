//! Pointer state shared between the input translator and the display-server table.
//!
//! - **Position** is stored in engine space: pixels, origin top-left, y down.
//! - **Buttons** are a level-triggered mask. Pressing a held button or releasing a
//!   free one leaves the mask unchanged, so duplicated native events cannot
//!   desynchronize it.
//! - **Mouse mode** is whatever the engine last requested; the translator never
//!   changes it.

use glam::DVec2;

use crate::abi::{ButtonMask, MouseButton, MouseMode};

#[derive(Debug, Clone)]
pub struct InputState {
    mouse_position: DVec2,
    buttons: ButtonMask,
    mouse_mode: MouseMode,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_position: DVec2::ZERO,
            buttons: ButtonMask::empty(),
            mouse_mode: MouseMode::Visible,
        }
    }

    /// Marks `button` held and returns the resulting mask.
    pub fn button_down(&mut self, button: MouseButton) -> ButtonMask {
        self.buttons.insert(button.mask());
        self.buttons
    }

    /// Marks `button` released and returns the resulting mask.
    pub fn button_up(&mut self, button: MouseButton) -> ButtonMask {
        self.buttons.remove(button.mask());
        self.buttons
    }

    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        !button.mask().is_empty() && self.buttons.contains(button.mask())
    }

    /// Moves the pointer and returns the motion relative to the previous position.
    pub fn move_to(&mut self, position: DVec2) -> DVec2 {
        let relative = position - self.mouse_position;
        self.mouse_position = position;
        relative
    }

    pub fn mouse_position(&self) -> DVec2 {
        self.mouse_position
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }

    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.mouse_mode = mode;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_down_sets_bit() {
        let mut input = InputState::new();
        let mask = input.button_down(MouseButton::Left);
        assert_eq!(mask, ButtonMask::LEFT);
        assert!(input.is_button_held(MouseButton::Left));
    }

    #[test]
    fn test_duplicate_press_keeps_bit_set() {
        let mut input = InputState::new();
        input.button_down(MouseButton::Right);
        let mask = input.button_down(MouseButton::Right);
        assert_eq!(mask, ButtonMask::RIGHT);
        // A single release clears it; there is no press counting.
        let mask = input.button_up(MouseButton::Right);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_release_without_press_is_no_op() {
        let mut input = InputState::new();
        input.button_down(MouseButton::Left);
        let mask = input.button_up(MouseButton::Middle);
        assert_eq!(mask, ButtonMask::LEFT);
    }

    #[test]
    fn test_mask_is_cumulative_over_any_sequence() {
        use MouseButton::*;
        let sequence = [
            (Left, true),
            (Left, true),
            (Middle, true),
            (Left, false),
            (Extra2, true),
            (Middle, false),
            (Middle, false),
            (Left, true),
        ];
        let mut input = InputState::new();
        let mut expected = ButtonMask::empty();
        for (button, pressed) in sequence {
            let mask = if pressed {
                expected.insert(button.mask());
                input.button_down(button)
            } else {
                expected.remove(button.mask());
                input.button_up(button)
            };
            assert_eq!(mask, expected);
        }
        assert_eq!(input.buttons(), ButtonMask::LEFT | ButtonMask::EXTRA2);
    }

    #[test]
    fn test_wheel_buttons_never_held() {
        let mut input = InputState::new();
        input.button_down(MouseButton::WheelUp);
        assert!(input.buttons().is_empty());
        assert!(!input.is_button_held(MouseButton::WheelUp));
    }

    #[test]
    fn test_move_to_reports_relative_motion() {
        let mut input = InputState::new();
        let rel = input.move_to(DVec2::new(10.0, 20.0));
        assert!((rel.x - 10.0).abs() < f64::EPSILON);
        let rel = input.move_to(DVec2::new(4.0, 25.0));
        assert!((rel.x + 6.0).abs() < f64::EPSILON);
        assert!((rel.y - 5.0).abs() < f64::EPSILON);
        assert_eq!(input.mouse_position(), DVec2::new(4.0, 25.0));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::default();
        assert!(input.buttons().is_empty());
        assert_eq!(input.mouse_mode(), MouseMode::Visible);
        assert_eq!(input.mouse_position(), DVec2::ZERO);
    }
}
