//! Cursor appearance and pointer confinement for the render window.

use ehost_core::abi::{CursorShape, MouseMode};
use winit::window::{CursorGrabMode, CursorIcon, Window};

pub fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Arrow => CursorIcon::Default,
        CursorShape::IBeam => CursorIcon::Text,
        CursorShape::PointingHand => CursorIcon::Pointer,
        CursorShape::Cross => CursorIcon::Crosshair,
        CursorShape::Wait => CursorIcon::Wait,
        CursorShape::Busy => CursorIcon::Progress,
        CursorShape::Drag => CursorIcon::Grabbing,
        CursorShape::CanDrop => CursorIcon::Copy,
        CursorShape::Forbidden => CursorIcon::NotAllowed,
        CursorShape::VSize => CursorIcon::NsResize,
        CursorShape::HSize => CursorIcon::EwResize,
        CursorShape::BDiagSize => CursorIcon::NeswResize,
        CursorShape::FDiagSize => CursorIcon::NwseResize,
        CursorShape::Move => CursorIcon::Move,
        CursorShape::VSplit => CursorIcon::RowResize,
        CursorShape::HSplit => CursorIcon::ColResize,
        CursorShape::Help => CursorIcon::Help,
    }
}

/// Preferred grab for a mode, then the fallback when the platform refuses it.
fn grab_modes(mode: MouseMode) -> (CursorGrabMode, Option<CursorGrabMode>) {
    match mode {
        MouseMode::Captured => (CursorGrabMode::Locked, Some(CursorGrabMode::Confined)),
        MouseMode::Confined | MouseMode::ConfinedHidden => {
            (CursorGrabMode::Confined, Some(CursorGrabMode::Locked))
        }
        MouseMode::Visible | MouseMode::Hidden => (CursorGrabMode::None, None),
    }
}

pub fn apply_mouse_mode(window: &Window, mode: MouseMode) {
    window.set_cursor_visible(mode.cursor_visible());

    let (preferred, fallback) = grab_modes(mode);
    if let Err(err) = window.set_cursor_grab(preferred) {
        match fallback {
            Some(fallback) => {
                log::debug!("Cursor grab {:?} unavailable ({err}), trying {:?}", preferred, fallback);
                if let Err(err) = window.set_cursor_grab(fallback) {
                    log::warn!("Failed to grab cursor for {:?}: {err}", mode);
                }
            }
            None => log::warn!("Failed to release cursor grab: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_an_icon() {
        for shape in CursorShape::ALL {
            let _ = cursor_icon(*shape);
        }
        assert_eq!(cursor_icon(CursorShape::IBeam), CursorIcon::Text);
        assert_eq!(cursor_icon(CursorShape::HSize), CursorIcon::EwResize);
        assert_eq!(cursor_icon(CursorShape::Arrow), CursorIcon::Default);
    }

    #[test]
    fn test_captured_mode_locks_then_confines() {
        assert_eq!(
            grab_modes(MouseMode::Captured),
            (CursorGrabMode::Locked, Some(CursorGrabMode::Confined))
        );
    }

    #[test]
    fn test_free_modes_release_the_grab() {
        assert_eq!(grab_modes(MouseMode::Visible), (CursorGrabMode::None, None));
        assert_eq!(grab_modes(MouseMode::Hidden), (CursorGrabMode::None, None));
        assert_eq!(grab_modes(MouseMode::ConfinedHidden).0, CursorGrabMode::Confined);
    }
}
