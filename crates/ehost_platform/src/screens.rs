//! Monitor queries behind the `screen_*` callbacks.
//!
//! winit exposes no per-monitor work area, so the usable rectangle is the full
//! monitor rectangle.

use ehost_core::abi::{Rect2i, Vector2i};
use winit::monitor::MonitorHandle;
use winit::window::Window;

/// Logical DPI the engine treats as scale 1.0.
pub const BASE_DPI: f64 = 96.0;

/// Screen selector as the engine passes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSelector {
    Index(usize),
    /// The screen under the pointer, the focused screen, or the main window's screen.
    Current,
    Primary,
}

impl ScreenSelector {
    pub const WITH_MOUSE_FOCUS: i32 = -1;
    pub const WITH_KEYBOARD_FOCUS: i32 = -2;
    pub const PRIMARY: i32 = -3;
    pub const OF_MAIN_WINDOW: i32 = -4;

    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            Self::PRIMARY => Some(Self::Primary),
            Self::WITH_MOUSE_FOCUS | Self::WITH_KEYBOARD_FOCUS | Self::OF_MAIN_WINDOW => {
                Some(Self::Current)
            }
            n => usize::try_from(n).ok().map(Self::Index),
        }
    }
}

pub fn dpi_for_scale(scale: f64) -> i32 {
    (BASE_DPI * scale).round() as i32
}

pub fn refresh_rate_hz(millihertz: Option<u32>) -> f32 {
    millihertz.map_or(-1.0, |mhz| mhz as f32 / 1000.0)
}

pub fn count(window: &Window) -> i32 {
    i32::try_from(window.available_monitors().count()).unwrap_or(i32::MAX)
}

/// Index of the primary monitor. 0 when the platform cannot tell.
pub fn primary_index(window: &Window) -> i32 {
    let Some(primary) = window.primary_monitor() else {
        return 0;
    };
    window
        .available_monitors()
        .position(|m| m == primary)
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(0)
}

pub fn resolve(window: &Window, raw: i32) -> Option<MonitorHandle> {
    match ScreenSelector::from_raw(raw)? {
        ScreenSelector::Index(i) => window.available_monitors().nth(i),
        ScreenSelector::Primary => window
            .primary_monitor()
            .or_else(|| window.available_monitors().next()),
        ScreenSelector::Current => window
            .current_monitor()
            .or_else(|| window.primary_monitor()),
    }
}

pub fn position(monitor: &MonitorHandle) -> Vector2i {
    let p = monitor.position();
    Vector2i::new(p.x, p.y)
}

pub fn size(monitor: &MonitorHandle) -> Vector2i {
    let s = monitor.size();
    Vector2i::new(
        i32::try_from(s.width).unwrap_or(i32::MAX),
        i32::try_from(s.height).unwrap_or(i32::MAX),
    )
}

pub fn usable_rect(monitor: &MonitorHandle) -> Rect2i {
    Rect2i {
        position: position(monitor),
        size: size(monitor),
    }
}

pub fn dpi(monitor: &MonitorHandle) -> i32 {
    dpi_for_scale(monitor.scale_factor())
}

pub fn scale(monitor: &MonitorHandle) -> f32 {
    monitor.scale_factor() as f32
}

pub fn refresh_rate(monitor: &MonitorHandle) -> f32 {
    refresh_rate_hz(monitor.refresh_rate_millihertz())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_decode() {
        assert_eq!(ScreenSelector::from_raw(0), Some(ScreenSelector::Index(0)));
        assert_eq!(ScreenSelector::from_raw(3), Some(ScreenSelector::Index(3)));
        assert_eq!(ScreenSelector::from_raw(-3), Some(ScreenSelector::Primary));
        assert_eq!(ScreenSelector::from_raw(-1), Some(ScreenSelector::Current));
        assert_eq!(ScreenSelector::from_raw(-4), Some(ScreenSelector::Current));
        assert_eq!(ScreenSelector::from_raw(-9), None);
    }

    #[test]
    fn test_dpi_scales_from_96() {
        assert_eq!(dpi_for_scale(1.0), 96);
        assert_eq!(dpi_for_scale(2.0), 192);
        assert_eq!(dpi_for_scale(1.25), 120);
    }

    #[test]
    fn test_unknown_refresh_rate_is_negative() {
        assert_eq!(refresh_rate_hz(None), -1.0);
        assert!((refresh_rate_hz(Some(59_940)) - 59.94).abs() < 1e-4);
    }
}
