//! Native handles exported to the engine as opaque integers.

use ehost_core::abi::HandleType;
use winit::raw_window_handle::{
    HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle,
};
use winit::window::Window;

/// Handles captured once when the windows are created. They stay valid for the
/// lifetime of the windows; the render view is never recreated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeHandles {
    pub display: i64,
    pub window: i64,
    pub view: i64,
}

impl NativeHandles {
    pub fn capture(host: &Window, render: &Window) -> Result<Self, HandleError> {
        Ok(Self {
            display: display_handle_value(host.display_handle()?.as_raw()),
            window: window_handle_value(host.window_handle()?.as_raw()),
            view: window_handle_value(render.window_handle()?.as_raw()),
        })
    }

    /// Value for `kind`. The host owns no GL or EGL objects, so those are 0.
    pub fn get(&self, kind: HandleType) -> i64 {
        match kind {
            HandleType::DisplayHandle => self.display,
            HandleType::WindowHandle => self.window,
            HandleType::WindowView => self.view,
            HandleType::OpenGlContext | HandleType::EglDisplay | HandleType::EglConfig => 0,
        }
    }
}

pub fn window_handle_value(raw: RawWindowHandle) -> i64 {
    match raw {
        RawWindowHandle::AppKit(h) => h.ns_view.as_ptr() as i64,
        RawWindowHandle::UiKit(h) => h.ui_view.as_ptr() as i64,
        RawWindowHandle::Win32(h) => h.hwnd.get() as i64,
        RawWindowHandle::Xlib(h) => h.window as i64,
        RawWindowHandle::Xcb(h) => i64::from(h.window.get()),
        RawWindowHandle::Wayland(h) => h.surface.as_ptr() as i64,
        _ => 0,
    }
}

pub fn display_handle_value(raw: RawDisplayHandle) -> i64 {
    match raw {
        RawDisplayHandle::Xlib(h) => h.display.map_or(0, |d| d.as_ptr() as i64),
        RawDisplayHandle::Xcb(h) => h.connection.map_or(0, |c| c.as_ptr() as i64),
        RawDisplayHandle::Wayland(h) => h.display.as_ptr() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::{NonZeroIsize, NonZeroU32};
    use winit::raw_window_handle::{
        AppKitDisplayHandle, Win32WindowHandle, XcbWindowHandle, XlibDisplayHandle,
        XlibWindowHandle,
    };

    #[test]
    fn test_window_handles_encode_their_native_id() {
        let hwnd = NonZeroIsize::new(0x1234).unwrap();
        let win32 = RawWindowHandle::Win32(Win32WindowHandle::new(hwnd));
        assert_eq!(window_handle_value(win32), 0x1234);

        let xlib = RawWindowHandle::Xlib(XlibWindowHandle::new(42));
        assert_eq!(window_handle_value(xlib), 42);

        let window = NonZeroU32::new(7).unwrap();
        let xcb = RawWindowHandle::Xcb(XcbWindowHandle::new(window));
        assert_eq!(window_handle_value(xcb), 7);
    }

    #[test]
    fn test_display_without_connection_is_zero() {
        let appkit = RawDisplayHandle::AppKit(AppKitDisplayHandle::new());
        assert_eq!(display_handle_value(appkit), 0);
        let xlib = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        assert_eq!(display_handle_value(xlib), 0);
    }

    #[test]
    fn test_gl_handles_are_never_exported() {
        let handles = NativeHandles {
            display: 1,
            window: 2,
            view: 3,
        };
        assert_eq!(handles.get(HandleType::WindowView), 3);
        assert_eq!(handles.get(HandleType::WindowHandle), 2);
        assert_eq!(handles.get(HandleType::OpenGlContext), 0);
        assert_eq!(handles.get(HandleType::EglConfig), 0);
    }
}
