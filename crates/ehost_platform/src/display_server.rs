//! The display-server capability table handed to the engine.
//!
//! Every callback tolerates a null userdata, an unknown window id, or a closed
//! context by returning a zero value. Out-of-domain enum values are logged and
//! ignored.

use std::ffi::{c_char, c_void, CStr};
use std::rc::Rc;

use ehost_core::abi::{CursorShape, HandleType, MouseMode, Rect2i, Vector2i};
use ehost_engine::{DisplayServerInterface, UserData, MAIN_WINDOW_ID};

use crate::screens;
use crate::window::WindowContext;

/// Leaks a table whose userdata points at `context`.
///
/// The caller keeps `context` alive until the engine instance is destroyed; the
/// engine never calls through the table after that.
pub fn build_interface(context: &Rc<WindowContext>) -> &'static DisplayServerInterface {
    let userdata = Rc::as_ptr(context) as *mut c_void;
    Box::leak(Box::new(interface(userdata)))
}

fn interface(userdata: UserData) -> DisplayServerInterface {
    DisplayServerInterface {
        userdata,
        screen_get_count,
        screen_get_primary,
        screen_get_position,
        screen_get_size,
        screen_get_usable_rect,
        screen_get_dpi,
        screen_get_scale,
        screen_get_refresh_rate,
        window_get_position,
        window_get_size,
        window_set_position,
        window_set_size,
        window_set_title,
        window_is_focused,
        window_can_draw,
        window_get_native_handle,
        mouse_set_mode,
        mouse_get_mode,
        mouse_get_position,
        mouse_get_button_state,
        warp_mouse,
        cursor_set_shape,
        cursor_get_shape,
        swap_buffers,
    }
}

/// # Safety
///
/// `userdata` is null or points at a live [`WindowContext`].
unsafe fn context<'a>(userdata: UserData) -> Option<&'a WindowContext> {
    (userdata as *const WindowContext)
        .as_ref()
        .filter(|ctx| !ctx.is_closed())
}

/// # Safety
///
/// Same as [`context`].
unsafe fn main_window<'a>(userdata: UserData, window_id: i32) -> Option<&'a WindowContext> {
    if window_id != MAIN_WINDOW_ID {
        log::trace!("Query for unknown window {window_id}");
        return None;
    }
    context(userdata)
}

unsafe extern "C" fn screen_get_count(userdata: UserData) -> i32 {
    context(userdata).map_or(0, |ctx| screens::count(ctx.host_window()))
}

unsafe extern "C" fn screen_get_primary(userdata: UserData) -> i32 {
    context(userdata).map_or(0, |ctx| screens::primary_index(ctx.host_window()))
}

unsafe extern "C" fn screen_get_position(userdata: UserData, screen: i32) -> Vector2i {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(Vector2i::ZERO, |m| screens::position(&m))
}

unsafe extern "C" fn screen_get_size(userdata: UserData, screen: i32) -> Vector2i {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(Vector2i::ZERO, |m| screens::size(&m))
}

unsafe extern "C" fn screen_get_usable_rect(userdata: UserData, screen: i32) -> Rect2i {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(
            Rect2i {
                position: Vector2i::ZERO,
                size: Vector2i::ZERO,
            },
            |m| screens::usable_rect(&m),
        )
}

unsafe extern "C" fn screen_get_dpi(userdata: UserData, screen: i32) -> i32 {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(screens::BASE_DPI as i32, |m| screens::dpi(&m))
}

unsafe extern "C" fn screen_get_scale(userdata: UserData, screen: i32) -> f32 {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(1.0, |m| screens::scale(&m))
}

unsafe extern "C" fn screen_get_refresh_rate(userdata: UserData, screen: i32) -> f32 {
    context(userdata)
        .and_then(|ctx| screens::resolve(ctx.host_window(), screen))
        .map_or(-1.0, |m| screens::refresh_rate(&m))
}

unsafe extern "C" fn window_get_position(userdata: UserData, window_id: i32) -> Vector2i {
    main_window(userdata, window_id).map_or(Vector2i::ZERO, WindowContext::render_position)
}

unsafe extern "C" fn window_get_size(userdata: UserData, window_id: i32) -> Vector2i {
    main_window(userdata, window_id).map_or(Vector2i::ZERO, |ctx| {
        let size = ctx.drawable_size();
        Vector2i::new(
            i32::try_from(size.x).unwrap_or(i32::MAX),
            i32::try_from(size.y).unwrap_or(i32::MAX),
        )
    })
}

unsafe extern "C" fn window_set_position(userdata: UserData, window_id: i32, position: Vector2i) {
    if let Some(ctx) = main_window(userdata, window_id) {
        ctx.set_render_position(position);
    }
}

unsafe extern "C" fn window_set_size(userdata: UserData, window_id: i32, size: Vector2i) {
    if let Some(ctx) = main_window(userdata, window_id) {
        ctx.request_render_size(size);
    }
}

unsafe extern "C" fn window_set_title(userdata: UserData, window_id: i32, title: *const c_char) {
    let Some(ctx) = main_window(userdata, window_id) else {
        return;
    };
    if title.is_null() {
        return;
    }
    ctx.set_window_title(&CStr::from_ptr(title).to_string_lossy());
}

unsafe extern "C" fn window_is_focused(userdata: UserData, window_id: i32) -> bool {
    main_window(userdata, window_id).is_some_and(WindowContext::is_focused)
}

unsafe extern "C" fn window_can_draw(userdata: UserData, window_id: i32) -> bool {
    main_window(userdata, window_id).is_some_and(WindowContext::can_draw)
}

unsafe extern "C" fn window_get_native_handle(
    userdata: UserData,
    handle_type: i32,
    window_id: i32,
) -> i64 {
    let Some(ctx) = main_window(userdata, window_id) else {
        return 0;
    };
    match HandleType::try_from(handle_type) {
        Ok(kind) => ctx.native_handle(kind),
        Err(err) => {
            log::warn!("{err}");
            0
        }
    }
}

unsafe extern "C" fn mouse_set_mode(userdata: UserData, mode: i32) {
    let Some(ctx) = context(userdata) else {
        return;
    };
    match MouseMode::try_from(mode) {
        Ok(mode) => ctx.set_mouse_mode(mode),
        Err(err) => log::warn!("{err}"),
    }
}

unsafe extern "C" fn mouse_get_mode(userdata: UserData) -> i32 {
    context(userdata)
        .map_or(MouseMode::Visible, WindowContext::mouse_mode)
        .as_raw()
}

unsafe extern "C" fn mouse_get_position(userdata: UserData) -> Vector2i {
    context(userdata).map_or(Vector2i::ZERO, WindowContext::mouse_position)
}

unsafe extern "C" fn mouse_get_button_state(userdata: UserData) -> u32 {
    context(userdata).map_or(0, |ctx| ctx.button_state().bits())
}

unsafe extern "C" fn warp_mouse(userdata: UserData, position: Vector2i) {
    if let Some(ctx) = context(userdata) {
        ctx.warp_mouse(position);
    }
}

unsafe extern "C" fn cursor_set_shape(userdata: UserData, shape: i32) {
    let Some(ctx) = context(userdata) else {
        return;
    };
    match CursorShape::try_from(shape) {
        Ok(shape) => ctx.set_cursor_shape(shape),
        Err(err) => log::warn!("{err}"),
    }
}

unsafe extern "C" fn cursor_get_shape(userdata: UserData) -> i32 {
    context(userdata)
        .map_or(CursorShape::Arrow, WindowContext::cursor_shape)
        .as_raw()
}

unsafe extern "C" fn swap_buffers(userdata: UserData) {
    if let Some(ctx) = context(userdata) {
        ctx.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_null_userdata_yields_defaults() {
        let table = interface(ptr::null_mut());
        let ud = table.userdata;
        unsafe {
            assert_eq!((table.screen_get_count)(ud), 0);
            assert_eq!((table.window_get_size)(ud, MAIN_WINDOW_ID), Vector2i::ZERO);
            assert!(!(table.window_can_draw)(ud, MAIN_WINDOW_ID));
            assert!(!(table.window_is_focused)(ud, MAIN_WINDOW_ID));
            assert_eq!((table.window_get_native_handle)(ud, 2, MAIN_WINDOW_ID), 0);
            assert_eq!((table.mouse_get_mode)(ud), MouseMode::Visible.as_raw());
            assert_eq!((table.cursor_get_shape)(ud), CursorShape::Arrow.as_raw());
            assert_eq!((table.mouse_get_button_state)(ud), 0);
            assert_eq!((table.screen_get_refresh_rate)(ud, 0), -1.0);
        }
    }

    #[test]
    fn test_commands_on_null_userdata_are_ignored() {
        let table = interface(ptr::null_mut());
        let ud = table.userdata;
        unsafe {
            (table.window_set_size)(ud, MAIN_WINDOW_ID, Vector2i::new(10, 10));
            (table.window_set_title)(ud, MAIN_WINDOW_ID, ptr::null());
            (table.mouse_set_mode)(ud, 99);
            (table.cursor_set_shape)(ud, -1);
            (table.warp_mouse)(ud, Vector2i::new(1, 1));
            (table.swap_buffers)(ud);
        }
    }

    #[test]
    fn test_table_is_pointer_sized_fields() {
        // userdata plus one function pointer per callback.
        assert_eq!(
            std::mem::size_of::<DisplayServerInterface>(),
            25 * std::mem::size_of::<usize>()
        );
    }
}
