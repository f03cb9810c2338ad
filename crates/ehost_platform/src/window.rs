use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use ehost_core::abi::{ButtonMask, CursorShape, HandleType, MouseMode, Vector2i};
use ehost_core::events::EngineEvent;
use ehost_core::geometry::{Insets, Layout};
use ehost_core::glam::{DVec2, UVec2};
use ehost_core::input::InputState;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::{HandleError, HasWindowHandle};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::adapter::Surface;
use crate::cursor;
use crate::handles::NativeHandles;
use crate::view_state::ViewState;

pub struct PlatformConfig {
    pub title: String,
    /// Render area size in logical points.
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Embedded Engine Host".to_string(),
            width: 1152,
            height: 648,
            insets: Insets::top_bar(40.0),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("native window handle unavailable: {0}")]
    Handle(#[from] HandleError),
}

/// The host window, the render view embedded in it, and everything the engine
/// can query about them.
///
/// Shared through an `Rc` between the event loop and the display-server table.
/// Engine callbacks arrive re-entrantly during an engine iteration, so all state
/// lives in cells and no borrow is held across a call into the engine.
pub struct WindowContext {
    // Declared before `host` so the child view is destroyed first.
    render: Arc<Window>,
    host: Arc<Window>,
    handles: NativeHandles,
    layout: Cell<Layout>,
    input: RefCell<InputState>,
    cursor_shape: Cell<CursorShape>,
    title: RefCell<String>,
    status: RefCell<String>,
    view: RefCell<ViewState>,
    presented_frames: Cell<u64>,
}

impl WindowContext {
    /// Creates the host window and the render view inset inside it.
    pub fn init(
        event_loop: &ActiveEventLoop,
        config: &PlatformConfig,
    ) -> Result<Rc<Self>, PlatformError> {
        let area = DVec2::new(f64::from(config.width), f64::from(config.height));
        let window_size = area + config.insets.extent();
        let host_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(window_size.x, window_size.y));
        let host = Arc::new(event_loop.create_window(host_attrs)?);

        let parent = host.window_handle()?.as_raw();
        let origin = config.insets.origin();
        // SAFETY: the parent handle belongs to `host`, which this context keeps
        // alive for longer than the render view.
        let render_attrs = unsafe { WindowAttributes::default().with_parent_window(Some(parent)) }
            .with_decorations(false)
            .with_position(LogicalPosition::new(origin.x, origin.y))
            .with_inner_size(LogicalSize::new(area.x, area.y));
        let render = Arc::new(event_loop.create_window(render_attrs)?);

        let handles = NativeHandles::capture(&host, &render)?;
        let scale = host.scale_factor();
        let mut layout = Layout::for_render_area(area, scale, config.insets);
        let actual = host.inner_size().to_logical::<f64>(scale);
        layout.set_window_size(DVec2::new(actual.width, actual.height));

        log::info!(
            "Created host window {}x{} (render area {}x{} px, scale {})",
            actual.width,
            actual.height,
            layout.drawable_size().x,
            layout.drawable_size().y,
            scale
        );

        Ok(Rc::new(Self {
            render,
            host,
            handles,
            layout: Cell::new(layout),
            input: RefCell::new(InputState::new()),
            cursor_shape: Cell::new(CursorShape::Arrow),
            title: RefCell::new(String::new()),
            status: RefCell::new(String::new()),
            view: RefCell::new(ViewState::new()),
            presented_frames: Cell::new(0),
        }))
    }

    pub fn host_window(&self) -> &Arc<Window> {
        &self.host
    }

    pub fn render_window(&self) -> &Arc<Window> {
        &self.render
    }

    pub fn surface_of(&self, id: WindowId) -> Option<Surface> {
        if id == self.host.id() {
            Some(Surface::Host)
        } else if id == self.render.id() {
            Some(Surface::RenderArea)
        } else {
            None
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout.get()
    }

    pub fn drawable_size(&self) -> UVec2 {
        self.layout.get().drawable_size()
    }

    /// Runs `f` with the shared input state. Must not call into the engine.
    pub fn with_input<R>(&self, f: impl FnOnce(&mut InputState) -> R) -> R {
        f(&mut self.input.borrow_mut())
    }

    /// Opaque handle of the requested kind; 0 once the windows are closed.
    pub fn native_handle(&self, kind: HandleType) -> i64 {
        if self.is_closed() {
            return 0;
        }
        self.handles.get(kind)
    }

    pub fn mark_realized(&self) {
        if self.view.borrow_mut().mark_realized() {
            log::debug!("Render view realized");
        }
    }

    pub fn mark_closed(&self) {
        self.view.borrow_mut().mark_closed();
    }

    pub fn is_closed(&self) -> bool {
        self.view.borrow().is_closed()
    }

    // ── Host chrome ─────────────────────────────────────────────────────

    /// Updates the title label shown in the toolbar. Geometry is untouched.
    pub fn set_window_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Mirrors the lifecycle into the chrome. Engine resize requests are only
    /// honored while a project runs. When a project stops, the pointer mode and
    /// cursor it left behind are reset so the toolbar stays usable.
    pub fn set_run_state(&self, project_running: bool, status: &str) {
        let stopped = self.view.borrow_mut().set_project_running(project_running);
        {
            let mut current = self.status.borrow_mut();
            if *current != status {
                *current = status.to_string();
            }
        }
        if stopped {
            self.set_mouse_mode(MouseMode::Visible);
            self.set_cursor_shape(CursorShape::Arrow);
        }
    }

    pub fn project_running(&self) -> bool {
        self.view.borrow().project_running()
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    // ── Geometry ────────────────────────────────────────────────────────

    pub fn on_host_resized(&self, size: PhysicalSize<u32>) {
        let mut layout = self.layout.get();
        let logical = size.to_logical::<f64>(layout.scale());
        let changed = layout.set_window_size(DVec2::new(logical.width, logical.height));
        self.apply_layout(layout, changed, false);
    }

    pub fn on_scale_changed(&self, scale: f64) {
        let mut layout = self.layout.get();
        let changed = layout.set_scale(scale);
        self.apply_layout(layout, changed, true);
    }

    /// Commits a layout, moves the render view into place, and queues the
    /// engine notifications for it.
    fn apply_layout(&self, layout: Layout, drawable_changed: bool, scale_changed: bool) {
        self.layout.set(layout);
        let origin = layout.render_origin();
        let size = layout.render_size();
        self.render
            .set_outer_position(LogicalPosition::new(origin.x, origin.y));
        let _ = self
            .render
            .request_inner_size(LogicalSize::new(size.x, size.y));
        let drawable = drawable_changed.then(|| layout.drawable_size());
        if let Some(size) = drawable {
            log::debug!("Drawable size is now {}x{}", size.x, size.y);
        }
        self.view
            .borrow_mut()
            .queue_geometry(drawable, scale_changed);
    }

    /// Engine notifications produced by geometry changes since the last call.
    pub fn take_notifications(&self) -> Vec<EngineEvent> {
        self.view.borrow_mut().take_notifications()
    }

    /// Engine request to resize the render area, in pixels. The area only grows.
    pub fn request_render_size(&self, pixels: Vector2i) {
        if !self.view.borrow().accepts_resize_request() {
            log::debug!("Ignoring engine resize request while no project is running");
            return;
        }
        let layout = self.layout.get();
        let requested = DVec2::new(f64::from(pixels.x), f64::from(pixels.y));
        let area = layout.clamp_resize_request(requested);
        if area == layout.render_size() {
            return;
        }
        let window = layout.window_size_for(area);
        log::debug!("Engine requested render area {}x{} pt", area.x, area.y);
        if let Some(actual) = self
            .host
            .request_inner_size(LogicalSize::new(window.x, window.y))
        {
            self.on_host_resized(actual);
        }
    }

    /// Screen position of the render area's top-left corner, in pixels.
    pub fn render_position(&self) -> Vector2i {
        let layout = self.layout.get();
        let offset = (layout.render_origin() * layout.scale()).round();
        let inner = self
            .host
            .inner_position()
            .unwrap_or(PhysicalPosition::new(0, 0));
        Vector2i::new(inner.x + offset.x as i32, inner.y + offset.y as i32)
    }

    /// Moves the host window so the render area's top-left lands on `pixels`.
    pub fn set_render_position(&self, pixels: Vector2i) {
        let layout = self.layout.get();
        let offset = (layout.render_origin() * layout.scale()).round();
        let frame = match (self.host.outer_position(), self.host.inner_position()) {
            (Ok(outer), Ok(inner)) => (inner.x - outer.x, inner.y - outer.y),
            _ => (0, 0),
        };
        self.host.set_outer_position(PhysicalPosition::new(
            pixels.x - offset.x as i32 - frame.0,
            pixels.y - offset.y as i32 - frame.1,
        ));
    }

    pub fn can_draw(&self) -> bool {
        let minimized = self.host.is_minimized() == Some(true);
        let visible = self.render.is_visible() != Some(false);
        self.view
            .borrow()
            .can_draw(self.drawable_size(), minimized, visible)
    }

    // ── Focus ───────────────────────────────────────────────────────────

    pub fn on_focus(&self, surface: Surface, focused: bool) {
        self.view.borrow_mut().on_focus(surface, focused);
    }

    /// Focused while either window has focus, once the render view is realized.
    pub fn is_focused(&self) -> bool {
        self.view.borrow().is_focused()
    }

    pub fn take_focus_change(&self) -> Option<bool> {
        self.view.borrow_mut().take_focus_change()
    }

    // ── Pointer ─────────────────────────────────────────────────────────

    pub fn set_mouse_mode(&self, mode: MouseMode) {
        let previous = self.input.borrow().mouse_mode();
        if previous == mode {
            return;
        }
        self.input.borrow_mut().set_mouse_mode(mode);
        cursor::apply_mouse_mode(&self.render, mode);
        log::debug!("Mouse mode {:?} -> {:?}", previous, mode);
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.input.borrow().mouse_mode()
    }

    pub fn mouse_position(&self) -> Vector2i {
        let position = self.input.borrow().mouse_position().round();
        Vector2i::new(position.x as i32, position.y as i32)
    }

    pub fn button_state(&self) -> ButtonMask {
        self.input.borrow().buttons()
    }

    /// Moves the pointer to `pixels` in render-area coordinates.
    pub fn warp_mouse(&self, pixels: Vector2i) {
        // Render-view physical pixels are engine pixels.
        if let Err(err) = self
            .render
            .set_cursor_position(PhysicalPosition::new(pixels.x, pixels.y))
        {
            log::warn!("Failed to warp pointer: {err}");
            return;
        }
        self.input
            .borrow_mut()
            .move_to(DVec2::new(f64::from(pixels.x), f64::from(pixels.y)));
    }

    pub fn set_cursor_shape(&self, shape: CursorShape) {
        if self.cursor_shape.replace(shape) != shape {
            self.render.set_cursor(cursor::cursor_icon(shape));
        }
    }

    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape.get()
    }

    // ── Presentation ────────────────────────────────────────────────────

    /// Records a frame the engine presented to the render view.
    pub fn present(&self) {
        let frames = self.presented_frames.get() + 1;
        self.presented_frames.set(frames);
        log::trace!("Engine presented frame {}", frames);
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented_frames.get()
    }
}
