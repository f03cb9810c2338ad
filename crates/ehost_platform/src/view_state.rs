//! Render-view state the engine can observe, kept apart from the winit calls
//! that feed it.

use ehost_core::abi::WindowEventKind;
use ehost_core::events::EngineEvent;
use ehost_core::glam::UVec2;

use crate::adapter::Surface;

/// Lifecycle flags, focus and pending geometry notifications of the render view.
///
/// Nothing is reported as focused or drawable until the view has been realized
/// (first resize or redraw), and nothing at all once it is closed.
#[derive(Debug, Default)]
pub struct ViewState {
    realized: bool,
    closed: bool,
    host_focused: bool,
    render_focused: bool,
    reported_focus: bool,
    project_running: bool,
    notifications: Vec<EngineEvent>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time.
    pub fn mark_realized(&mut self) -> bool {
        !std::mem::replace(&mut self.realized, true)
    }

    pub fn is_realized(&self) -> bool {
        self.realized
    }

    pub fn mark_closed(&mut self) {
        self.closed = true;
        self.notifications.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_live(&self) -> bool {
        self.realized && !self.closed
    }

    // ── Run state ───────────────────────────────────────────────────────

    /// Records whether a project runs. Returns true when this call stopped one.
    pub fn set_project_running(&mut self, running: bool) -> bool {
        let was_running = std::mem::replace(&mut self.project_running, running);
        was_running && !running
    }

    pub fn project_running(&self) -> bool {
        self.project_running
    }

    /// Engine resize requests only apply to a running project's open view.
    pub fn accepts_resize_request(&self) -> bool {
        self.project_running && !self.closed
    }

    pub fn can_draw(&self, drawable: UVec2, minimized: bool, visible: bool) -> bool {
        self.is_live() && drawable.cmpgt(UVec2::ZERO).all() && !minimized && visible
    }

    // ── Focus ───────────────────────────────────────────────────────────

    pub fn on_focus(&mut self, surface: Surface, focused: bool) {
        match surface {
            Surface::Host => self.host_focused = focused,
            Surface::RenderArea => self.render_focused = focused,
        }
    }

    /// Focused while either window has focus and the view is live.
    pub fn is_focused(&self) -> bool {
        self.is_live() && (self.host_focused || self.render_focused)
    }

    /// Combined focus, if it changed since the last call. Checked once per
    /// loop pass so focus moving between the two windows is not reported.
    pub fn take_focus_change(&mut self) -> Option<bool> {
        let focused = self.is_focused();
        (std::mem::replace(&mut self.reported_focus, focused) != focused).then_some(focused)
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Queues the engine notifications for a geometry change. A new drawable
    /// size is always announced before the scale change that caused it.
    pub fn queue_geometry(&mut self, drawable: Option<UVec2>, scale_changed: bool) {
        if self.closed {
            return;
        }
        if let Some(size) = drawable {
            self.notifications.push(EngineEvent::Resized(size));
        }
        if scale_changed {
            self.notifications
                .push(EngineEvent::Window(WindowEventKind::DpiChange));
        }
    }

    pub fn take_notifications(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> ViewState {
        let mut state = ViewState::new();
        state.mark_realized();
        state
    }

    #[test]
    fn test_focus_before_realize_is_not_reported() {
        let mut state = ViewState::new();
        state.on_focus(Surface::Host, true);
        assert!(!state.is_focused());
        assert_eq!(state.take_focus_change(), None);

        assert!(state.mark_realized());
        assert!(!state.mark_realized());
        assert!(state.is_focused());
        assert_eq!(state.take_focus_change(), Some(true));
    }

    #[test]
    fn test_closed_view_is_neither_focused_nor_drawable() {
        let mut state = live();
        state.on_focus(Surface::RenderArea, true);
        assert!(state.can_draw(UVec2::new(800, 600), false, true));
        state.mark_closed();
        assert!(!state.is_focused());
        assert!(!state.can_draw(UVec2::new(800, 600), false, true));
    }

    #[test]
    fn test_can_draw_requires_realized_visible_nonempty_view() {
        let size = UVec2::new(800, 600);
        assert!(!ViewState::new().can_draw(size, false, true));
        let state = live();
        assert!(state.can_draw(size, false, true));
        assert!(!state.can_draw(size, true, true));
        assert!(!state.can_draw(size, false, false));
        assert!(!state.can_draw(UVec2::new(0, 600), false, true));
    }

    #[test]
    fn test_focus_moving_between_windows_is_debounced() {
        let mut state = live();
        state.on_focus(Surface::Host, true);
        assert_eq!(state.take_focus_change(), Some(true));
        state.on_focus(Surface::Host, false);
        state.on_focus(Surface::RenderArea, true);
        assert_eq!(state.take_focus_change(), None);
        state.on_focus(Surface::RenderArea, false);
        assert_eq!(state.take_focus_change(), Some(false));
    }

    #[test]
    fn test_resize_requests_need_a_running_project() {
        let mut state = live();
        assert!(!state.accepts_resize_request());
        state.set_project_running(true);
        assert!(state.accepts_resize_request());
        state.mark_closed();
        assert!(!state.accepts_resize_request());
    }

    #[test]
    fn test_only_running_to_stopped_reports_a_stop() {
        let mut state = live();
        assert!(!state.set_project_running(false));
        assert!(!state.set_project_running(true));
        assert!(!state.set_project_running(true));
        assert!(state.set_project_running(false));
        assert!(!state.set_project_running(false));
    }

    #[test]
    fn test_scale_change_queues_resize_before_dpi_change() {
        let mut state = live();
        state.queue_geometry(Some(UVec2::new(1600, 1200)), true);
        assert_eq!(
            state.take_notifications(),
            vec![
                EngineEvent::Resized(UVec2::new(1600, 1200)),
                EngineEvent::Window(WindowEventKind::DpiChange),
            ]
        );
        assert!(state.take_notifications().is_empty());

        state.queue_geometry(None, true);
        assert_eq!(
            state.take_notifications(),
            vec![EngineEvent::Window(WindowEventKind::DpiChange)]
        );
    }

    #[test]
    fn test_closed_view_queues_nothing() {
        let mut state = live();
        state.queue_geometry(Some(UVec2::new(10, 10)), false);
        state.mark_closed();
        state.queue_geometry(Some(UVec2::new(20, 20)), true);
        assert!(state.take_notifications().is_empty());
    }
}
