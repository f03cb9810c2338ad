//! Host window layout: where the render area sits and how native points map to
//! engine pixels.
//!
//! Native points are logical window-content points with the origin at the top-left
//! of the host window's content area. Engine coordinates are physical pixels with
//! the origin at the top-left of the render area. The drawable size is never
//! stored; it is derived from the logical render-area size and the backing scale,
//! so it cannot drift out of sync with either.

use glam::{DVec2, UVec2};

/// Space reserved around the render area for host UI, in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub fn top_bar(height: f64) -> Self {
        Self {
            top: height,
            ..Self::default()
        }
    }

    /// Total horizontal and vertical space taken by the insets.
    pub fn extent(&self) -> DVec2 {
        DVec2::new(self.left + self.right, self.top + self.bottom)
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.left, self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    window_size: DVec2,
    scale: f64,
    insets: Insets,
}

impl Layout {
    /// Layout whose render area is exactly `area` logical points.
    pub fn for_render_area(area: DVec2, scale: f64, insets: Insets) -> Self {
        Self {
            window_size: area.max(DVec2::ZERO) + insets.extent(),
            scale: sanitize_scale(scale).unwrap_or(1.0),
            insets,
        }
    }

    pub fn window_size(&self) -> DVec2 {
        self.window_size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn render_origin(&self) -> DVec2 {
        self.insets.origin()
    }

    /// Logical size of the render area. Never negative.
    pub fn render_size(&self) -> DVec2 {
        (self.window_size - self.insets.extent()).max(DVec2::ZERO)
    }

    /// Pixel size the presentable surface must have.
    pub fn drawable_size(&self) -> UVec2 {
        (self.render_size() * self.scale).round().as_uvec2()
    }

    /// Applies a new logical window size. Returns true when the drawable size changed.
    pub fn set_window_size(&mut self, size: DVec2) -> bool {
        let before = self.drawable_size();
        self.window_size = size.max(DVec2::ZERO);
        self.drawable_size() != before
    }

    /// Applies a new backing scale. Returns true when the drawable size changed.
    /// Non-positive or non-finite scales are ignored.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        let Some(scale) = sanitize_scale(scale) else {
            log::warn!("Ignoring invalid backing scale {scale}");
            return false;
        };
        let before = self.drawable_size();
        self.scale = scale;
        self.drawable_size() != before
    }

    /// Native window-content point to engine pixel coordinates.
    pub fn to_engine(&self, native: DVec2) -> DVec2 {
        (native - self.render_origin()) * self.scale
    }

    /// Engine pixel coordinates back to a native window-content point.
    pub fn to_native(&self, engine: DVec2) -> DVec2 {
        engine / self.scale + self.render_origin()
    }

    /// Whether a native point lies inside the render area (edges inclusive).
    pub fn contains(&self, native: DVec2) -> bool {
        let local = native - self.render_origin();
        let size = self.render_size();
        local.x >= 0.0 && local.y >= 0.0 && local.x <= size.x && local.y <= size.y
    }

    /// Converts an engine resize request (pixels) to the logical render-area size
    /// that will actually be applied. The area only ever grows: each dimension is
    /// at least the current render size.
    pub fn clamp_resize_request(&self, requested_pixels: DVec2) -> DVec2 {
        let requested = requested_pixels / self.scale;
        requested.max(self.render_size())
    }

    /// Host window size needed to give the render area `area` logical points.
    pub fn window_size_for(&self, area: DVec2) -> DVec2 {
        area + self.insets.extent()
    }
}

fn sanitize_scale(scale: f64) -> Option<f64> {
    (scale.is_finite() && scale > 0.0).then_some(scale)
}
