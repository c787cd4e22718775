//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change applied by the zoom in/out buttons.
pub const ZOOM_STEP: f64 = 0.1;
/// Zoom change per unit of wheel delta.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.001;

/// Camera manages the view transform for the canvas.
///
/// `screen = world * zoom + offset`. Zoom is always kept within
/// [`MIN_ZOOM`, `MAX_ZOOM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, zoom: 1.0 }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// World to screen transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-space length (e.g. a pick radius) to world units.
    pub fn screen_dist_to_world(&self, dist: f64) -> f64 {
        dist / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Add `delta` to the zoom (clamped), keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, delta: f64) {
        let world_point = self.screen_to_world(anchor);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = anchor.to_vec2() - world_point.to_vec2() * self.zoom;
    }

    /// Zoom from a wheel event; scrolling down zooms out.
    pub fn zoom_wheel(&mut self, anchor: Point, wheel_dy: f64) {
        self.zoom_at(anchor, -wheel_dy * WHEEL_ZOOM_FACTOR);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
