//! What the renderer needs to draw a frame.
//!
//! The core never produces pixels. It hands the renderer an ordered list of
//! strokes with their transforms plus the selection chrome in world
//! coordinates; the renderer applies [`Camera::transform`](crate::Camera::transform).

use kurbo::{Point, Rect, Vec2};
use peniko::Color;

use crate::bounds::Bounds;
use crate::hit::Handle;
use crate::shapes::{Geometry, Rgb, StrokeId, StrokeKind};

/// One stroke to draw, in sequence (z) order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem<'a> {
    pub index: usize,
    pub id: StrokeId,
    pub kind: StrokeKind,
    pub geometry: &'a Geometry,
    pub color: Rgb,
    pub stroke_width: f64,
    /// Rotation about the bounds centroid, in radians.
    pub rotation: f64,
    /// Effective scale about the bounds centroid.
    pub scale: Vec2,
    pub bounds: Bounds,
    pub is_selected: bool,
}

impl RenderItem<'_> {
    /// Brush strokes get a soft glow.
    pub fn is_brush(&self) -> bool {
        self.kind == StrokeKind::Brush
    }

    pub fn paint(&self) -> Color {
        self.color.into()
    }
}

/// A full frame: strokes plus overlays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene<'a> {
    pub items: Vec<RenderItem<'a>>,
    /// Handles of the target stroke, shown only with the move tool.
    pub handles: Vec<Handle>,
    /// Trace of the drawing in progress.
    pub preview: Option<&'a [Point]>,
    pub preview_color: Rgb,
    pub marquee: Option<Rect>,
}

/// Cursor the host should show for the pointer's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a rotation handle, or panning.
    Grab,
    /// Over a resize handle.
    Resize,
}
