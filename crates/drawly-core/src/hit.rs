//! Hit testing for stroke bodies and transform handles.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, TextMeasure, stroke_bounds};
use crate::shapes::Stroke;

/// Handles sit on the bounds grown by this margin (world units).
pub const HANDLE_MARGIN: f64 = 4.0;
/// Distance of the rotation handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;
/// A handle is hit when the pointer is closer than this.
pub const HANDLE_HIT_RADIUS: f64 = 15.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Left and right edges resize horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Uniform resize.
    Corner(Corner),
    /// Single-axis resize.
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

impl HandleKind {
    /// All handles in hit-test priority order.
    pub const ALL: [HandleKind; 9] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
        HandleKind::Edge(Edge::Right),
        HandleKind::Rotate,
    ];

    /// Short identifier (`tl`, `tr`, `bl`, `br`, `t`, `b`, `l`, `r`, `rot`).
    pub fn id(self) -> &'static str {
        match self {
            HandleKind::Corner(Corner::TopLeft) => "tl",
            HandleKind::Corner(Corner::TopRight) => "tr",
            HandleKind::Corner(Corner::BottomLeft) => "bl",
            HandleKind::Corner(Corner::BottomRight) => "br",
            HandleKind::Edge(Edge::Top) => "t",
            HandleKind::Edge(Edge::Bottom) => "b",
            HandleKind::Edge(Edge::Left) => "l",
            HandleKind::Edge(Edge::Right) => "r",
            HandleKind::Rotate => "rot",
        }
    }

    /// Position relative to the centroid for a box of half extents `hw`, `hh`,
    /// before scale and rotation.
    fn local_position(self, hw: f64, hh: f64) -> Vec2 {
        match self {
            HandleKind::Corner(Corner::TopLeft) => Vec2::new(-hw, -hh),
            HandleKind::Corner(Corner::TopRight) => Vec2::new(hw, -hh),
            HandleKind::Corner(Corner::BottomLeft) => Vec2::new(-hw, hh),
            HandleKind::Corner(Corner::BottomRight) => Vec2::new(hw, hh),
            HandleKind::Edge(Edge::Top) => Vec2::new(0.0, -hh),
            HandleKind::Edge(Edge::Bottom) => Vec2::new(0.0, hh),
            HandleKind::Edge(Edge::Left) => Vec2::new(-hw, 0.0),
            HandleKind::Edge(Edge::Right) => Vec2::new(hw, 0.0),
            HandleKind::Rotate => Vec2::new(0.0, -hh - ROTATE_HANDLE_OFFSET),
        }
    }
}

/// A transform handle with its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { kind, position }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.position.distance(point) < HANDLE_HIT_RADIUS
    }
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Map a world point into the stroke's unrotated, unscaled frame centred on
/// its centroid.
pub fn to_local(stroke: &Stroke, bounds: &Bounds, world: Point) -> Vec2 {
    let rotated = rotate(world - bounds.centroid(), -stroke.rotation);
    let scale = stroke.render_scale();
    // A collapsed axis maps everything onto the centre line.
    let axis = |v: f64, s: f64| if s.abs() < f64::EPSILON { 0.0 } else { v / s };
    Vec2::new(axis(rotated.x, scale.x), axis(rotated.y, scale.y))
}

/// Whether `world` falls inside the stroke's transformed box.
pub fn stroke_contains(stroke: &Stroke, world: Point, measure: &dyn TextMeasure) -> bool {
    let bounds = stroke_bounds(stroke, measure);
    let local = to_local(stroke, &bounds, world);
    let (hw, hh) = (bounds.w / 2.0, bounds.h / 2.0);
    local.x >= -hw && local.x <= hw && local.y >= -hh && local.y <= hh
}

/// Index of the topmost stroke containing `world`.
pub fn hit_stroke(strokes: &[Stroke], world: Point, measure: &dyn TextMeasure) -> Option<usize> {
    strokes.iter().rposition(|stroke| stroke_contains(stroke, world, measure))
}

/// World positions of all handles of a stroke, in hit-test order.
pub fn handle_positions(stroke: &Stroke, measure: &dyn TextMeasure) -> Vec<Handle> {
    let bounds = stroke_bounds(stroke, measure);
    let center = bounds.centroid();
    let hw = bounds.w / 2.0 + HANDLE_MARGIN;
    let hh = bounds.h / 2.0 + HANDLE_MARGIN;
    let scale = stroke.render_scale();

    HandleKind::ALL
        .iter()
        .map(|&kind| {
            let local = kind.local_position(hw, hh);
            let scaled = Vec2::new(local.x * scale.x, local.y * scale.y);
            Handle::new(center + rotate(scaled, stroke.rotation), kind)
        })
        .collect()
}

/// First handle of `stroke` under `world`.
pub fn hit_handle(stroke: &Stroke, world: Point, measure: &dyn TextMeasure) -> Option<HandleKind> {
    handle_positions(stroke, measure)
        .into_iter()
        .find(|handle| handle.hit_test(world))
        .map(|handle| handle.kind)
}

/// Indices of strokes whose bounds strictly overlap the marquee rectangle.
pub fn strokes_in_rect(strokes: &[Stroke], rect: Rect, measure: &dyn TextMeasure) -> Vec<usize> {
    let marquee = Bounds::from_rect(rect);
    strokes
        .iter()
        .enumerate()
        .filter(|(_, stroke)| stroke_bounds(stroke, measure).intersects(&marquee))
        .map(|(i, _)| i)
        .collect()
}
