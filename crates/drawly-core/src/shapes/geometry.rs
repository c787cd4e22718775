//! Fixed shape primitives.

use kurbo::{Line, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Length of each arrow head tick.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;
/// Angle between the shaft and each head tick.
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Geometry of a shape stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rectangle { x: f64, y: f64, w: f64, h: f64 },
    /// Rhombus inscribed in the box, vertices at the edge midpoints.
    Diamond { x: f64, y: f64, w: f64, h: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Line with two head ticks at the end point.
    Arrow { x1: f64, y1: f64, x2: f64, y2: f64 },
    Triangle { p1: Point, p2: Point, p3: Point },
}

impl ShapeGeometry {
    pub fn line(start: Point, end: Point) -> Self {
        ShapeGeometry::Line { x1: start.x, y1: start.y, x2: end.x, y2: end.y }
    }

    pub fn arrow(start: Point, end: Point) -> Self {
        ShapeGeometry::Arrow { x1: start.x, y1: start.y, x2: end.x, y2: end.y }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeGeometry::Rectangle { .. } => "rectangle",
            ShapeGeometry::Diamond { .. } => "diamond",
            ShapeGeometry::Circle { .. } => "circle",
            ShapeGeometry::Line { .. } => "line",
            ShapeGeometry::Arrow { .. } => "arrow",
            ShapeGeometry::Triangle { .. } => "triangle",
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            ShapeGeometry::Rectangle { x, y, .. } | ShapeGeometry::Diamond { x, y, .. } => {
                *x += delta.x;
                *y += delta.y;
            }
            ShapeGeometry::Circle { cx, cy, .. } => {
                *cx += delta.x;
                *cy += delta.y;
            }
            ShapeGeometry::Line { x1, y1, x2, y2 } | ShapeGeometry::Arrow { x1, y1, x2, y2 } => {
                *x1 += delta.x;
                *y1 += delta.y;
                *x2 += delta.x;
                *y2 += delta.y;
            }
            ShapeGeometry::Triangle { p1, p2, p3 } => {
                *p1 += delta;
                *p2 += delta;
                *p3 += delta;
            }
        }
    }

    /// Diamond vertices in order top, right, bottom, left.
    pub fn diamond_vertices(&self) -> Option<[Point; 4]> {
        match *self {
            ShapeGeometry::Diamond { x, y, w, h } => Some([
                Point::new(x + w / 2.0, y),
                Point::new(x + w, y + h / 2.0),
                Point::new(x + w / 2.0, y + h),
                Point::new(x, y + h / 2.0),
            ]),
            _ => None,
        }
    }

    /// The two head ticks of an arrow, each starting at the tip.
    pub fn arrow_head(&self) -> Option<[Line; 2]> {
        let ShapeGeometry::Arrow { x1, y1, x2, y2 } = *self else {
            return None;
        };
        let tip = Point::new(x2, y2);
        let angle = (y2 - y1).atan2(x2 - x1);
        let tick = |offset: f64| {
            let a = angle + PI + offset;
            Line::new(tip, tip + Vec2::new(a.cos(), a.sin()) * ARROW_HEAD_LENGTH)
        };
        Some([tick(-ARROW_HEAD_ANGLE), tick(ARROW_HEAD_ANGLE)])
    }
}
