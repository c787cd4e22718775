//! Shape recognition.
//!
//! Two paths turn a finished pointer trace into geometry: shape tools build
//! their shape directly from the trace, while the pen may collapse to a
//! straight line or be classified as a circle, triangle or rectangle.

use kurbo::{Point, Vec2};
use std::f64::consts::PI;

use crate::bounds::points_bounds;
use crate::settings::Settings;
use crate::shapes::{Geometry, ShapeGeometry};
use crate::snap::snap_line_to_axis;
use crate::tools::ToolKind;

/// Fewer points than this are never classified.
pub const MIN_FREEHAND_POINTS: usize = 12;
/// A trace is closed when its ends are within this fraction of the larger box side.
pub const CLOSED_RATIO: f64 = 0.35;
/// Maximum coefficient of variation of centroid distance for a circle.
pub const CIRCLE_MAX_CV: f64 = 0.25;
/// Width/height must lie strictly inside this range for a circle.
pub const CIRCLE_ASPECT_RANGE: (f64, f64) = (0.5, 2.0);
/// Heading change (radians) that marks a corner.
pub const CORNER_TURN_THRESHOLD: f64 = 0.6;
/// Points on either side used to measure the heading at a sample.
pub const CORNER_WINDOW: usize = 3;
/// Corners closer than this fraction of the larger box side are merged.
pub const CORNER_MIN_SEPARATION: f64 = 0.15;
/// Two corners count as a triangle only above this variation.
pub const TRIANGLE_TWO_CORNER_CV: f64 = 0.2;
/// Variation above which a closed trace without enough corners is a rectangle.
pub const RECTANGLE_MIN_CV: f64 = 0.2;
/// Chord/arc ratio above which a pen trace becomes a line.
pub const LINE_STRAIGHTNESS: f64 = 0.85;
/// Triangle base half-width as a fraction of its height.
pub const TRIANGLE_BASE_RATIO: f64 = 0.5;

/// Build the shape for a shape tool from its pointer trace.
///
/// Returns `None` for empty input, non-shape tools, and a triangle whose start
/// and end coincide.
pub fn from_forced_tool(points: &[Point], tool: ToolKind, line_snap: bool) -> Option<ShapeGeometry> {
    let (&start, &end) = (points.first()?, points.last()?);
    let b = points_bounds(points);

    match tool {
        ToolKind::Rectangle => Some(ShapeGeometry::Rectangle { x: b.x, y: b.y, w: b.w, h: b.h }),
        ToolKind::Diamond => Some(ShapeGeometry::Diamond { x: b.x, y: b.y, w: b.w, h: b.h }),
        ToolKind::Circle => {
            let c = b.centroid();
            Some(ShapeGeometry::Circle { cx: c.x, cy: c.y, r: b.max_dim() / 2.0 })
        }
        ToolKind::Triangle => triangle_from_drag(start, end),
        ToolKind::Line | ToolKind::Arrow => {
            let end = snap_line_to_axis(start, end, line_snap).point;
            if tool == ToolKind::Line {
                Some(ShapeGeometry::line(start, end))
            } else {
                Some(ShapeGeometry::arrow(start, end))
            }
        }
        _ => None,
    }
}

/// Apex at `start`, base perpendicular to the drag and centred at `end`.
fn triangle_from_drag(start: Point, end: Point) -> Option<ShapeGeometry> {
    let axis = end - start;
    let length = axis.hypot();
    if length == 0.0 {
        return None;
    }
    let perp = Vec2::new(-axis.y, axis.x) / length;
    let half = length * TRIANGLE_BASE_RATIO;
    Some(ShapeGeometry::Triangle { p1: start, p2: end + perp * half, p3: end - perp * half })
}

/// Total length of a polyline.
pub fn arc_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Collapse a nearly straight pen trace into a line from its first to last point.
pub fn collapse_to_line(points: &[Point]) -> Option<ShapeGeometry> {
    let (&start, &end) = (points.first()?, points.last()?);
    let arc = arc_length(points);
    if arc > 0.0 && start.distance(end) / arc > LINE_STRAIGHTNESS {
        Some(ShapeGeometry::line(start, end))
    } else {
        None
    }
}

/// Classify a closed freehand trace as a circle, triangle or rectangle.
pub fn from_freehand(points: &[Point]) -> Option<ShapeGeometry> {
    if points.len() < MIN_FREEHAND_POINTS {
        return None;
    }
    let (&start, &end) = (points.first()?, points.last()?);
    let b = points_bounds(points);
    let center = b.centroid();
    let max_dim = b.max_dim();

    let closed = start.distance(end) < max_dim * CLOSED_RATIO;
    if !closed {
        return None;
    }

    let n = points.len() as f64;
    let dists: Vec<f64> = points.iter().map(|p| p.distance(center)).collect();
    let mean = dists.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return None;
    }
    let variance = dists.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;

    let aspect = b.w / b.h;
    let roundish = aspect > CIRCLE_ASPECT_RANGE.0 && aspect < CIRCLE_ASPECT_RANGE.1;
    if cv < CIRCLE_MAX_CV && roundish {
        log::debug!("Recognized circle (cv {cv:.3})");
        return Some(ShapeGeometry::Circle { cx: center.x, cy: center.y, r: mean });
    }

    let corners = detect_corners(points, max_dim);
    if corners.len() == 3 || (corners.len() == 2 && cv > TRIANGLE_TWO_CORNER_CV) {
        let fallback = [
            Point::new(center.x, b.y),
            Point::new(b.x, b.max_y()),
            Point::new(b.max_x(), b.max_y()),
        ];
        let vertex = |i: usize| corners.get(i).copied().unwrap_or(fallback[i]);
        log::debug!("Recognized triangle ({} corners)", corners.len());
        return Some(ShapeGeometry::Triangle { p1: vertex(0), p2: vertex(1), p3: vertex(2) });
    }

    if corners.len() >= 4 || cv > RECTANGLE_MIN_CV {
        log::debug!("Recognized rectangle ({} corners, cv {cv:.3})", corners.len());
        return Some(ShapeGeometry::Rectangle { x: b.x, y: b.y, w: b.w, h: b.h });
    }

    None
}

/// Find sharp turns along a trace.
///
/// The heading into and out of each interior sample is measured over
/// [`CORNER_WINDOW`] points; after a corner is accepted the scan skips ahead so
/// one physical corner is not reported twice.
pub fn detect_corners(points: &[Point], max_dim: f64) -> Vec<Point> {
    let mut corners: Vec<Point> = Vec::new();
    let len = points.len();
    if len <= CORNER_WINDOW * 2 {
        return corners;
    }
    let min_spacing = 8.0_f64.max(len as f64 / 8.0);
    let skip = (min_spacing / 2.0).floor() as usize;

    let mut i = CORNER_WINDOW;
    while i < len - CORNER_WINDOW {
        let prev = points[i - CORNER_WINDOW];
        let curr = points[i];
        let next = points[i + CORNER_WINDOW];

        let heading_in = (curr.y - prev.y).atan2(curr.x - prev.x);
        let heading_out = (next.y - curr.y).atan2(next.x - curr.x);
        let mut turn = (heading_out - heading_in).abs();
        if turn > PI {
            turn = 2.0 * PI - turn;
        }

        if turn > CORNER_TURN_THRESHOLD {
            let far_enough = corners
                .last()
                .is_none_or(|last| last.distance(curr) > max_dim * CORNER_MIN_SEPARATION);
            if far_enough {
                corners.push(curr);
                i += skip;
            }
        }
        i += 1;
    }
    corners
}

/// Turn a completed drawing into stroke geometry for the given tool.
///
/// Brush traces are kept as-is, shape tools build their shape, and the pen
/// collapses to a line when straight, otherwise it is classified (when
/// recognition is on) or kept as a path.
pub fn classify_drawing(points: &[Point], tool: ToolKind, settings: &Settings) -> Option<Geometry> {
    if points.is_empty() {
        return None;
    }
    match tool {
        ToolKind::Brush => Some(Geometry::Brush(points.to_vec())),
        ToolKind::Pen => {
            if let Some(line) = collapse_to_line(points) {
                return Some(Geometry::Shape(line));
            }
            if settings.shape_recognition {
                if let Some(shape) = from_freehand(points) {
                    return Some(Geometry::Shape(shape));
                }
            }
            Some(Geometry::Path(points.to_vec()))
        }
        tool if tool.is_shape_tool() => from_forced_tool(points, tool, settings.line_snap).map(Geometry::Shape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk a closed polygon at a fixed step, stopping before returning to the start.
    fn trace(vertices: &[Point], step: f64) -> Vec<Point> {
        let n = vertices.len();
        let segments: Vec<(Point, Point)> = (0..n).map(|i| (vertices[i], vertices[(i + 1) % n])).collect();
        let perimeter: f64 = segments.iter().map(|(a, b)| a.distance(*b)).sum();
        let count = (perimeter / step).floor() as usize;

        let mut points = Vec::with_capacity(count);
        for k in 0..count {
            let mut s = k as f64 * step;
            for (a, b) in &segments {
                let len = a.distance(*b);
                if s <= len {
                    points.push(a.lerp(*b, s / len));
                    break;
                }
                s -= len;
            }
        }
        points
    }

    fn settings(shape_recognition: bool, line_snap: bool) -> Settings {
        Settings { shape_recognition, line_snap, ..Settings::default() }
    }

    #[test]
    fn test_forced_rectangle_both_directions() {
        let forward = [Point::new(10.0, 20.0), Point::new(60.0, 40.0), Point::new(110.0, 70.0)];
        let backward = [Point::new(110.0, 70.0), Point::new(60.0, 40.0), Point::new(10.0, 20.0)];
        let expected = ShapeGeometry::Rectangle { x: 10.0, y: 20.0, w: 100.0, h: 50.0 };
        assert_eq!(from_forced_tool(&forward, ToolKind::Rectangle, false), Some(expected));
        assert_eq!(from_forced_tool(&backward, ToolKind::Rectangle, false), Some(expected));
    }

    #[test]
    fn test_forced_circle_uses_larger_side() {
        let points = [Point::new(0.0, 0.0), Point::new(40.0, 20.0)];
        assert_eq!(
            from_forced_tool(&points, ToolKind::Circle, false),
            Some(ShapeGeometry::Circle { cx: 20.0, cy: 10.0, r: 20.0 })
        );
    }

    #[test]
    fn test_forced_diamond() {
        let points = [Point::new(5.0, 5.0), Point::new(0.0, 15.0)];
        assert_eq!(
            from_forced_tool(&points, ToolKind::Diamond, false),
            Some(ShapeGeometry::Diamond { x: 0.0, y: 5.0, w: 5.0, h: 10.0 })
        );
    }

    #[test]
    fn test_forced_triangle_points_along_drag() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 50.0), Point::new(0.0, 100.0)];
        let Some(ShapeGeometry::Triangle { p1, p2, p3 }) = from_forced_tool(&points, ToolKind::Triangle, false)
        else {
            panic!("expected triangle");
        };
        assert_eq!(p1, Point::ZERO);
        assert!((p2.x + 50.0).abs() < 1e-9 && (p2.y - 100.0).abs() < 1e-9);
        assert!((p3.x - 50.0).abs() < 1e-9 && (p3.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_forced_triangle_zero_length_rejected() {
        let points = [Point::new(5.0, 5.0), Point::new(9.0, 9.0), Point::new(5.0, 5.0)];
        assert!(from_forced_tool(&points, ToolKind::Triangle, false).is_none());
    }

    #[test]
    fn test_forced_line_snaps_when_enabled() {
        let points = [Point::ZERO, Point::new(100.0, 10.0)];
        let Some(ShapeGeometry::Line { x2, y2, .. }) = from_forced_tool(&points, ToolKind::Line, true) else {
            panic!("expected line");
        };
        assert!((x2 - 100.499).abs() < 1e-3);
        assert!(y2.abs() < f64::EPSILON);

        let unsnapped = from_forced_tool(&points, ToolKind::Arrow, false);
        assert_eq!(unsnapped, Some(ShapeGeometry::Arrow { x1: 0.0, y1: 0.0, x2: 100.0, y2: 10.0 }));
    }

    #[test]
    fn test_forced_empty_input() {
        assert!(from_forced_tool(&[], ToolKind::Rectangle, false).is_none());
    }

    #[test]
    fn test_collapse_to_line() {
        let straight = [Point::new(0.0, 0.0), Point::new(50.0, 2.0), Point::new(100.0, 0.0)];
        assert_eq!(
            collapse_to_line(&straight),
            Some(ShapeGeometry::Line { x1: 0.0, y1: 0.0, x2: 100.0, y2: 0.0 })
        );
        let bent = [Point::new(0.0, 0.0), Point::new(50.0, 50.0), Point::new(100.0, 0.0)];
        assert!(collapse_to_line(&bent).is_none());
        assert!(collapse_to_line(&[Point::ZERO, Point::ZERO]).is_none());
    }

    #[test]
    fn test_freehand_circle_with_jitter() {
        let points: Vec<Point> = (0..20)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / 20.0;
                let r = 50.0 * (1.0 + 0.05 * (7.0 * i as f64).sin());
                Point::new(r * theta.cos(), r * theta.sin())
            })
            .collect();
        let Some(ShapeGeometry::Circle { r, .. }) = from_freehand(&points) else {
            panic!("expected circle");
        };
        assert!((r - 50.0).abs() < 5.0);
    }

    #[test]
    fn test_freehand_rectangle() {
        let vertices = [
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 80.0),
            Point::new(0.0, 80.0),
            Point::new(0.0, 0.0),
        ];
        let points = trace(&vertices, 10.0);
        assert_eq!(detect_corners(&points, 200.0).len(), 4);
        assert_eq!(
            from_freehand(&points),
            Some(ShapeGeometry::Rectangle { x: 0.0, y: 0.0, w: 200.0, h: 80.0 })
        );
    }

    #[test]
    fn test_freehand_triangle() {
        let vertices = [
            Point::new(150.0, 100.0),
            Point::new(300.0, 100.0),
            Point::new(150.0, 0.0),
            Point::new(0.0, 100.0),
        ];
        let points = trace(&vertices, 10.0);
        assert!(matches!(from_freehand(&points), Some(ShapeGeometry::Triangle { .. })));
    }

    #[test]
    fn test_freehand_rejects_short_and_open() {
        let short: Vec<Point> = (0..11).map(|i| Point::new(i as f64, 0.0)).collect();
        assert!(from_freehand(&short).is_none());

        let open: Vec<Point> = (0..30).map(|i| Point::new(i as f64 * 5.0, (i as f64 * 0.3).sin() * 20.0)).collect();
        assert!(from_freehand(&open).is_none());
    }

    #[test]
    fn test_classify_brush_keeps_points() {
        let points = vec![Point::ZERO, Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        assert_eq!(
            classify_drawing(&points, ToolKind::Brush, &settings(true, true)),
            Some(Geometry::Brush(points.clone()))
        );
    }

    #[test]
    fn test_classify_pen_straight_becomes_line_without_recognition() {
        let points = vec![Point::ZERO, Point::new(50.0, 1.0), Point::new(100.0, 0.0)];
        let geometry = classify_drawing(&points, ToolKind::Pen, &settings(false, false));
        assert!(matches!(geometry, Some(Geometry::Shape(ShapeGeometry::Line { .. }))));
    }

    #[test]
    fn test_classify_pen_respects_recognition_toggle() {
        let vertices = [
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 80.0),
            Point::new(0.0, 80.0),
            Point::new(0.0, 0.0),
        ];
        let points = trace(&vertices, 10.0);
        assert!(matches!(
            classify_drawing(&points, ToolKind::Pen, &settings(false, false)),
            Some(Geometry::Path(_))
        ));
        assert!(matches!(
            classify_drawing(&points, ToolKind::Pen, &settings(true, false)),
            Some(Geometry::Shape(ShapeGeometry::Rectangle { .. }))
        ));
    }

    #[test]
    fn test_classify_non_drawing_tool() {
        let points = vec![Point::ZERO, Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        assert!(classify_drawing(&points, ToolKind::Eraser, &settings(false, false)).is_none());
    }
}
