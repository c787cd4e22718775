//! Axis snapping for line and arrow endpoints.

use kurbo::Point;
use std::f64::consts::{FRAC_PI_2, PI};

/// Lines within this angle of an axis snap onto it (15 degrees).
pub const AXIS_SNAP_THRESHOLD: f64 = PI / 12.0;

/// Result of an axis snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSnapResult {
    /// The (possibly snapped) end point.
    pub point: Point,
    /// Whether the end point was moved onto an axis.
    pub snapped: bool,
    /// Distance from start; preserved by snapping.
    pub distance: f64,
}

impl AngleSnapResult {
    fn unsnapped(point: Point, distance: f64) -> Self {
        Self { point, snapped: false, distance }
    }
}

/// Snap a line end point onto the horizontal or vertical axis through `start`
/// when the line is within [`AXIS_SNAP_THRESHOLD`] of it. Length is preserved.
pub fn snap_line_to_axis(start: Point, end: Point, enabled: bool) -> AngleSnapResult {
    let distance = start.distance(end);
    if !enabled || distance == 0.0 {
        return AngleSnapResult::unsnapped(end, distance);
    }

    let angle = (end.y - start.y).atan2(end.x - start.x);
    let near = |target: f64| (angle - target).abs() < AXIS_SNAP_THRESHOLD;

    if near(0.0) || near(PI) || near(-PI) {
        let x = if end.x > start.x { start.x + distance } else { start.x - distance };
        AngleSnapResult { point: Point::new(x, start.y), snapped: true, distance }
    } else if near(FRAC_PI_2) || near(-FRAC_PI_2) {
        let y = if end.y > start.y { start.y + distance } else { start.y - distance };
        AngleSnapResult { point: Point::new(start.x, y), snapped: true, distance }
    } else {
        AngleSnapResult::unsnapped(end, distance)
    }
}
