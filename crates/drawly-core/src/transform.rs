//! Move, rotate and resize gestures.
//!
//! A gesture latches the target's geometry when it starts. Moves are applied
//! incrementally; single-stroke resizes always recompute from the latched
//! values, so a dropped or repeated pointer event cannot accumulate error.

use kurbo::Point;
use std::f64::consts::{PI, TAU};

use crate::bounds::{Bounds, TextMeasure, stroke_bounds};
use crate::hit::{Edge, HandleKind};
use crate::shapes::{Geometry, ShapeGeometry, Stroke};

/// Fraction of the pointer's angular travel applied per event while rotating.
pub const ROTATE_DAMPING: f64 = 0.1;
/// Fraction of the distance ratio applied per event when resizing a group.
pub const MULTI_RESIZE_DAMPING: f64 = 0.05;
pub const MIN_TEXT_SIZE: f64 = 12.0;
pub const MAX_TEXT_SIZE: f64 = 300.0;
pub const MIN_CIRCLE_RADIUS: f64 = 5.0;
/// Smallest width or height an edge drag can leave on a rectangle or diamond.
pub const MIN_BOX_SIDE: f64 = 10.0;

/// The kind of gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformAction {
    Move,
    Rotate,
    Resize,
}

/// Target state captured when a handle gesture begins.
#[derive(Debug, Clone)]
pub struct StartValues {
    pub stroke: Stroke,
    pub bounds: Bounds,
    pub handle: HandleKind,
    /// Pointer distance from the centroid at gesture start.
    pub initial_dist: f64,
    /// Pointer angle around the centroid at gesture start.
    pub initial_angle: f64,
}

#[derive(Debug, Clone)]
enum DragState {
    Idle,
    Moving { target: usize, last: Point },
    Handle { action: TransformAction, target: usize, start: Box<StartValues> },
}

/// Drives a single move/rotate/resize gesture at a time.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    state: DragState,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self { state: DragState::Idle }
    }
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn action(&self) -> Option<TransformAction> {
        match &self.state {
            DragState::Idle => None,
            DragState::Moving { .. } => Some(TransformAction::Move),
            DragState::Handle { action, .. } => Some(*action),
        }
    }

    pub fn target(&self) -> Option<usize> {
        match &self.state {
            DragState::Idle => None,
            DragState::Moving { target, .. } | DragState::Handle { target, .. } => Some(*target),
        }
    }

    /// Start dragging the selection with `target` under the pointer.
    pub fn begin_move(&mut self, target: usize, world: Point) {
        log::debug!("Begin move of stroke {target}");
        self.state = DragState::Moving { target, last: world };
    }

    /// Start a rotate or resize gesture from a handle of `stroke`.
    pub fn begin_handle(
        &mut self,
        target: usize,
        stroke: &Stroke,
        handle: HandleKind,
        world: Point,
        measure: &dyn TextMeasure,
    ) -> TransformAction {
        let bounds = stroke_bounds(stroke, measure);
        let offset = world - bounds.centroid();
        let action = match handle {
            HandleKind::Rotate => TransformAction::Rotate,
            HandleKind::Corner(_) | HandleKind::Edge(_) => TransformAction::Resize,
        };
        log::debug!("Begin {action:?} of stroke {target} via {}", handle.id());
        self.state = DragState::Handle {
            action,
            target,
            start: Box::new(StartValues {
                stroke: stroke.clone(),
                bounds,
                handle,
                initial_dist: offset.hypot(),
                initial_angle: offset.y.atan2(offset.x),
            }),
        };
        action
    }

    /// Apply a pointer move to the strokes at `selected`.
    ///
    /// Indices that no longer refer to a stroke are skipped.
    pub fn update(&mut self, world: Point, strokes: &mut [Stroke], selected: &[usize]) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Moving { last, .. } => {
                let delta = world - *last;
                for &i in selected {
                    if let Some(stroke) = strokes.get_mut(i) {
                        stroke.translate(delta);
                    }
                }
                *last = world;
            }
            DragState::Handle { action: TransformAction::Rotate, start, .. } => {
                let offset = world - start.bounds.centroid();
                let delta = normalize_angle(offset.y.atan2(offset.x) - start.initial_angle);
                for &i in selected {
                    if let Some(stroke) = strokes.get_mut(i) {
                        stroke.rotation += delta * ROTATE_DAMPING;
                    }
                }
            }
            DragState::Handle { action: TransformAction::Resize, target, start } => {
                let dist = world.distance(start.bounds.centroid());
                let divisor = if start.initial_dist == 0.0 { 1.0 } else { start.initial_dist };
                let ratio = dist / divisor;

                if selected.len() > 1 {
                    let factor = 1.0 + (ratio - 1.0) * MULTI_RESIZE_DAMPING;
                    for &i in selected {
                        if let Some(stroke) = strokes.get_mut(i) {
                            stroke.scale_x *= factor;
                            stroke.scale_y *= factor;
                        }
                    }
                } else if let Some(stroke) = strokes.get_mut(*target) {
                    resize_single(stroke, start, ratio);
                }
            }
            DragState::Handle { action: TransformAction::Move, .. } => {}
        }
    }

    /// Finish the gesture; the current state of the strokes is kept.
    pub fn end(&mut self) {
        if let Some(action) = self.action() {
            log::debug!("End {action:?}");
        }
        self.state = DragState::Idle;
    }

    /// Drop any gesture without touching strokes (after undo, load or removal).
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Wrap an angle into (-PI, PI].
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

fn resize_single(stroke: &mut Stroke, start: &StartValues, ratio: f64) {
    let edge = match start.handle {
        HandleKind::Edge(edge) => Some(edge),
        _ => None,
    };
    let initial = &start.stroke;

    match (&mut stroke.geometry, &initial.geometry) {
        (Geometry::Text(text), Geometry::Text(text0)) => {
            text.style.size = (text0.style.size * ratio).clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE);
        }
        (Geometry::Shape(ShapeGeometry::Circle { r, .. }), Geometry::Shape(ShapeGeometry::Circle { r: r0, .. })) => {
            *r = (r0 * ratio).max(MIN_CIRCLE_RADIUS);
        }
        (
            Geometry::Shape(ShapeGeometry::Rectangle { w, h, .. }),
            Geometry::Shape(ShapeGeometry::Rectangle { w: w0, h: h0, .. }),
        )
        | (
            Geometry::Shape(ShapeGeometry::Diamond { w, h, .. }),
            Geometry::Shape(ShapeGeometry::Diamond { w: w0, h: h0, .. }),
        ) => match edge {
            Some(edge) if edge.is_horizontal() => *w = (w0 * ratio).max(MIN_BOX_SIDE),
            Some(_) => *h = (h0 * ratio).max(MIN_BOX_SIDE),
            None => {
                *w = w0 * ratio;
                *h = h0 * ratio;
            }
        },
        (Geometry::Shape(ShapeGeometry::Triangle { .. }), _) => match edge {
            Some(edge) if edge.is_horizontal() => stroke.scale_x = initial.scale_x * ratio,
            Some(_) => stroke.scale_y = initial.scale_y * ratio,
            None => {
                stroke.scale_x = initial.scale_x * ratio;
                stroke.scale_y = initial.scale_y * ratio;
            }
        },
        (Geometry::Shape(_), _) => stroke.scale = initial.scale * ratio,
        (Geometry::Path(points), Geometry::Path(points0)) | (Geometry::Brush(points), Geometry::Brush(points0)) => {
            match edge {
                Some(edge) => {
                    *points = stretch_from_anchor(points0, &start.bounds, edge, ratio);
                    stroke.scale_x = 1.0;
                    stroke.scale_y = 1.0;
                }
                None => {
                    stroke.scale_x = initial.scale_x * ratio;
                    stroke.scale_y = initial.scale_y * ratio;
                }
            }
        }
        _ => {}
    }
}

/// Stretch points along one axis away from the edge opposite `edge`.
fn stretch_from_anchor(points: &[Point], bounds: &Bounds, edge: Edge, ratio: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| match edge {
            Edge::Left => Point::new(bounds.max_x() + (p.x - bounds.max_x()) * ratio, p.y),
            Edge::Right => Point::new(bounds.x + (p.x - bounds.x) * ratio, p.y),
            Edge::Top => Point::new(p.x, bounds.max_y() + (p.y - bounds.max_y()) * ratio),
            Edge::Bottom => Point::new(p.x, bounds.y + (p.y - bounds.y) * ratio),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::ApproxTextMeasure;
    use crate::hit::Corner;
    use crate::shapes::{TextBlock, TextStyle};
    use kurbo::Vec2;

    fn rect() -> Stroke {
        Stroke::shape(ShapeGeometry::Rectangle { x: 0.0, y: 0.0, w: 100.0, h: 100.0 })
    }

    fn start_resize(engine: &mut TransformEngine, stroke: &Stroke, handle: HandleKind, world: Point) {
        let action = engine.begin_handle(0, stroke, handle, world, &ApproxTextMeasure);
        assert_eq!(action, TransformAction::Resize);
    }

    #[test]
    fn test_move_is_incremental() {
        let mut strokes = vec![rect(), Stroke::path(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)])];
        let mut engine = TransformEngine::new();
        engine.begin_move(0, Point::new(50.0, 50.0));
        engine.update(Point::new(60.0, 55.0), &mut strokes, &[0, 1]);
        engine.update(Point::new(70.0, 60.0), &mut strokes, &[0, 1]);
        engine.end();

        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Rectangle { x: 20.0, y: 10.0, w: 100.0, h: 100.0 }));
        assert_eq!(strokes[1].geometry.points().unwrap()[1], Point::new(30.0, 20.0));
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_move_skips_stale_indices() {
        let mut strokes = vec![rect()];
        let mut engine = TransformEngine::new();
        engine.begin_move(0, Point::ZERO);
        engine.update(Point::new(5.0, 0.0), &mut strokes, &[0, 7]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Rectangle { x: 5.0, y: 0.0, w: 100.0, h: 100.0 }));
    }

    #[test]
    fn test_rotate_is_damped() {
        let mut strokes = vec![rect()];
        let mut engine = TransformEngine::new();
        let action = engine.begin_handle(0, &strokes[0], HandleKind::Rotate, Point::new(100.0, 50.0), &ApproxTextMeasure);
        assert_eq!(action, TransformAction::Rotate);
        engine.update(Point::new(50.0, 100.0), &mut strokes, &[0]);
        assert!((strokes[0].rotation - PI / 2.0 * ROTATE_DAMPING).abs() < 1e-9);
        engine.update(Point::new(50.0, 100.0), &mut strokes, &[0]);
        assert!((strokes[0].rotation - PI * ROTATE_DAMPING).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_applies_to_each_selected() {
        let mut strokes = vec![rect(), Stroke::path(vec![Point::new(200.0, 200.0), Point::new(260.0, 230.0)])];
        strokes[1].rotation = 0.5;
        let mut engine = TransformEngine::new();
        engine.begin_handle(0, &strokes[0], HandleKind::Rotate, Point::new(100.0, 50.0), &ApproxTextMeasure);
        engine.update(Point::new(50.0, 100.0), &mut strokes, &[0, 1]);

        let step = PI / 2.0 * ROTATE_DAMPING;
        assert!((strokes[0].rotation - step).abs() < 1e-9);
        assert!((strokes[1].rotation - (0.5 + step)).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_delta_wraps() {
        let mut strokes = vec![rect()];
        let mut engine = TransformEngine::new();
        engine.begin_handle(0, &strokes[0], HandleKind::Rotate, Point::new(0.0, 49.0), &ApproxTextMeasure);
        engine.update(Point::new(0.0, 51.0), &mut strokes, &[0]);
        assert!(strokes[0].rotation.abs() < 0.01);
    }

    #[test]
    fn test_corner_resize_rectangle() {
        let mut strokes = vec![rect()];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::BottomRight), Point::new(100.0, 100.0));
        engine.update(Point::new(150.0, 150.0), &mut strokes, &[0]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Rectangle { x: 0.0, y: 0.0, w: 200.0, h: 200.0 }));
        // Replayed against the start values, not compounded.
        engine.update(Point::new(150.0, 150.0), &mut strokes, &[0]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Rectangle { x: 0.0, y: 0.0, w: 200.0, h: 200.0 }));
    }

    #[test]
    fn test_edge_resize_rectangle_floor() {
        let mut strokes = vec![rect()];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Edge(Edge::Right), Point::new(100.0, 50.0));
        engine.update(Point::new(52.0, 50.0), &mut strokes, &[0]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Rectangle { x: 0.0, y: 0.0, w: 10.0, h: 100.0 }));
    }

    #[test]
    fn test_circle_radius_floor() {
        let mut strokes = vec![Stroke::shape(ShapeGeometry::Circle { cx: 0.0, cy: 0.0, r: 20.0 })];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::TopLeft), Point::new(-20.0, 0.0));
        engine.update(Point::new(-1.0, 0.0), &mut strokes, &[0]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Circle { cx: 0.0, cy: 0.0, r: 5.0 }));
    }

    #[test]
    fn test_text_size_clamped() {
        let text = TextBlock::new(Point::new(0.0, 100.0), "hello".to_string())
            .with_style(TextStyle { size: 20.0, ..TextStyle::default() });
        let mut strokes = vec![Stroke::text(text)];
        let mut engine = TransformEngine::new();
        let bounds = stroke_bounds(&strokes[0], &ApproxTextMeasure);
        let grip = bounds.centroid() + Vec2::new(10.0, 0.0);
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::TopRight), grip);
        engine.update(bounds.centroid() + Vec2::new(1000.0, 0.0), &mut strokes, &[0]);
        assert!((strokes[0].as_text().unwrap().style.size - MAX_TEXT_SIZE).abs() < f64::EPSILON);
        engine.update(bounds.centroid() + Vec2::new(1.0, 0.0), &mut strokes, &[0]);
        assert!((strokes[0].as_text().unwrap().style.size - MIN_TEXT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_triangle_edge_scales_one_axis() {
        let mut strokes = vec![Stroke::shape(ShapeGeometry::Triangle {
            p1: Point::new(50.0, 0.0),
            p2: Point::new(0.0, 100.0),
            p3: Point::new(100.0, 100.0),
        })];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Edge(Edge::Bottom), Point::new(50.0, 100.0));
        engine.update(Point::new(50.0, 150.0), &mut strokes, &[0]);
        assert!((strokes[0].scale_y - 2.0).abs() < 1e-9);
        assert!((strokes[0].scale_x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_uses_legacy_scale() {
        let mut strokes = vec![Stroke::shape(ShapeGeometry::line(Point::ZERO, Point::new(100.0, 0.0)))];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::TopRight), Point::new(100.0, 0.0));
        engine.update(Point::new(125.0, 0.0), &mut strokes, &[0]);
        assert!((strokes[0].scale - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_path_edge_stretch_from_opposite_edge() {
        let mut stroke = Stroke::path(vec![Point::new(0.0, 0.0), Point::new(50.0, 20.0), Point::new(100.0, 40.0)]);
        stroke.scale_x = 3.0;
        let mut strokes = vec![stroke];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Edge(Edge::Left), Point::new(0.0, 20.0));
        engine.update(Point::new(-50.0, 20.0), &mut strokes, &[0]);
        let points = strokes[0].geometry.points().unwrap();
        assert_eq!(points[0], Point::new(-100.0, 0.0));
        assert_eq!(points[1], Point::new(0.0, 20.0));
        assert_eq!(points[2], Point::new(100.0, 40.0));
        assert!((strokes[0].scale_x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_corner_scales() {
        let mut strokes = vec![Stroke::brush(vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)])];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::BottomRight), Point::new(100.0, 100.0));
        engine.update(Point::new(75.0, 75.0), &mut strokes, &[0]);
        assert!((strokes[0].scale_x - 0.5).abs() < 1e-9);
        assert!((strokes[0].scale_y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_multi_resize_is_damped() {
        let mut strokes = vec![rect(), rect()];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::BottomRight), Point::new(100.0, 100.0));
        engine.update(Point::new(150.0, 150.0), &mut strokes, &[0, 1]);
        for stroke in &strokes {
            assert!((stroke.scale_x - 1.05).abs() < 1e-9);
            assert!((stroke.scale_y - 1.05).abs() < 1e-9);
        }
        engine.update(Point::new(150.0, 150.0), &mut strokes, &[0, 1]);
        assert!((strokes[0].scale_x - 1.05 * 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_zero_initial_distance_uses_unit_divisor() {
        let mut strokes = vec![Stroke::shape(ShapeGeometry::Circle { cx: 0.0, cy: 0.0, r: 20.0 })];
        let mut engine = TransformEngine::new();
        start_resize(&mut engine, &strokes[0], HandleKind::Corner(Corner::TopLeft), Point::ZERO);
        engine.update(Point::new(2.0, 0.0), &mut strokes, &[0]);
        assert_eq!(strokes[0].as_shape(), Some(&ShapeGeometry::Circle { cx: 0.0, cy: 0.0, r: 40.0 }));
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(PI) - PI).abs() < 1e-12);
    }
}
