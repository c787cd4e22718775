//! Axis-aligned bounds and centroids for strokes.
//!
//! Bounds are computed on the unrotated, unscaled geometry. Rotation and scale
//! are applied around the centroid by the hit tester and the renderer.

use kurbo::{Point, Rect};

use crate::shapes::{FontSpec, Geometry, ShapeGeometry, Stroke, TextBlock};

/// Text width measurement, provided by whoever can lay out glyphs.
pub trait TextMeasure {
    /// Advance width of a single line of text.
    fn measure_width(&self, line: &str, font: &FontSpec) -> f64;
}

/// Fixed-advance estimate used when no renderer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl ApproxTextMeasure {
    const REGULAR_ADVANCE: f64 = 0.55;
    const BOLD_ADVANCE: f64 = 0.6;
}

impl TextMeasure for ApproxTextMeasure {
    fn measure_width(&self, line: &str, font: &FontSpec) -> f64 {
        let advance = if font.bold { Self::BOLD_ADVANCE } else { Self::REGULAR_ADVANCE };
        line.chars().count() as f64 * font.size * advance
    }
}

/// Box with its top-left corner at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds { x: 0.0, y: 0.0, w: 0.0, h: 0.0 };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn max_dim(&self) -> f64 {
        self.w.max(self.h)
    }

    /// Strict overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.max_x() && self.max_x() > other.x && self.y < other.max_y() && self.max_y() > other.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_rect(self.to_rect().union(other.to_rect()))
    }
}

/// Bounds of any stroke. Never fails; degenerate geometry yields a zero-size box.
pub fn stroke_bounds(stroke: &Stroke, measure: &dyn TextMeasure) -> Bounds {
    match &stroke.geometry {
        Geometry::Path(points) | Geometry::Brush(points) => points_bounds(points),
        Geometry::Shape(shape) => shape_bounds(shape),
        Geometry::Text(text) => text_bounds(text, measure),
    }
}

/// Envelope of a polyline. Non-finite points are skipped.
pub fn points_bounds(points: &[Point]) -> Bounds {
    let mut finite = points.iter().filter(|p| p.is_finite());
    let Some(first) = finite.next() else {
        return Bounds::ZERO;
    };
    let rect = finite.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p));
    Bounds::from_rect(rect)
}

pub fn shape_bounds(shape: &ShapeGeometry) -> Bounds {
    match *shape {
        ShapeGeometry::Rectangle { x, y, w, h } | ShapeGeometry::Diamond { x, y, w, h } => Bounds::new(x, y, w, h),
        ShapeGeometry::Circle { cx, cy, r } => Bounds::new(cx - r, cy - r, r * 2.0, r * 2.0),
        ShapeGeometry::Line { x1, y1, x2, y2 } | ShapeGeometry::Arrow { x1, y1, x2, y2 } => {
            Bounds::from_rect(Rect::from_points((x1, y1), (x2, y2)))
        }
        ShapeGeometry::Triangle { p1, p2, p3 } => points_bounds(&[p1, p2, p3]),
    }
}

/// Text grows upward from the baseline anchor.
pub fn text_bounds(text: &TextBlock, measure: &dyn TextMeasure) -> Bounds {
    let font = text.style.font();
    let w = text.lines().map(|line| measure.measure_width(line, &font)).fold(0.0, f64::max);
    let h = text.line_count() as f64 * text.style.line_height();
    Bounds::new(text.x, text.y - h, w, h)
}

/// Combined bounds of several strokes, or `None` for an empty set.
pub fn union_bounds<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    measure: &dyn TextMeasure,
) -> Option<Bounds> {
    strokes
        .into_iter()
        .map(|stroke| stroke_bounds(stroke, measure))
        .reduce(|acc, b| acc.union(&b))
}
