//! Stroke definitions for the canvas.

mod geometry;
mod text;

pub use geometry::ShapeGeometry;
pub use text::{FontSpec, TextBlock, TextStyle};

use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Default width for pen strokes and shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
/// Default width for brush strokes.
pub const DEFAULT_BRUSH_WIDTH: f64 = 6.0;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(pub String);

/// RGB color, serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let err = || ParseColorError(s.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Self::new(
                    digit(0).map_err(|_| err())?,
                    digit(1).map_err(|_| err())?,
                    digit(2).map_err(|_| err())?,
                ))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Self::new(
                    byte(0).map_err(|_| err())?,
                    byte(2).map_err(|_| err())?,
                    byte(4).map_err(|_| err())?,
                ))
            }
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

/// The four stroke kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    Path,
    Brush,
    Shape,
    Text,
}

/// Geometry payload of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Geometry {
    /// Pen stroke: world-space polyline.
    Path(Vec<Point>),
    /// Brush stroke: polyline painted with a soft glow.
    Brush(Vec<Point>),
    /// One of the fixed shape primitives.
    Shape(ShapeGeometry),
    /// Text block anchored at its baseline.
    Text(TextBlock),
}

impl Geometry {
    pub fn kind(&self) -> StrokeKind {
        match self {
            Geometry::Path(_) => StrokeKind::Path,
            Geometry::Brush(_) => StrokeKind::Brush,
            Geometry::Shape(_) => StrokeKind::Shape,
            Geometry::Text(_) => StrokeKind::Text,
        }
    }

    /// Polyline points for path and brush strokes.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Geometry::Path(points) | Geometry::Brush(points) => Some(points),
            _ => None,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Geometry::Path(points) | Geometry::Brush(points) => {
                for point in points.iter_mut() {
                    *point += delta;
                }
            }
            Geometry::Shape(shape) => shape.translate(delta),
            Geometry::Text(text) => {
                text.x += delta.x;
                text.y += delta.y;
            }
        }
    }
}

fn one() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

/// One persisted drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    #[serde(default = "Uuid::new_v4")]
    pub id: StrokeId,
    pub geometry: Geometry,
    #[serde(default)]
    pub color: Rgb,
    /// Line width; ignored for text.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Rotation in radians about the centroid.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Legacy uniform scale, combined with `scale_x`/`scale_y`.
    #[serde(default = "one")]
    pub scale: f64,
}

impl Stroke {
    /// Create a stroke with the default color and the width suited to its kind.
    pub fn new(geometry: Geometry) -> Self {
        let stroke_width = match geometry {
            Geometry::Brush(_) => DEFAULT_BRUSH_WIDTH,
            _ => DEFAULT_STROKE_WIDTH,
        };
        Self {
            id: Uuid::new_v4(),
            geometry,
            color: Rgb::default(),
            stroke_width,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            scale: 1.0,
        }
    }

    pub fn path(points: Vec<Point>) -> Self {
        Self::new(Geometry::Path(points))
    }

    pub fn brush(points: Vec<Point>) -> Self {
        Self::new(Geometry::Brush(points))
    }

    pub fn shape(shape: ShapeGeometry) -> Self {
        Self::new(Geometry::Shape(shape))
    }

    pub fn text(text: TextBlock) -> Self {
        Self::new(Geometry::Text(text))
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn kind(&self) -> StrokeKind {
        self.geometry.kind()
    }

    /// Effective per-axis scale used for rendering and hit testing.
    pub fn render_scale(&self) -> Vec2 {
        Vec2::new(self.scale_x * self.scale, self.scale_y * self.scale)
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match &self.geometry {
            Geometry::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeGeometry> {
        match &self.geometry {
            Geometry::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Move the stroke by `delta` in world space.
    pub fn translate(&mut self, delta: Vec2) {
        self.geometry.translate(delta);
    }

    /// Give the stroke a fresh identity, e.g. when a loaded id collides.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}
