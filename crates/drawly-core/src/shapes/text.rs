//! Text blocks.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default font size for new text.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Font parameters needed for measuring a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub bold: bool,
}

/// Visual style of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { size: DEFAULT_FONT_SIZE, bold: false, underline: false }
    }
}

impl TextStyle {
    pub fn font(&self) -> FontSpec {
        FontSpec { size: self.size, bold: self.bold }
    }

    pub fn line_height(&self) -> f64 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

/// Multi-line text anchored at the baseline of its first line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(anchor: Point, text: String) -> Self {
        Self { x: anchor.x, y: anchor.y, text, style: TextStyle::default() }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Lines split on `'\n'`; an empty string still has one (empty) line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}
