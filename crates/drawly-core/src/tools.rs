//! Tool system for the canvas.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Drawings with fewer points than this are discarded.
pub const MIN_DRAWING_POINTS: usize = 3;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Brush,
    Rectangle,
    Diamond,
    Circle,
    Triangle,
    Line,
    Arrow,
    Eraser,
    Text,
    /// Select, move, rotate and resize.
    Move,
    /// Pan the canvas.
    Hand,
}

impl ToolKind {
    /// Tools that build one of the fixed shapes from a drag.
    pub fn is_shape_tool(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Diamond
                | ToolKind::Circle
                | ToolKind::Triangle
                | ToolKind::Line
                | ToolKind::Arrow
        )
    }

    /// Tools that collect a pointer trace.
    pub fn is_drawing_tool(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Brush) || self.is_shape_tool()
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for interaction.
    #[default]
    Idle,
    /// Collecting a trace in world coordinates.
    Drawing { points: Vec<Point> },
    /// Dragging a selection rectangle in world coordinates.
    Marquee { start: Point, current: Point },
    /// Panning; `last` is the previous pointer position in screen coordinates.
    Panning { last: Point },
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    pub state: ToolState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any interaction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    pub fn begin_drawing(&mut self, point: Point) {
        self.state = ToolState::Drawing { points: vec![point] };
    }

    pub fn begin_marquee(&mut self, point: Point) {
        self.state = ToolState::Marquee { start: point, current: point };
    }

    pub fn begin_pan(&mut self, screen: Point) {
        self.state = ToolState::Panning { last: screen };
    }

    /// Feed a pointer move in world coordinates to a drawing or marquee.
    pub fn update(&mut self, point: Point) {
        match &mut self.state {
            ToolState::Drawing { points } => points.push(point),
            ToolState::Marquee { current, .. } => *current = point,
            ToolState::Idle | ToolState::Panning { .. } => {}
        }
    }

    /// Finish a drawing and return its trace, or `None` if it was too short.
    pub fn finish_drawing(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing { points } if points.len() >= MIN_DRAWING_POINTS => Some(points),
            ToolState::Drawing { points } => {
                log::debug!("Discarding drawing with {} points", points.len());
                None
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Finish a marquee and return its rectangle.
    pub fn finish_marquee(&mut self) -> Option<Rect> {
        match std::mem::take(&mut self.state) {
            ToolState::Marquee { start, current } => Some(Rect::from_points(start, current)),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Points of the drawing in progress, for the preview.
    pub fn drawing_points(&self) -> Option<&[Point]> {
        match &self.state {
            ToolState::Drawing { points } => Some(points),
            _ => None,
        }
    }

    /// Marquee rectangle in progress.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            ToolState::Marquee { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }
}
