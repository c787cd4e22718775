//! Drawly Core Library
//!
//! Platform-agnostic stroke geometry and transform engine for the Drawly canvas:
//! the stroke model, camera mapping, bounds, hit testing, the move/rotate/resize
//! gesture engine, freehand shape recognition and undo/redo history.

pub mod bounds;
pub mod camera;
pub mod document;
pub mod history;
pub mod hit;
pub mod input;
pub mod recognize;
pub mod render;
pub mod selection;
pub mod settings;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod transform;

pub use bounds::{ApproxTextMeasure, Bounds, TextMeasure, stroke_bounds};
pub use camera::Camera;
pub use document::{Document, PointerResponse, TextEdit, TextEntry};
pub use history::History;
pub use hit::{Corner, Edge, Handle, HandleKind, hit_handle, hit_stroke};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use render::{CursorHint, RenderItem, Scene};
pub use selection::Selection;
pub use settings::{Settings, SettingsError};
pub use shapes::{Geometry, Rgb, ShapeGeometry, Stroke, StrokeId, StrokeKind, TextBlock, TextStyle};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager};
pub use transform::{TransformAction, TransformEngine};
