//! Pointer and keyboard events from the input adapter.
//!
//! The adapter forwards screen coordinates only; the document maps them into
//! world space through its camera.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Scroll { position, .. } => position,
        }
    }

    pub fn down(position: Point) -> Self {
        PointerEvent::Down { position, button: MouseButton::Left }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up { position, button: MouseButton::Left }
    }
}

/// Keys the document reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Character(char),
}

impl Key {
    /// Map a key name as reported by the host (`"Delete"`, `"z"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Delete" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Character(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}
