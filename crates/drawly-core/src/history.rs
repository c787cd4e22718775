//! Snapshot-based undo/redo.

use crate::shapes::Stroke;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Two capped stacks of full stroke snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Vec<Stroke>>,
    redo_stack: Vec<Vec<Stroke>>,
}

fn push_capped(stack: &mut Vec<Vec<Stroke>>, snapshot: Vec<Stroke>) {
    stack.push(snapshot);
    if stack.len() > MAX_UNDO_HISTORY {
        stack.remove(0);
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state before a mutation. Clears the redo stack.
    pub fn snapshot(&mut self, strokes: &[Stroke]) {
        push_capped(&mut self.undo_stack, strokes.to_vec());
        self.redo_stack.clear();
        log::debug!("History snapshot ({} undo states)", self.undo_stack.len());
    }

    /// Restore the previous state. Returns false if there is nothing to undo.
    pub fn undo(&mut self, strokes: &mut Vec<Stroke>) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(strokes, previous);
        push_capped(&mut self.redo_stack, current);
        true
    }

    /// Re-apply the last undone state. Returns false if there is nothing to redo.
    pub fn redo(&mut self, strokes: &mut Vec<Stroke>) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(strokes, next);
        push_capped(&mut self.undo_stack, current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
