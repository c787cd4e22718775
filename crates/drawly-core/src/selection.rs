//! Index-based selection.
//!
//! Indices refer to positions in the document's stroke sequence. Whenever that
//! sequence is spliced or replaced the selection is either adjusted in place or
//! rebuilt from stroke ids, so it never points at a missing stroke.

use crate::shapes::{Stroke, StrokeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
    target: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The stroke whose handles are shown; usually the first selected.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Select exactly one stroke and make it the target.
    pub fn select_only(&mut self, index: usize) {
        self.indices = vec![index];
        self.target = Some(index);
    }

    /// Replace the selection; the first index becomes the target.
    pub fn set(&mut self, indices: Vec<usize>) {
        self.target = indices.first().copied();
        self.indices = indices;
    }

    /// Make `index` the target without changing the selected set.
    pub fn set_target(&mut self, index: usize) {
        self.target = Some(index);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.target = None;
    }

    /// Indices a gesture should act on: the selection, or just the target.
    pub fn active_indices(&self) -> Vec<usize> {
        if self.indices.is_empty() {
            self.target.into_iter().collect()
        } else {
            self.indices.clone()
        }
    }

    /// Adjust for the removal of the stroke at `removed`.
    pub fn remove_index(&mut self, removed: usize) {
        let shift = |i: usize| if i > removed { i - 1 } else { i };
        self.indices.retain(|&i| i != removed);
        for i in &mut self.indices {
            *i = shift(*i);
        }
        self.target = match self.target {
            Some(t) if t != removed => Some(shift(t)),
            _ => self.indices.first().copied(),
        };
    }

    /// Stroke ids of the selection and target, for re-deriving later.
    pub fn ids(&self, strokes: &[Stroke]) -> (Vec<StrokeId>, Option<StrokeId>) {
        let ids = self.indices.iter().filter_map(|&i| strokes.get(i)).map(|s| s.id).collect();
        let target = self.target.and_then(|t| strokes.get(t)).map(|s| s.id);
        (ids, target)
    }

    /// Rebuild indices from ids against a new stroke sequence. Ids that no
    /// longer exist are dropped and each stroke is selected at most once.
    pub fn rederive(&mut self, strokes: &[Stroke], ids: &[StrokeId], target: Option<StrokeId>) {
        let position = |id: &StrokeId| strokes.iter().position(|s| s.id == *id);
        let mut indices: Vec<usize> = Vec::with_capacity(ids.len());
        for index in ids.iter().filter_map(position) {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        self.target = target.as_ref().and_then(position).or_else(|| indices.first().copied());
        self.indices = indices;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn strokes(n: usize) -> Vec<Stroke> {
        (0..n).map(|i| Stroke::path(vec![Point::new(i as f64, 0.0)])).collect()
    }

    #[test]
    fn test_set_picks_first_as_target() {
        let mut selection = Selection::new();
        selection.set(vec![3, 1]);
        assert_eq!(selection.target(), Some(3));
        selection.set(Vec::new());
        assert_eq!(selection.target(), None);
    }

    #[test]
    fn test_remove_index_shifts() {
        let mut selection = Selection::new();
        selection.set(vec![4, 1, 2]);
        selection.remove_index(2);
        assert_eq!(selection.indices(), &[3, 1]);
        assert_eq!(selection.target(), Some(3));
        selection.remove_index(3);
        assert_eq!(selection.indices(), &[1]);
        assert_eq!(selection.target(), Some(1));
        selection.remove_index(1);
        assert!(selection.is_empty());
        assert_eq!(selection.target(), None);
    }

    #[test]
    fn test_active_indices_falls_back_to_target() {
        let mut selection = Selection::new();
        assert!(selection.active_indices().is_empty());
        selection.set_target(2);
        assert_eq!(selection.active_indices(), vec![2]);
        selection.set(vec![0, 1]);
        assert_eq!(selection.active_indices(), vec![0, 1]);
    }

    #[test]
    fn test_rederive_after_reorder() {
        let before = strokes(3);
        let mut selection = Selection::new();
        selection.set(vec![2, 0]);
        let (ids, target) = selection.ids(&before);

        let after = vec![before[2].clone(), before[1].clone()];
        selection.rederive(&after, &ids, target);
        assert_eq!(selection.indices(), &[0]);
        assert_eq!(selection.target(), Some(0));
    }

    #[test]
    fn test_rederive_collapses_repeated_ids() {
        let mut before = strokes(2);
        before[1].id = before[0].id;
        let mut selection = Selection::new();
        selection.set(vec![0, 1]);
        let (ids, target) = selection.ids(&before);

        selection.rederive(&before, &ids, target);
        assert_eq!(selection.indices(), &[0]);
        assert_eq!(selection.target(), Some(0));
    }

    #[test]
    fn test_rederive_missing_target_falls_back_to_first() {
        let before = strokes(3);
        let mut selection = Selection::new();
        selection.set(vec![0, 2]);
        let (ids, target) = selection.ids(&before);

        let after = vec![before[2].clone(), before[1].clone()];
        selection.rederive(&after, &ids, target);
        assert_eq!(selection.indices(), &[0]);
        assert_eq!(selection.target(), Some(0));
    }
}
