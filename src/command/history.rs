use crate::id_generator::ShapeId;
use crate::shape::ShapeType;

/// Deep copy of the shape collection plus the primary selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shapes: Vec<ShapeType>,
    pub primary: Option<ShapeId>,
}

/// Undo/redo stacks of document snapshots
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    /// Snapshots taken before each mutation, newest last
    undo_stack: Vec<Snapshot>,
    /// Snapshots popped by undo, newest last
    redo_stack: Vec<Snapshot>,
    /// Oldest undo entries are dropped beyond this depth
    limit: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl SnapshotHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state before a mutation. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Swap `current` for the most recent undo snapshot.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Swap `current` for the most recent redo snapshot.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Snapshot {
        Snapshot {
            shapes: Vec::new(),
            primary: None,
        }
    }

    #[test]
    fn undo_moves_current_to_redo() {
        let mut history = SnapshotHistory::default();
        history.push(empty());
        assert!(history.can_undo());
        assert!(history.undo(empty()).is_some());
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert!(history.redo(empty()).is_some());
        assert!(history.can_undo());
    }

    #[test]
    fn push_clears_redo() {
        let mut history = SnapshotHistory::default();
        history.push(empty());
        history.undo(empty());
        history.push(empty());
        assert!(!history.can_redo());
    }

    #[test]
    fn limit_drops_oldest() {
        let mut history = SnapshotHistory::new(2);
        for _ in 0..5 {
            history.push(empty());
        }
        assert_eq!(history.undo_len(), 2);
    }
}
