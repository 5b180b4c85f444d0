//! Snapshot-based undo/redo.
//!
//! Every committed gesture produces exactly one named snapshot of the
//! element/page maps. Undo and redo move a cursor through a linear snapshot
//! list; recording a new snapshot truncates any redo tail past the cursor.

use std::collections::HashMap;

use crate::document::Document;
use crate::element::{CanvasElement, ElementId};
use crate::page::{CanvasPage, PageId};

/// Upper bound on retained snapshots; the oldest entries are dropped first.
const MAX_SNAPSHOTS: usize = 100;

/// One named, full copy of the document's element/page maps.
#[derive(Debug, Clone)]
struct Snapshot {
    label: String,
    elements: HashMap<ElementId, CanvasElement>,
    pages: HashMap<PageId, CanvasPage>,
    page_order: Vec<PageId>,
}

impl Snapshot {
    fn capture(label: impl Into<String>, doc: &Document) -> Self {
        let (elements, pages, page_order) = doc.snapshot_maps();
        Self {
            label: label.into(),
            elements,
            pages,
            page_order,
        }
    }

    fn apply(&self, doc: &mut Document) {
        doc.restore_maps(
            self.elements.clone(),
            self.pages.clone(),
            self.page_order.clone(),
        );
    }
}

/// Linear undo/redo history over document snapshots.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    /// Index of the snapshot matching the document's current state.
    cursor: usize,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the document at mount so the first user action is undoable.
    pub fn save_initial_state(&mut self, doc: &Document) {
        self.snapshots.clear();
        self.snapshots.push(Snapshot::capture("Initial state", doc));
        self.cursor = 0;
    }

    /// Record a named snapshot of the current document state.
    ///
    /// Any redo entries past the cursor are discarded.
    pub fn save(&mut self, label: impl Into<String>, doc: &Document) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Snapshot::capture(label, doc));
        if self.snapshots.len() > MAX_SNAPSHOTS {
            self.snapshots.remove(0);
        }
        self.cursor = self.snapshots.len() - 1;
        tracing::debug!(
            "History saved '{}' ({} entries)",
            self.snapshots[self.cursor].label,
            self.snapshots.len()
        );
    }

    /// Step back one snapshot, restoring the document. Returns the label of
    /// the undone entry, or `None` at the start of history.
    pub fn undo(&mut self, doc: &mut Document) -> Option<&str> {
        if self.cursor == 0 || self.snapshots.is_empty() {
            return None;
        }
        let undone = self.cursor;
        self.cursor -= 1;
        self.snapshots[self.cursor].apply(doc);
        Some(&self.snapshots[undone].label)
    }

    /// Step forward one snapshot, restoring the document. Returns the label
    /// of the redone entry, or `None` at the end of history.
    pub fn redo(&mut self, doc: &mut Document) -> Option<&str> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots[self.cursor].apply(doc);
        Some(&self.snapshots[self.cursor].label)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the history holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementType, Position};

    #[test]
    fn test_undo_restores_positions_exactly() {
        let mut doc = Document::with_page("Home");
        let id = doc.add_element(ElementType::Frame, None).expect("add");
        let mut history = History::new();
        history.save_initial_state(&doc);

        doc.move_element(id, Position::new(120.0, 80.0));
        history.save("Move element", &doc);

        assert_eq!(history.undo(&mut doc), Some("Move element"));
        let el = doc.element(id).expect("element");
        assert!((el.position.x).abs() < f32::EPSILON);
        assert!((el.position.y).abs() < f32::EPSILON);

        assert_eq!(history.redo(&mut doc), Some("Move element"));
        let el = doc.element(id).expect("element");
        assert!((el.position.x - 120.0).abs() < f32::EPSILON);
        assert!((el.position.y - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_first_action_is_undoable() {
        let mut doc = Document::with_page("Home");
        let mut history = History::new();
        history.save_initial_state(&doc);

        let id = doc.add_element(ElementType::Text, None).expect("add");
        history.save("Add element", &doc);

        history.undo(&mut doc).expect("undo");
        assert!(doc.element(id).is_none());
    }

    #[test]
    fn test_save_truncates_redo_tail() {
        let mut doc = Document::with_page("Home");
        let mut history = History::new();
        history.save_initial_state(&doc);

        let a = doc.add_element(ElementType::Frame, None).expect("add");
        history.save("Add A", &doc);
        history.undo(&mut doc).expect("undo");
        assert!(history.can_redo());

        let b = doc.add_element(ElementType::Box, None).expect("add");
        history.save("Add B", &doc);
        assert!(!history.can_redo());
        assert!(history.redo(&mut doc).is_none());
        assert!(doc.element(b).is_some());
        assert!(doc.element(a).is_none());
    }

    #[test]
    fn test_undo_at_start_is_none() {
        let mut doc = Document::with_page("Home");
        let mut history = History::new();
        history.save_initial_state(&doc);
        assert!(history.undo(&mut doc).is_none());
        assert!(!history.can_undo());
    }
}
