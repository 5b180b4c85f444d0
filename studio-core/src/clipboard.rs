//! Clipboard over selected element subtrees.
//!
//! Copy serializes each selected subtree root into the exchange shape; paste
//! materializes them with fresh ids. The clipboard never holds element ids,
//! so repeated pastes and cross-document pastes are safe by construction.

use crate::document::Document;
use crate::element::{ElementId, Position};
use crate::exchange::ExchangeNode;

/// Offset applied to pasted roots so they do not cover the source exactly.
const PASTE_OFFSET: f32 = 10.0;

/// An id-free clipboard of exchange subtrees.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<ExchangeNode>,
    source_positions: Vec<Position>,
}

impl Clipboard {
    /// Create an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the clipboard holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copy the subtree roots among `ids` into the clipboard.
    ///
    /// Ids whose ancestor is also in the set are skipped - their subtree is
    /// already covered by the ancestor's copy. Page roots are not copyable.
    pub fn copy(&mut self, doc: &Document, ids: &[ElementId]) {
        let roots: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|id| {
                doc.element(*id).is_some_and(|el| !el.is_page_root())
                    && !doc.ancestors_of(*id).iter().any(|a| ids.contains(a))
            })
            .collect();
        if roots.is_empty() {
            return;
        }
        self.nodes = roots
            .iter()
            .filter_map(|id| doc.export_subtree(*id))
            .collect();
        self.source_positions = roots
            .iter()
            .filter_map(|id| doc.element(*id).map(|el| el.position))
            .collect();
    }

    /// Copy, then delete the copied subtrees from the document.
    pub fn cut(&mut self, doc: &mut Document, ids: &[ElementId]) {
        self.copy(doc, ids);
        for id in ids {
            doc.delete_element(*id);
        }
    }

    /// Paste the clipboard contents under a parent, issuing fresh ids.
    ///
    /// Pasted roots land at their source position nudged by a small offset.
    /// Returns the new root ids; an empty clipboard or an invalid parent
    /// pastes nothing.
    pub fn paste(&mut self, doc: &mut Document, parent: ElementId) -> Vec<ElementId> {
        let mut pasted = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            match doc.ingest_subtree(parent, node) {
                Ok(id) => {
                    if let Some(source) = self.source_positions.get(i) {
                        doc.move_element(
                            id,
                            Position::new(source.x + PASTE_OFFSET, source.y + PASTE_OFFSET),
                        );
                    }
                    pasted.push(id);
                }
                Err(e) => tracing::warn!("Paste skipped a subtree: {e}"),
            }
        }
        pasted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_copy_paste_issues_fresh_ids() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let frame = doc.add_element(ElementType::Frame, None).expect("add");
        let text = doc
            .add_element(ElementType::Text, Some(frame))
            .expect("add");
        doc.update_element_content(text, "hello");

        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &[frame]);
        let pasted = clipboard.paste(&mut doc, root);

        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], frame);
        let copy = doc.element(pasted[0]).expect("copy");
        assert_eq!(copy.children.len(), 1);
        let copy_text = doc.element(copy.children[0]).expect("text");
        assert_eq!(copy_text.content.as_deref(), Some("hello"));
        assert_ne!(copy_text.id, text);
        doc.validate().expect("valid tree");
    }

    #[test]
    fn test_copy_skips_nested_selection() {
        let mut doc = Document::with_page("Home");
        let frame = doc.add_element(ElementType::Frame, None).expect("add");
        let text = doc
            .add_element(ElementType::Text, Some(frame))
            .expect("add");

        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &[frame, text]);
        // Only the outer frame was captured; the text travels inside it.
        assert_eq!(clipboard.nodes.len(), 1);
    }

    #[test]
    fn test_cut_removes_source() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let frame = doc.add_element(ElementType::Frame, None).expect("add");

        let mut clipboard = Clipboard::new();
        clipboard.cut(&mut doc, &[frame]);
        assert!(doc.element(frame).is_none());

        let pasted = clipboard.paste(&mut doc, root);
        assert_eq!(pasted.len(), 1);
        doc.validate().expect("valid tree");
    }

    #[test]
    fn test_paste_offsets_position() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let frame = doc.add_element(ElementType::Frame, None).expect("add");
        doc.move_element(frame, Position::new(40.0, 40.0));

        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &[frame]);
        let pasted = clipboard.paste(&mut doc, root);
        let copy = doc.element(pasted[0]).expect("copy");
        assert!((copy.position.x - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_page_root_not_copyable() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &[root]);
        assert!(clipboard.is_empty());
    }
}
