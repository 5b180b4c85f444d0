//! Click and marquee selection.
//!
//! Click resolution is parent-first: the first click on a nested element
//! lands on its nearest container ancestor, and only a further click (or a
//! Cmd/Ctrl deep-select) reaches the element itself. Marquee selection is
//! deliberately flat - every intersecting element at any depth is selected
//! directly, with no parent substitution. The asymmetry is intentional.

use studio_core::{Document, ElementId, ElementType};
use studio_layout::{Rect, Viewport};

use crate::input::{ClickModifiers, PointerPoint};

/// Two clicks within this window count as a double-click.
const DOUBLE_CLICK_MS: u64 = 400;

/// A marquee under this size in both axes is a null drag, not a selection.
const MARQUEE_MIN_PX: f32 = 5.0;

/// What a click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Locked element, active text edit, or unknown id; nothing changed.
    Ignored,
    /// The click immediately after a real drag; consumed once.
    Swallowed,
    /// Shift-click toggled membership; `true` when the element is now
    /// selected.
    Toggled(bool),
    /// Double-click entered text editing on the element.
    TextEditStarted,
    /// Cmd/Ctrl-click selected exactly the element.
    DeepSelected,
    /// The element was already selected; selection unchanged.
    AlreadySelected,
    /// The click was substituted to the element's container parent.
    ParentSelected(ElementId),
    /// The element itself became the selection.
    Selected,
}

/// What pressing Escape did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// Pending content was committed and text editing exited.
    ExitedTextEdit,
    /// The selection was cleared.
    ClearedSelection,
}

/// Selection state: the ordered selected set, hover, text editing, and the
/// click bookkeeping that drives double-click and post-drag swallowing.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    /// Selected ids in insertion order (selection order is meaningful).
    selected: Vec<ElementId>,
    hovered: Option<ElementId>,
    editing: Option<ElementId>,
    last_click: Option<(ElementId, u64)>,
    drag_since_last_click: bool,
    swallow_click_on: Option<ElementId>,
}

impl SelectionEngine {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected ids, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    /// Whether an element is selected.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// The hovered element, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// The element in text-edit mode, if any.
    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    /// Update the hovered element.
    pub fn hover(&mut self, id: Option<ElementId>) {
        self.hovered = id;
    }

    /// Resolve a click on an element at `timestamp_ms` (host clock).
    pub fn click(
        &mut self,
        doc: &Document,
        id: ElementId,
        modifiers: ClickModifiers,
        timestamp_ms: u64,
    ) -> ClickOutcome {
        // One click is swallowed right after a real drag on the same element.
        if self.swallow_click_on.take() == Some(id) {
            return ClickOutcome::Swallowed;
        }

        let Some(element) = doc.element(id) else {
            return ClickOutcome::Ignored;
        };
        if element.locked || self.editing == Some(id) {
            return ClickOutcome::Ignored;
        }

        let previous_click = self.last_click;
        let dragged_between = self.drag_since_last_click;
        self.last_click = Some((id, timestamp_ms));
        self.drag_since_last_click = false;

        if modifiers.shift {
            return if let Some(at) = self.selected.iter().position(|s| *s == id) {
                self.selected.remove(at);
                ClickOutcome::Toggled(false)
            } else {
                self.selected.push(id);
                ClickOutcome::Toggled(true)
            };
        }

        let is_double = previous_click.is_some_and(|(prev_id, prev_ts)| {
            prev_id == id && timestamp_ms.saturating_sub(prev_ts) < DOUBLE_CLICK_MS
        });
        if is_double && !dragged_between && element.element_type.supports_text_editing() {
            self.editing = Some(id);
            return ClickOutcome::TextEditStarted;
        }

        if modifiers.command {
            self.selected = vec![id];
            return ClickOutcome::DeepSelected;
        }

        if self.is_selected(id) {
            return ClickOutcome::AlreadySelected;
        }

        // Parent-first: the first click enters the composed group.
        if let Some(parent) = doc.parent_of(id) {
            if parent.element_type.is_container()
                && parent.element_type != ElementType::Page
                && !self.is_selected(parent.id)
            {
                self.selected = vec![parent.id];
                return ClickOutcome::ParentSelected(parent.id);
            }
        }

        self.selected = vec![id];
        ClickOutcome::Selected
    }

    /// Select an element directly, optionally adding to the selection.
    ///
    /// Unknown ids are ignored.
    pub fn select_element(&mut self, doc: &Document, id: ElementId, add_to_selection: bool) {
        if doc.element(id).is_none() {
            return;
        }
        if add_to_selection {
            if !self.is_selected(id) {
                self.selected.push(id);
            }
        } else {
            self.selected = vec![id];
        }
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Select every element on the current page (the page root excluded),
    /// in depth-first order.
    pub fn select_all(&mut self, doc: &Document) {
        let Some(root) = doc.current_root() else {
            return;
        };
        self.selected = doc
            .subtree_ids(root)
            .into_iter()
            .filter(|id| *id != root)
            .collect();
    }

    /// Handle Escape: exit text editing (content is already committed by the
    /// edit surface) or clear the selection.
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.editing.take().is_some() {
            EscapeOutcome::ExitedTextEdit
        } else {
            self.deselect_all();
            EscapeOutcome::ClearedSelection
        }
    }

    /// Note a completed real drag on an element.
    ///
    /// The next click on the same element is swallowed once, and any pending
    /// double-click sequence is broken.
    pub fn note_drag(&mut self, id: ElementId) {
        self.swallow_click_on = Some(id);
        self.drag_since_last_click = true;
    }

    /// Marquee selection over a screen-space drag rectangle.
    ///
    /// The rectangle is inverted through the viewport's pan/zoom, then the
    /// current page's subtree is walked depth-first (root skipped); every
    /// visible, unlocked element whose ancestor-offset-summed bounds
    /// intersect the rectangle is selected, in traversal order. Unlike
    /// clicks, no parent substitution applies. Returns the selected ids; a
    /// rectangle under 5px in both axes is a null drag selecting nothing.
    pub fn marquee(
        &mut self,
        doc: &Document,
        viewport: &Viewport,
        start: PointerPoint,
        end: PointerPoint,
    ) -> Vec<ElementId> {
        let screen = Rect::from_points(start.x, start.y, end.x, end.y);
        if screen.width < MARQUEE_MIN_PX && screen.height < MARQUEE_MIN_PX {
            return Vec::new();
        }
        let Some(page) = doc.current_page().and_then(|id| doc.page(id)) else {
            return Vec::new();
        };
        let Some(root) = doc.element(page.root_element) else {
            return Vec::new();
        };

        let rect = viewport.screen_rect_to_canvas(&screen);
        let mut hits = Vec::new();
        collect_hits(
            doc,
            root.id,
            page.x + root.position.x,
            page.y + root.position.y,
            &rect,
            &mut hits,
        );
        tracing::debug!("Marquee selected {} elements", hits.len());
        self.selected.clone_from(&hits);
        hits
    }
}

/// Depth-first hit collection under an accumulated ancestor offset.
///
/// Locked or hidden elements drop out along with their subtrees.
fn collect_hits(
    doc: &Document,
    parent: ElementId,
    ox: f32,
    oy: f32,
    rect: &Rect,
    hits: &mut Vec<ElementId>,
) {
    for child in doc.children_of(parent) {
        if child.locked || !child.visible {
            continue;
        }
        let bounds = Rect::new(
            ox + child.position.x,
            oy + child.position.y,
            child.size.width,
            child.size.height,
        );
        if rect.intersects(&bounds) {
            hits.push(child.id);
        }
        if child.element_type.is_container() {
            collect_hits(doc, child.id, bounds.x, bounds.y, rect, hits);
        }
    }
}
