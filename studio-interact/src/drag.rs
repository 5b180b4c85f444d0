//! Free-move and auto-layout reorder drags.
//!
//! The branch is taken once at drag start: elements whose parent lacks auto
//! layout free-move (every selected element translates with the pointer),
//! elements inside an auto-layout parent reorder against their siblings'
//! live midpoints. Per-frame updates write only to the interaction overlay;
//! the document commits once at drag end with a single history entry.

use studio_core::{Document, DropSide, ElementId, FlexDirection, History, Position, Size};
use studio_layout::{Rect, StyleResolver, Viewport};

use crate::input::PointerPoint;
use crate::overlay::InteractionOverlay;
use crate::selection::SelectionEngine;

/// Net screen-pixel movement below which a drag is not "real".
const DRAG_THRESHOLD: f32 = 4.0;

/// What a completed drag committed to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragCommit {
    /// A free-move drag moved this many elements.
    Moved(usize),
    /// A reorder drag placed the element beside a sibling.
    Reordered {
        /// The sibling the element landed next to.
        target: ElementId,
        /// Which side of the target it landed on.
        side: DropSide,
    },
}

#[derive(Debug)]
enum DragState {
    FreeMove {
        element: ElementId,
        pointer_start: PointerPoint,
        captured: Vec<(ElementId, Position)>,
        moved: bool,
    },
    Reorder {
        element: ElementId,
        parent: ElementId,
        direction: FlexDirection,
        pointer_start: PointerPoint,
        target: Option<(ElementId, DropSide)>,
        moved: bool,
    },
}

/// The drag gesture state machine.
#[derive(Debug, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag gesture is in flight.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    /// Begin a drag on an element. Returns whether a gesture started.
    ///
    /// Locked elements, page roots, and unknown ids do not start drags. The
    /// free-move branch captures the start position of every selected
    /// element, or just the grabbed one when it is outside the selection.
    pub fn begin(
        &mut self,
        doc: &Document,
        resolver: &mut StyleResolver,
        selection: &SelectionEngine,
        id: ElementId,
        pointer: PointerPoint,
    ) -> bool {
        let Some(element) = doc.element(id) else {
            return false;
        };
        if element.locked || element.is_page_root() {
            return false;
        }

        let parent_flows = element.parent.map(|pid| {
            let effective = resolver.resolve(doc, pid);
            (pid, effective.has_auto_layout(), effective.direction())
        });

        self.state = Some(match parent_flows {
            Some((parent, true, direction)) => {
                tracing::debug!("Reorder drag started on {id}");
                DragState::Reorder {
                    element: id,
                    parent,
                    direction,
                    pointer_start: pointer,
                    target: None,
                    moved: false,
                }
            }
            _ => {
                let ids: Vec<ElementId> = if selection.is_selected(id) {
                    selection.selected().to_vec()
                } else {
                    vec![id]
                };
                let captured = ids
                    .into_iter()
                    .filter_map(|eid| doc.element(eid).map(|el| (eid, el.position)))
                    .collect();
                tracing::debug!("Free-move drag started on {id}");
                DragState::FreeMove {
                    element: id,
                    pointer_start: pointer,
                    captured,
                    moved: false,
                }
            }
        });
        true
    }

    /// Advance the gesture by one pointer frame.
    ///
    /// Free-move writes zoom-scaled, integer-rounded positions into the
    /// overlay; reorder retargets against the siblings' currently rendered
    /// midpoints. The document is not touched.
    pub fn update(
        &mut self,
        doc: &Document,
        overlay: &mut InteractionOverlay,
        viewport: &Viewport,
        pointer: PointerPoint,
    ) {
        match &mut self.state {
            None => {}
            Some(DragState::FreeMove {
                pointer_start,
                captured,
                moved,
                ..
            }) => {
                let screen_dx = pointer.x - pointer_start.x;
                let screen_dy = pointer.y - pointer_start.y;
                *moved |= screen_dx.hypot(screen_dy) >= DRAG_THRESHOLD;

                let dx = (screen_dx / viewport.zoom).round();
                let dy = (screen_dy / viewport.zoom).round();
                for (id, start) in captured.as_slice() {
                    overlay.set_position(*id, Position::new(start.x + dx, start.y + dy));
                }
            }
            Some(DragState::Reorder {
                element,
                parent,
                direction,
                pointer_start,
                target,
                moved,
            }) => {
                let screen_dx = pointer.x - pointer_start.x;
                let screen_dy = pointer.y - pointer_start.y;
                *moved |= screen_dx.hypot(screen_dy) >= DRAG_THRESHOLD;

                let (cx, cy) = viewport.screen_to_canvas(pointer.x, pointer.y);
                let pointer_main = match direction {
                    FlexDirection::Column => cy,
                    FlexDirection::Row => cx,
                };

                // Nearest sibling midpoint along the main axis wins; flex
                // reflow shifts midpoints mid-drag, so bounds are read live.
                let mut best: Option<(ElementId, DropSide, f32)> = None;
                for sibling in doc.children_of(*parent) {
                    if sibling.id == *element {
                        continue;
                    }
                    let bounds = sibling_bounds(doc, overlay, sibling.id);
                    let midpoint = match direction {
                        FlexDirection::Column => bounds.center_y(),
                        FlexDirection::Row => bounds.center_x(),
                    };
                    let distance = (pointer_main - midpoint).abs();
                    let side = if pointer_main < midpoint {
                        DropSide::Before
                    } else {
                        DropSide::After
                    };
                    if best.is_none_or(|(_, _, d)| distance < d) {
                        best = Some((sibling.id, side, distance));
                    }
                }
                *target = best.map(|(id, side, _)| (id, side));
            }
        }
    }

    /// Finish the gesture, committing to the document at most once.
    ///
    /// A real free-move flushes the overlay positions into the document and
    /// records one "Move element" history entry; a real reorder with a target
    /// applies it with one "Reorder element" entry. Trivial drags commit
    /// nothing. The click immediately following a real drag is suppressed
    /// through the selection engine.
    pub fn end(
        &mut self,
        doc: &mut Document,
        overlay: &mut InteractionOverlay,
        selection: &mut SelectionEngine,
        history: &mut History,
    ) -> Option<DragCommit> {
        match self.state.take()? {
            DragState::FreeMove {
                element,
                captured,
                moved,
                ..
            } => {
                if !moved {
                    overlay.discard_positions();
                    return None;
                }
                let mut committed = 0;
                for (id, position) in overlay.drain_positions() {
                    if captured.iter().any(|(cid, _)| *cid == id) {
                        doc.move_element(id, position);
                        committed += 1;
                    }
                }
                history.save("Move element", doc);
                selection.note_drag(element);
                Some(DragCommit::Moved(committed))
            }
            DragState::Reorder {
                element,
                target,
                moved,
                ..
            } => {
                if !moved {
                    return None;
                }
                selection.note_drag(element);
                let (target_id, side) = target?;
                doc.reorder_element(element, target_id, side);
                history.save("Reorder element", doc);
                Some(DragCommit::Reordered {
                    target: target_id,
                    side,
                })
            }
        }
    }
}

/// Live bounds for a sibling: the overlay's rendered rect when the measure
/// pass has produced one, the model-derived rect otherwise.
fn sibling_bounds(doc: &Document, overlay: &InteractionOverlay, id: ElementId) -> Rect {
    if let Some(bounds) = overlay.bounds_of(id) {
        return bounds;
    }
    let position = doc.absolute_position(id);
    let (page_x, page_y) = doc
        .page_of(id)
        .and_then(|pid| doc.page(pid))
        .map_or((0.0, 0.0), |p| (p.x, p.y));
    let size = doc.element(id).map_or_else(Size::default, |el| el.size);
    Rect::new(page_x + position.x, page_y + position.y, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{ElementType, StyleSheet};

    fn free_fixture() -> (Document, ElementId, ElementId) {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        // Free positioning: strip the page root's default column flow.
        doc.set_styles(
            root,
            &StyleSheet {
                display: Some(studio_core::Display::Block),
                ..StyleSheet::default()
            },
        );
        let a = doc.add_element(ElementType::Frame, Some(root)).expect("a");
        let b = doc.add_element(ElementType::Frame, Some(root)).expect("b");
        doc.move_element(a, Position::new(10.0, 10.0));
        doc.move_element(b, Position::new(200.0, 10.0));
        (doc, a, b)
    }

    fn row_fixture() -> (Document, ElementId, Vec<ElementId>) {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let row = doc.add_element(ElementType::Row, Some(root)).expect("row");
        let children: Vec<ElementId> = (0..3)
            .map(|_| doc.add_element(ElementType::Box, Some(row)).expect("child"))
            .collect();
        (doc, row, children)
    }

    #[test]
    fn test_free_move_commits_once_with_history() {
        let (mut doc, a, b) = free_fixture();
        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        selection.select_element(&doc, a, false);
        selection.select_element(&doc, b, true);

        let mut drag = DragController::new();
        assert!(drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(100.0, 100.0)));
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(130.0, 120.0));

        // Mid-gesture the document is untouched; the overlay holds the move.
        let el = doc.element(a).expect("a");
        assert!((el.position.x - 10.0).abs() < f32::EPSILON);
        let transient = overlay.position_of(a).expect("overlay position");
        assert!((transient.x - 40.0).abs() < f32::EPSILON);

        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);
        assert_eq!(commit, Some(DragCommit::Moved(2)));
        assert!(!overlay.has_pending_positions());

        // Both selected elements translated by the same delta.
        let a_pos = doc.element(a).expect("a").position;
        let b_pos = doc.element(b).expect("b").position;
        assert!((a_pos.x - 40.0).abs() < f32::EPSILON);
        assert!((a_pos.y - 30.0).abs() < f32::EPSILON);
        assert!((b_pos.x - 230.0).abs() < f32::EPSILON);

        // Exactly one undoable entry for the whole gesture.
        history.undo(&mut doc).expect("undo");
        let a_pos = doc.element(a).expect("a").position;
        assert!((a_pos.x - 10.0).abs() < f32::EPSILON);
        let b_pos = doc.element(b).expect("b").position;
        assert!((b_pos.x - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_free_move_scales_by_inverse_zoom_and_rounds() {
        let (mut doc, a, _) = free_fixture();
        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.set_zoom(2.0);

        let mut drag = DragController::new();
        drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(0.0, 0.0));
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(25.0, 11.0));
        drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        let pos = doc.element(a).expect("a").position;
        // 25 screen px at zoom 2 is 12.5 canvas units, rounded to 13.
        assert!((pos.x - 23.0).abs() < f32::EPSILON);
        // 11 / 2 = 5.5, rounded to 6.
        assert!((pos.y - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_trivial_drag_commits_nothing() {
        let (mut doc, a, _) = free_fixture();
        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        let mut drag = DragController::new();
        drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(100.0, 100.0));
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(101.0, 101.0));
        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        assert!(commit.is_none());
        assert!(!history.can_undo());
        let pos = doc.element(a).expect("a").position;
        assert!((pos.x - 10.0).abs() < f32::EPSILON);
        // A trivial drag does not suppress the next click.
        assert_ne!(
            selection.click(&doc, a, crate::input::ClickModifiers::none(), 0),
            crate::selection::ClickOutcome::Swallowed
        );
    }

    #[test]
    fn test_locked_element_does_not_drag() {
        let (mut doc, a, _) = free_fixture();
        doc.toggle_lock(a);
        let mut resolver = StyleResolver::new();
        let selection = SelectionEngine::new();
        let mut drag = DragController::new();
        assert!(!drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(0.0, 0.0)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_reorder_past_last_sibling_midpoint() {
        let (mut doc, row, children) = row_fixture();
        let (a, b, c) = (children[0], children[1], children[2]);
        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        // Rendered bounds as the row lays them out: 100px slots at x 0/100/200.
        overlay.record_bounds(a, Rect::new(0.0, 0.0, 100.0, 50.0));
        overlay.record_bounds(b, Rect::new(100.0, 0.0, 100.0, 50.0));
        overlay.record_bounds(c, Rect::new(200.0, 0.0, 100.0, 50.0));

        let mut drag = DragController::new();
        assert!(drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(410.0, 300.0)));
        // Canvas x = 280: right of C's midpoint (250).
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(680.0, 300.0));
        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        assert_eq!(
            commit,
            Some(DragCommit::Reordered {
                target: c,
                side: DropSide::After
            })
        );
        assert_eq!(doc.element(row).expect("row").children, vec![b, c, a]);
    }

    #[test]
    fn test_reorder_before_side_from_pointer_position() {
        let (mut doc, row, children) = row_fixture();
        let (a, b, c) = (children[0], children[1], children[2]);
        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        overlay.record_bounds(a, Rect::new(0.0, 0.0, 100.0, 50.0));
        overlay.record_bounds(b, Rect::new(100.0, 0.0, 100.0, 50.0));
        overlay.record_bounds(c, Rect::new(200.0, 0.0, 100.0, 50.0));

        let mut drag = DragController::new();
        drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(410.0, 300.0));
        // Canvas x = 230: left of C's midpoint (250), nearer C than B.
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(630.0, 300.0));
        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        assert_eq!(
            commit,
            Some(DragCommit::Reordered {
                target: c,
                side: DropSide::Before
            })
        );
        assert_eq!(doc.element(row).expect("row").children, vec![b, a, c]);
    }

    #[test]
    fn test_sole_child_reorder_has_no_target() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        let row = doc.add_element(ElementType::Row, Some(root)).expect("row");
        let only = doc.add_element(ElementType::Box, Some(row)).expect("only");

        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        let mut drag = DragController::new();
        drag.begin(&doc, &mut resolver, &selection, only, PointerPoint::new(0.0, 0.0));
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(300.0, 0.0));
        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        assert!(commit.is_none());
        assert_eq!(doc.element(row).expect("row").children, vec![only]);
    }

    #[test]
    fn test_reorder_uses_column_axis_for_column_parents() {
        let mut doc = Document::with_page("Home");
        let root = doc.current_root().expect("root");
        // The page root itself is a column auto-layout container.
        let a = doc.add_element(ElementType::Box, Some(root)).expect("a");
        let b = doc.add_element(ElementType::Box, Some(root)).expect("b");
        doc.resize_element(a, Size::new(100.0, 100.0));
        doc.resize_element(b, Size::new(100.0, 100.0));

        let mut resolver = StyleResolver::new();
        let mut selection = SelectionEngine::new();
        let mut overlay = InteractionOverlay::new();
        let mut history = History::new();
        history.save_initial_state(&doc);
        let viewport = Viewport::new(800.0, 600.0);

        overlay.record_bounds(a, Rect::new(0.0, 0.0, 100.0, 100.0));
        overlay.record_bounds(b, Rect::new(0.0, 100.0, 100.0, 100.0));

        let mut drag = DragController::new();
        drag.begin(&doc, &mut resolver, &selection, a, PointerPoint::new(400.0, 310.0));
        // Canvas y = 180: below B's midpoint (150).
        drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(400.0, 480.0));
        let commit = drag.end(&mut doc, &mut overlay, &mut selection, &mut history);

        assert_eq!(
            commit,
            Some(DragCommit::Reordered {
                target: b,
                side: DropSide::After
            })
        );
        assert_eq!(doc.element(root).expect("root").children, vec![b, a]);
    }
}
