//! End-to-end gesture flows: click resolution, drag commit, undo/redo, and
//! the click/marquee inclusion asymmetry.

use studio_core::{
    Display, Document, ElementId, ElementType, History, Position, Size, StyleSheet,
};
use studio_interact::{
    ClickModifiers, ClickOutcome, DragController, InteractionOverlay, PointerPoint,
    SelectionEngine,
};
use studio_layout::{StyleResolver, Viewport};

/// A free-positioned page with two frames, each holding a text leaf.
fn free_page() -> (Document, ElementId, ElementId, ElementId, ElementId) {
    let mut doc = Document::with_page("Home");
    let root = doc.current_root().expect("root");
    doc.set_styles(
        root,
        &StyleSheet {
            display: Some(Display::Block),
            ..StyleSheet::default()
        },
    );
    let page = doc.current_page().expect("page");
    doc.move_page_position(page, 0.0, 0.0);

    let left = doc.add_element(ElementType::Frame, Some(root)).expect("left");
    let left_text = doc.add_element(ElementType::Text, Some(left)).expect("text");
    let right = doc.add_element(ElementType::Frame, Some(root)).expect("right");
    let right_text = doc.add_element(ElementType::Text, Some(right)).expect("text");

    doc.move_element(left, Position::new(20.0, 20.0));
    doc.resize_element(left, Size::new(120.0, 80.0));
    doc.move_element(right, Position::new(300.0, 20.0));
    doc.resize_element(right, Size::new(120.0, 80.0));
    doc.resize_element(left_text, Size::new(60.0, 20.0));
    doc.resize_element(right_text, Size::new(60.0, 20.0));

    (doc, left, left_text, right, right_text)
}

#[test]
fn undo_after_committed_drag_restores_every_position() {
    let (mut doc, left, _, right, _) = free_page();
    let mut resolver = StyleResolver::new();
    let mut selection = SelectionEngine::new();
    let mut overlay = InteractionOverlay::new();
    let mut history = History::new();
    history.save_initial_state(&doc);
    let viewport = Viewport::new(800.0, 600.0);

    selection.select_element(&doc, left, false);
    selection.select_element(&doc, right, true);

    let mut drag = DragController::new();
    assert!(drag.begin(&doc, &mut resolver, &selection, left, PointerPoint::new(50.0, 50.0)));
    drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(90.0, 75.0));
    drag.end(&mut doc, &mut overlay, &mut selection, &mut history)
        .expect("commit");

    let moved_left = doc.element(left).expect("left").position;
    let moved_right = doc.element(right).expect("right").position;
    assert!((moved_left.x - 60.0).abs() < f32::EPSILON);
    assert!((moved_right.y - 45.0).abs() < f32::EPSILON);

    history.undo(&mut doc).expect("undo");
    let left_pos = doc.element(left).expect("left").position;
    let right_pos = doc.element(right).expect("right").position;
    assert!((left_pos.x - 20.0).abs() < f32::EPSILON);
    assert!((left_pos.y - 20.0).abs() < f32::EPSILON);
    assert!((right_pos.x - 300.0).abs() < f32::EPSILON);

    history.redo(&mut doc).expect("redo");
    let left_pos = doc.element(left).expect("left").position;
    assert!((left_pos.x - 60.0).abs() < f32::EPSILON);
    assert!((left_pos.y - 45.0).abs() < f32::EPSILON);
}

#[test]
fn click_after_real_drag_is_swallowed_once() {
    let (mut doc, left, _, _, _) = free_page();
    let mut resolver = StyleResolver::new();
    let mut selection = SelectionEngine::new();
    let mut overlay = InteractionOverlay::new();
    let mut history = History::new();
    history.save_initial_state(&doc);
    let viewport = Viewport::new(800.0, 600.0);

    let mut drag = DragController::new();
    drag.begin(&doc, &mut resolver, &selection, left, PointerPoint::new(50.0, 50.0));
    drag.update(&doc, &mut overlay, &viewport, PointerPoint::new(120.0, 50.0));
    drag.end(&mut doc, &mut overlay, &mut selection, &mut history)
        .expect("commit");

    assert_eq!(
        selection.click(&doc, left, ClickModifiers::none(), 1000),
        ClickOutcome::Swallowed
    );
    // Only once.
    assert_eq!(
        selection.click(&doc, left, ClickModifiers::none(), 2000),
        ClickOutcome::Selected
    );
}

#[test]
fn click_and_marquee_use_different_inclusion_rules() {
    let (doc, left, left_text, _, _) = free_page();
    let mut selection = SelectionEngine::new();
    let viewport = Viewport::new(800.0, 600.0);

    // Click path: the nested text resolves to its parent frame first.
    assert_eq!(
        selection.click(&doc, left_text, ClickModifiers::none(), 0),
        ClickOutcome::ParentSelected(left)
    );

    // Marquee path over the same region: both frame and text are selected
    // directly, no parent substitution.
    let hits = selection.marquee(
        &doc,
        &viewport,
        PointerPoint::new(410.0, 310.0),
        PointerPoint::new(560.0, 420.0),
    );
    assert_eq!(hits, vec![left, left_text]);
}

#[test]
fn marquee_containment_is_exact() {
    let (doc, left, left_text, right, right_text) = free_page();
    let mut selection = SelectionEngine::new();
    let viewport = Viewport::new(800.0, 600.0);

    // Canvas rect (250, 0)-(500, 150) covers only the right frame.
    let hits = selection.marquee(
        &doc,
        &viewport,
        PointerPoint::new(650.0, 300.0),
        PointerPoint::new(900.0, 450.0),
    );
    assert_eq!(hits, vec![right, right_text]);
    assert!(!selection.is_selected(left));
    assert!(!selection.is_selected(left_text));
}

#[test]
fn escape_clears_selection_after_gesture() {
    let (doc, left, _, right, _) = free_page();
    let mut selection = SelectionEngine::new();
    selection.select_element(&doc, left, false);
    selection.select_element(&doc, right, true);
    assert_eq!(selection.selected().len(), 2);

    selection.escape();
    assert!(selection.selected().is_empty());
}

#[test]
fn selection_order_is_insertion_order() {
    let (doc, left, _, right, _) = free_page();
    let mut selection = SelectionEngine::new();
    selection.click(&doc, right, ClickModifiers::none(), 0);
    selection.click(&doc, left, ClickModifiers::shift(), 1000);
    assert_eq!(selection.selected(), &[right, left]);
}
