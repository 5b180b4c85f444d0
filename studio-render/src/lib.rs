//! # Saorsa Studio Render
//!
//! Builds the declarative render tree the host UI draws each frame. One
//! recursive visitor walks the current page's element tree, resolves styles
//! through the memoized resolver, computes layout instructions, and
//! dispatches content through the element-type table - container and leaf
//! nodes share the same walk.
//!
//! Transient drag positions from the [`InteractionOverlay`] take precedence
//! over committed document state, and the walk writes each node's
//! best-effort absolute bounds back into the overlay for the reorder
//! controller's next frame (the host's measure pass refreshes flow nodes
//! with exact values).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use studio_core::{CanvasElement, CropRect, Document, ElementId, ElementType};
use studio_interact::{InteractionOverlay, SelectionEngine};
use studio_layout::{
    compute_layout, LayoutInstructions, ParentContext, PositionMode, Rect, SizeValue,
    StyleResolver,
};

/// Content payload of a render node, dispatched from the element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderContent {
    /// A container; its children carry the content.
    Container,
    /// Flowing text (text, headings, paragraphs, buttons, links).
    Text {
        /// The text to draw.
        content: String,
    },
    /// An image with an optional crop.
    Image {
        /// Source URI.
        src: String,
        /// Optional crop rectangle.
        #[serde(skip_serializing_if = "Option::is_none")]
        crop: Option<CropRect>,
    },
    /// A named icon glyph.
    Icon {
        /// Icon name or source URI.
        name: String,
    },
    /// An embedded video.
    Video {
        /// Source URI.
        src: String,
    },
    /// A text input field.
    Input {
        /// Current value.
        value: String,
    },
}

/// The type -> content table. Every element goes through this single
/// dispatch; there are no parallel container/leaf render branches.
fn content_for(element: &CanvasElement) -> RenderContent {
    let text = || element.content.clone().unwrap_or_default();
    let src = || element.src.clone().unwrap_or_default();
    match element.element_type {
        ElementType::Page
        | ElementType::Frame
        | ElementType::Stack
        | ElementType::Grid
        | ElementType::Section
        | ElementType::Container
        | ElementType::Row
        | ElementType::Box => RenderContent::Container,
        ElementType::Text
        | ElementType::Heading
        | ElementType::Paragraph
        | ElementType::Button
        | ElementType::Link => RenderContent::Text { content: text() },
        ElementType::Image => RenderContent::Image {
            src: src(),
            crop: element.crop,
        },
        ElementType::Icon => RenderContent::Icon { name: src() },
        ElementType::Video => RenderContent::Video { src: src() },
        ElementType::Input => RenderContent::Input { value: text() },
    }
}

/// One node of the render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    /// The element this node renders.
    pub id: ElementId,
    /// Layer name, for debugging overlays.
    pub name: String,
    /// Element tag.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Concrete layout instructions.
    pub layout: LayoutInstructions,
    /// Content payload.
    pub content: RenderContent,
    /// Rendered children, in flow order. Hidden elements are absent.
    pub children: Vec<RenderNode>,
}

/// Build the render tree for the document's current page.
///
/// Returns `None` when the document has no current page. Selection and hover
/// state drive outlines; overlay positions override committed positions for
/// elements mid-drag.
#[must_use]
pub fn build_render_tree(
    doc: &Document,
    resolver: &mut StyleResolver,
    selection: &SelectionEngine,
    overlay: &mut InteractionOverlay,
) -> Option<RenderNode> {
    let page = doc.current_page().and_then(|id| doc.page(id))?;
    let root = doc.element(page.root_element)?;
    Some(visit(
        doc,
        resolver,
        selection,
        overlay,
        root,
        ParentContext::free(),
        (page.x, page.y),
    ))
}

/// Recursive visitor over one element and its visible subtree.
fn visit(
    doc: &Document,
    resolver: &mut StyleResolver,
    selection: &SelectionEngine,
    overlay: &mut InteractionOverlay,
    element: &CanvasElement,
    parent: ParentContext,
    origin: (f32, f32),
) -> RenderNode {
    let effective = resolver.resolve(doc, element.id);
    let mut layout = compute_layout(
        element,
        &effective,
        parent,
        selection.is_selected(element.id),
        selection.hovered() == Some(element.id),
    );

    // Mid-drag positions win over the committed model.
    if layout.position == PositionMode::Absolute {
        if let Some(transient) = overlay.position_of(element.id) {
            layout.offset = Some((transient.x, transient.y));
        }
    }

    let node_origin = match layout.offset {
        Some((x, y)) => (origin.0 + x, origin.1 + y),
        None => origin,
    };
    record_bounds(overlay, element, &layout, node_origin);

    let child_context = ParentContext::of(&effective);
    let children = element
        .children
        .iter()
        .filter_map(|id| doc.element(*id))
        .filter(|child| child.visible)
        .map(|child| {
            visit(
                doc,
                resolver,
                selection,
                overlay,
                child,
                child_context,
                node_origin,
            )
        })
        .collect();

    RenderNode {
        id: element.id,
        name: element.name.clone(),
        element_type: element.element_type,
        layout,
        content: content_for(element),
        children,
    }
}

/// Write a node's absolute bounds into the overlay when they are knowable
/// without running the flex algorithm. Flow nodes with flex-driven sizes are
/// left to the host's measure pass.
fn record_bounds(
    overlay: &mut InteractionOverlay,
    element: &CanvasElement,
    layout: &LayoutInstructions,
    origin: (f32, f32),
) {
    let width = match layout.width {
        SizeValue::Px(px) => px,
        _ => element.size.width,
    };
    let height = match layout.height {
        SizeValue::Px(px) => px,
        _ => element.size.height,
    };
    if layout.position == PositionMode::Absolute {
        overlay.record_bounds(element.id, Rect::new(origin.0, origin.1, width, height));
    }
}

/// Studio render version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{Position, ResizeMode, Size, StyleSheet};
    use studio_interact::ClickModifiers;

    struct Harness {
        doc: Document,
        resolver: StyleResolver,
        selection: SelectionEngine,
        overlay: InteractionOverlay,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                doc: Document::with_page("Home"),
                resolver: StyleResolver::new(),
                selection: SelectionEngine::new(),
                overlay: InteractionOverlay::new(),
            }
        }

        fn build(&mut self) -> RenderNode {
            build_render_tree(
                &self.doc,
                &mut self.resolver,
                &self.selection,
                &mut self.overlay,
            )
            .expect("render tree")
        }
    }

    #[test]
    fn test_text_in_page_column_renders_full_width() {
        let mut h = Harness::new();
        // Page roots are column auto-layout by default; the text's resizeX
        // stays unset (nominally fixed).
        let text = h.doc.add_element(ElementType::Text, None).expect("add");
        let tree = h.build();

        let node = &tree.children[0];
        assert_eq!(node.id, text);
        assert_eq!(node.layout.width, SizeValue::Percent(100.0));
        assert_eq!(node.layout.position, PositionMode::Flow);
    }

    #[test]
    fn test_hidden_elements_are_not_rendered() {
        let mut h = Harness::new();
        let a = h.doc.add_element(ElementType::Frame, None).expect("a");
        let b = h.doc.add_element(ElementType::Frame, None).expect("b");
        h.doc.toggle_visibility(a);
        let tree = h.build();

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].id, b);
    }

    #[test]
    fn test_content_dispatch_table() {
        let mut h = Harness::new();
        let button = h.doc.add_element(ElementType::Button, None).expect("add");
        h.doc.update_element_content(button, "Sign up");
        let image = h.doc.add_element(ElementType::Image, None).expect("add");
        h.doc.update_element_src(image, "hero.png");
        let frame = h.doc.add_element(ElementType::Frame, None).expect("add");

        let tree = h.build();
        assert_eq!(tree.content, RenderContent::Container);
        assert_eq!(
            tree.children[0].content,
            RenderContent::Text {
                content: "Sign up".to_string()
            }
        );
        assert_eq!(
            tree.children[1].content,
            RenderContent::Image {
                src: "hero.png".to_string(),
                crop: None
            }
        );
        assert_eq!(tree.children[2].content, RenderContent::Container);
        let _ = frame;
    }

    #[test]
    fn test_overlay_position_overrides_model() {
        let mut h = Harness::new();
        let root = h.doc.current_root().expect("root");
        // Free positioning under the root for this test.
        h.doc.set_styles(
            root,
            &StyleSheet {
                display: Some(studio_core::Display::Block),
                ..StyleSheet::default()
            },
        );
        let frame = h.doc.add_element(ElementType::Frame, None).expect("add");
        h.doc.move_element(frame, Position::new(10.0, 10.0));
        h.overlay
            .set_position(frame, Position::new(300.0, 200.0));

        let tree = h.build();
        let node = &tree.children[0];
        assert_eq!(node.layout.offset, Some((300.0, 200.0)));
        // The committed model is untouched.
        let committed = h.doc.element(frame).expect("frame").position;
        assert!((committed.x - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_selection_outline_reaches_nodes() {
        let mut h = Harness::new();
        let frame = h.doc.add_element(ElementType::Frame, None).expect("add");
        h.selection.click(&h.doc, frame, ClickModifiers::none(), 0);
        h.selection.hover(Some(frame));

        let tree = h.build();
        let outline = tree.children[0].layout.outline.expect("outline");
        assert!((outline.width - 2.0).abs() < f32::EPSILON);
        // The page root never takes a direct outline.
        assert!(tree.layout.outline.is_none());
    }

    #[test]
    fn test_absolute_bounds_recorded_for_reorder() {
        let mut h = Harness::new();
        let root = h.doc.current_root().expect("root");
        h.doc.set_styles(
            root,
            &StyleSheet {
                display: Some(studio_core::Display::Block),
                ..StyleSheet::default()
            },
        );
        let frame = h.doc.add_element(ElementType::Frame, None).expect("add");
        h.doc.move_element(frame, Position::new(40.0, 50.0));
        h.doc.resize_element(frame, Size::new(120.0, 80.0));

        h.build();
        let page = h.doc.current_page().and_then(|id| h.doc.page(id)).expect("page");
        let bounds = h.overlay.bounds_of(frame).expect("bounds");
        assert!((bounds.x - (page.x + 40.0)).abs() < f32::EPSILON);
        assert!((bounds.width - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fill_child_in_row_serializes_without_pixel_width() {
        let mut h = Harness::new();
        let row = h.doc.add_element(ElementType::Row, None).expect("row");
        let child = h.doc.add_element(ElementType::Box, Some(row)).expect("child");
        h.doc.set_styles(
            child,
            &StyleSheet {
                resize_x: Some(ResizeMode::Fill),
                ..StyleSheet::default()
            },
        );

        let tree = h.build();
        let child_node = &tree.children[0].children[0];
        assert_eq!(child_node.layout.width, SizeValue::Flex);
        let json = serde_json::to_string(child_node).expect("json");
        assert!(json.contains("\"width\":\"flex\""));
    }
}
