//! The canonical element/page document.
//!
//! [`Document`] is the single source of truth for the element forest, the
//! page list, and the breakpoint set. All mutation goes through named
//! operations that are atomic with respect to the event loop; invalid input
//! (unknown ids, illegal targets) makes an operation a defensive no-op rather
//! than an error.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::element::{CanvasElement, ElementId, ElementType, Position, Size};
use crate::error::{CoreError, CoreResult};
use crate::page::{Breakpoint, BreakpointId, CanvasPage, PageId, PagePatch};
use crate::style::StyleSheet;

/// Which side of a reorder target the moved element lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropSide {
    /// Insert immediately before the target sibling.
    Before,
    /// Insert immediately after the target sibling.
    After,
}

/// Offset applied to duplicated and pasted elements so they do not sit
/// exactly on top of the original.
const DUPLICATE_OFFSET: f32 = 10.0;

/// Horizontal spacing between newly added pages on the infinite canvas.
const PAGE_SPACING: f32 = 200.0;

/// The canonical document: id-indexed element and page maps plus the
/// breakpoint set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    elements: HashMap<ElementId, CanvasElement>,
    pages: HashMap<PageId, CanvasPage>,
    page_order: Vec<PageId>,
    current_page: Option<PageId>,
    breakpoints: Vec<Breakpoint>,
    active_breakpoint: Option<BreakpointId>,
    style_revision: u64,
}

impl Document {
    /// Create an empty document with the standard breakpoint set.
    #[must_use]
    pub fn new() -> Self {
        let breakpoints = Breakpoint::standard_set();
        let active = breakpoints.iter().find(|b| b.is_default).map(|b| b.id);
        Self {
            elements: HashMap::new(),
            pages: HashMap::new(),
            page_order: Vec::new(),
            current_page: None,
            breakpoints,
            active_breakpoint: active,
            style_revision: 0,
        }
    }

    /// Create a document with a single page of the given name.
    #[must_use]
    pub fn with_page(name: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.add_page(name);
        doc
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.get(&id)
    }

    /// Iterate over all elements in the document.
    pub fn elements(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.values()
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get a page by ID.
    #[must_use]
    pub fn page(&self, id: PageId) -> Option<&CanvasPage> {
        self.pages.get(&id)
    }

    /// Iterate over pages in creation order.
    pub fn pages(&self) -> impl Iterator<Item = &CanvasPage> {
        self.page_order.iter().filter_map(|id| self.pages.get(id))
    }

    /// The currently edited page.
    #[must_use]
    pub fn current_page(&self) -> Option<PageId> {
        self.current_page
    }

    /// Switch the current page. Unknown ids are ignored.
    pub fn set_current_page(&mut self, id: PageId) {
        if self.pages.contains_key(&id) {
            self.current_page = Some(id);
        }
    }

    /// Root element of the current page.
    #[must_use]
    pub fn current_root(&self) -> Option<ElementId> {
        self.current_page
            .and_then(|id| self.pages.get(&id))
            .map(|p| p.root_element)
    }

    /// The breakpoint list.
    #[must_use]
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// The default breakpoint, if the set has one.
    #[must_use]
    pub fn default_breakpoint(&self) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|b| b.is_default)
    }

    /// The active breakpoint id.
    #[must_use]
    pub fn active_breakpoint(&self) -> Option<BreakpointId> {
        self.active_breakpoint
    }

    /// Activate a breakpoint. Ids outside the breakpoint list are ignored.
    pub fn set_active_breakpoint(&mut self, id: Option<BreakpointId>) {
        match id {
            None => self.active_breakpoint = None,
            Some(id) if self.breakpoints.iter().any(|b| b.id == id) => {
                self.active_breakpoint = Some(id);
            }
            Some(other) => tracing::debug!("Ignoring unknown breakpoint {other}"),
        }
    }

    /// Monotonic counter bumped by any style-affecting mutation.
    ///
    /// The style resolver keys its memo cache on this value.
    #[must_use]
    pub fn style_revision(&self) -> u64 {
        self.style_revision
    }

    /// Resolved children of an element, in flow order.
    pub fn children_of(&self, id: ElementId) -> impl Iterator<Item = &CanvasElement> {
        self.elements
            .get(&id)
            .map_or(&[][..], |e| e.children.as_slice())
            .iter()
            .filter_map(|cid| self.elements.get(cid))
    }

    /// The parent of an element, if any.
    #[must_use]
    pub fn parent_of(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements
            .get(&id)
            .and_then(|e| e.parent)
            .and_then(|pid| self.elements.get(&pid))
    }

    /// Ancestor chain of an element, nearest first, ending at the page root.
    #[must_use]
    pub fn ancestors_of(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut cursor = self.elements.get(&id).and_then(|e| e.parent);
        while let Some(pid) = cursor {
            // A malformed parent chain must not hang the walk.
            if chain.contains(&pid) {
                break;
            }
            chain.push(pid);
            cursor = self.elements.get(&pid).and_then(|e| e.parent);
        }
        chain
    }

    /// Depth-first ids of an element's subtree, including the element itself.
    #[must_use]
    pub fn subtree_ids(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(element) = self.elements.get(&next) {
                out.push(next);
                for child in element.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// Position of an element in page coordinates: its own position plus the
    /// summed offsets of every ancestor up to the page root.
    ///
    /// Page placement on the infinite canvas is not included; callers add
    /// [`CanvasPage::x`]/[`CanvasPage::y`] when they need canvas space.
    #[must_use]
    pub fn absolute_position(&self, id: ElementId) -> Position {
        let mut pos = self
            .elements
            .get(&id)
            .map_or_else(Position::default, |e| e.position);
        for ancestor in self.ancestors_of(id) {
            if let Some(el) = self.elements.get(&ancestor) {
                pos.x += el.position.x;
                pos.y += el.position.y;
            }
        }
        pos
    }

    /// The page an element belongs to.
    #[must_use]
    pub fn page_of(&self, id: ElementId) -> Option<PageId> {
        let mut root = id;
        while let Some(parent) = self.elements.get(&root).and_then(|e| e.parent) {
            root = parent;
        }
        self.pages().find(|p| p.root_element == root).map(|p| p.id)
    }

    // -----------------------------------------------------------------------
    // Page mutations
    // -----------------------------------------------------------------------

    /// Add a page with a fresh `page`-type root element and make it current.
    pub fn add_page(&mut self, name: impl Into<String>) -> PageId {
        let root = CanvasElement::new(ElementType::Page);
        let root_id = root.id;
        let size = root.size;
        self.elements.insert(root_id, root);

        #[allow(clippy::cast_precision_loss)] // Page counts stay tiny.
        let x = self.page_order.len() as f32 * (size.width + PAGE_SPACING);
        let page = CanvasPage {
            id: PageId::new(),
            name: name.into(),
            root_element: root_id,
            x,
            y: 0.0,
            width: size.width,
            height: size.height,
        };
        let id = page.id;
        self.pages.insert(id, page);
        self.page_order.push(id);
        self.current_page.get_or_insert(id);
        id
    }

    /// Move a page on the infinite canvas. Unknown ids are ignored.
    pub fn move_page_position(&mut self, id: PageId, x: f32, y: f32) {
        if let Some(page) = self.pages.get_mut(&id) {
            page.x = x;
            page.y = y;
        }
    }

    /// Apply a patch to a page's name or baseline size. Unknown ids are
    /// ignored.
    pub fn update_page(&mut self, id: PageId, patch: &PagePatch) {
        let Some(page) = self.pages.get_mut(&id) else {
            return;
        };
        if let Some(name) = &patch.name {
            page.name.clone_from(name);
        }
        if let Some(width) = patch.width {
            page.width = width;
        }
        if let Some(height) = patch.height {
            page.height = height;
        }
    }

    // -----------------------------------------------------------------------
    // Element mutations
    // -----------------------------------------------------------------------

    /// Add a fresh element under the given parent (or the current page root).
    ///
    /// Returns `None` when the parent is missing or not a container, or when
    /// asked to create a loose `page` element.
    pub fn add_element(&mut self, element_type: ElementType, parent: Option<ElementId>) -> Option<ElementId> {
        if element_type == ElementType::Page {
            return None;
        }
        let parent_id = parent.or_else(|| self.current_root())?;
        let parent_el = self.elements.get(&parent_id)?;
        if !parent_el.element_type.is_container() {
            return None;
        }

        let element = CanvasElement::new(element_type).with_parent(parent_id);
        let id = element.id;
        self.elements.insert(id, element);
        if let Some(parent_el) = self.elements.get_mut(&parent_id) {
            parent_el.children.push(id);
        }
        Some(id)
    }

    /// Insert a pre-built element under a parent, appending to its children.
    ///
    /// Used by ingest and paste; the element's `parent` field is overwritten.
    pub(crate) fn attach_element(&mut self, mut element: CanvasElement, parent: ElementId) -> Option<ElementId> {
        if !self.elements.contains_key(&parent) {
            return None;
        }
        element.parent = Some(parent);
        let id = element.id;
        self.elements.insert(id, element);
        if let Some(parent_el) = self.elements.get_mut(&parent) {
            parent_el.children.push(id);
        }
        Some(id)
    }

    /// Delete an element and its whole subtree. Page roots are not deletable
    /// through this path; unknown ids are ignored.
    pub fn delete_element(&mut self, id: ElementId) {
        let Some(element) = self.elements.get(&id) else {
            return;
        };
        if element.is_page_root() {
            return;
        }
        let parent = element.parent;
        for descendant in self.subtree_ids(id) {
            self.elements.remove(&descendant);
        }
        if let Some(parent_el) = parent.and_then(|pid| self.elements.get_mut(&pid)) {
            parent_el.children.retain(|cid| *cid != id);
        }
    }

    /// Deep-duplicate an element subtree with fresh ids.
    ///
    /// The copy is inserted immediately after the original in its parent's
    /// children and nudged by a small offset. Returns the new root id, or
    /// `None` for unknown ids and page roots.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let original = self.elements.get(&id)?;
        if original.is_page_root() {
            return None;
        }
        let parent_id = original.parent?;

        let new_id = self.clone_subtree(id, Some(parent_id))?;
        if let Some(copy) = self.elements.get_mut(&new_id) {
            copy.position.x += DUPLICATE_OFFSET;
            copy.position.y += DUPLICATE_OFFSET;
        }
        if let Some(parent_el) = self.elements.get_mut(&parent_id) {
            // clone_subtree appended the copy; move it next to the original.
            parent_el.children.retain(|cid| *cid != new_id);
            let at = parent_el
                .children
                .iter()
                .position(|cid| *cid == id)
                .map_or(parent_el.children.len(), |i| i + 1);
            parent_el.children.insert(at, new_id);
        }
        Some(new_id)
    }

    /// Recursively clone a subtree with fresh ids under the given parent.
    fn clone_subtree(&mut self, id: ElementId, parent: Option<ElementId>) -> Option<ElementId> {
        let mut copy = self.elements.get(&id)?.clone();
        let children = std::mem::take(&mut copy.children);
        copy.id = ElementId::new();
        copy.parent = parent;
        let new_id = copy.id;
        self.elements.insert(new_id, copy);
        for child in children {
            if let Some(new_child) = self.clone_subtree(child, Some(new_id)) {
                if let Some(el) = self.elements.get_mut(&new_id) {
                    el.children.push(new_child);
                }
            }
        }
        if let Some(parent_el) = parent.and_then(|pid| self.elements.get_mut(&pid)) {
            parent_el.children.push(new_id);
        }
        Some(new_id)
    }

    /// Set an element's free position. Page roots and unknown ids are
    /// ignored.
    pub fn move_element(&mut self, id: ElementId, position: Position) {
        if let Some(element) = self.elements.get_mut(&id) {
            if !element.is_page_root() {
                element.position = position;
            }
        }
    }

    /// Set an element's baseline size. Unknown ids are ignored.
    pub fn resize_element(&mut self, id: ElementId, size: Size) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.size = size;
        }
    }

    /// Replace an element's text content. Unknown ids are ignored.
    pub fn update_element_content(&mut self, id: ElementId, content: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.content = Some(content.into());
        }
    }

    /// Replace an element's source URI. Unknown ids are ignored.
    pub fn update_element_src(&mut self, id: ElementId, src: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.src = Some(src.into());
        }
    }

    /// Move an element immediately before or after a target sibling.
    ///
    /// The element joins the target's parent (re-parenting if the two differ)
    /// at the requested side. No-ops: unknown ids, page roots, self-targets,
    /// targets without a parent, and targets inside the moved subtree.
    pub fn reorder_element(&mut self, id: ElementId, target: ElementId, side: DropSide) {
        if id == target {
            return;
        }
        let Some(element) = self.elements.get(&id) else {
            return;
        };
        if element.is_page_root() {
            return;
        }
        let old_parent = element.parent;
        let Some(new_parent) = self.elements.get(&target).and_then(|t| t.parent) else {
            return;
        };
        // Re-parenting into the moved subtree would detach it into a cycle.
        if self.subtree_ids(id).contains(&new_parent) {
            return;
        }
        // The target must sit in its parent's children before anything moves.
        if !self
            .elements
            .get(&new_parent)
            .is_some_and(|p| p.children.contains(&target))
        {
            return;
        }

        if let Some(parent_el) = old_parent.and_then(|pid| self.elements.get_mut(&pid)) {
            parent_el.children.retain(|cid| *cid != id);
        }
        if let Some(parent_el) = self.elements.get_mut(&new_parent) {
            let Some(target_idx) = parent_el.children.iter().position(|cid| *cid == target) else {
                return;
            };
            let at = match side {
                DropSide::Before => target_idx,
                DropSide::After => target_idx + 1,
            };
            parent_el.children.insert(at, id);
        }
        if let Some(element) = self.elements.get_mut(&id) {
            element.parent = Some(new_parent);
        }
    }

    /// Merge a style patch into an element's base styles.
    pub fn set_styles(&mut self, id: ElementId, patch: &StyleSheet) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.styles.merge_from(patch);
            self.style_revision += 1;
        }
    }

    /// Merge a style patch into an element's override layer for a breakpoint.
    ///
    /// Breakpoints outside the document's list are ignored.
    pub fn set_responsive_styles(&mut self, id: ElementId, breakpoint: BreakpointId, patch: &StyleSheet) {
        if !self.breakpoints.iter().any(|b| b.id == breakpoint) {
            return;
        }
        if let Some(element) = self.elements.get_mut(&id) {
            element
                .responsive_styles
                .entry(breakpoint)
                .or_default()
                .merge_from(patch);
            self.style_revision += 1;
        }
    }

    /// Toggle the locked flag. Unknown ids are ignored.
    pub fn toggle_lock(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.locked = !element.locked;
        }
    }

    /// Toggle the visible flag. Unknown ids are ignored.
    pub fn toggle_visibility(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.visible = !element.visible;
        }
    }

    /// Wrap a set of siblings in a fresh `frame`.
    ///
    /// All ids must share one parent and none may be a page root; otherwise
    /// the operation is a no-op returning `None`. The frame takes the
    /// bounding box of the wrapped elements and their positions are rebased
    /// into it.
    pub fn wrap_in_frame(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        self.wrap_with(ids, ElementType::Frame, "Frame")
    }

    /// Group a set of siblings under a fresh `container`.
    pub fn group_elements(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        self.wrap_with(ids, ElementType::Container, "Group")
    }

    fn wrap_with(&mut self, ids: &[ElementId], wrapper_type: ElementType, name: &str) -> Option<ElementId> {
        if ids.is_empty() {
            return None;
        }
        let first = self.elements.get(&ids[0])?;
        let parent_id = first.parent?;

        // Verify shared parentage and take the bounding box of the wrapped
        // set, in the parent's coordinates.
        let mut min = Position::new(f32::MAX, f32::MAX);
        let mut max = Position::new(f32::MIN, f32::MIN);
        for id in ids {
            let el = self.elements.get(id)?;
            if el.parent != Some(parent_id) {
                return None;
            }
            min.x = min.x.min(el.position.x);
            min.y = min.y.min(el.position.y);
            max.x = max.x.max(el.position.x + el.size.width);
            max.y = max.y.max(el.position.y + el.size.height);
        }

        let mut wrapper = CanvasElement::new(wrapper_type)
            .with_parent(parent_id)
            .with_position(min)
            .with_size(Size::new(max.x - min.x, max.y - min.y));
        wrapper.name = name.to_string();
        let wrapper_id = wrapper.id;
        self.elements.insert(wrapper_id, wrapper);

        // The wrapper takes the slot of the first wrapped element.
        let parent_el = self.elements.get_mut(&parent_id)?;
        let slot = parent_el
            .children
            .iter()
            .position(|cid| ids.contains(cid))
            .unwrap_or_else(|| parent_el.children.len());
        parent_el.children.retain(|cid| !ids.contains(cid));
        parent_el.children.insert(slot.min(parent_el.children.len()), wrapper_id);

        for id in ids {
            if let Some(el) = self.elements.get_mut(id) {
                el.parent = Some(wrapper_id);
                el.position.x -= min.x;
                el.position.y -= min.y;
            }
            if let Some(wrapper_el) = self.elements.get_mut(&wrapper_id) {
                wrapper_el.children.push(*id);
            }
        }
        Some(wrapper_id)
    }

    /// Dissolve a container, re-parenting its children in place.
    ///
    /// Children keep their flow order, take the container's slot in the
    /// grandparent, and have their positions rebased back out. Returns the
    /// re-parented ids, or `None` for unknown ids, leaves, and page roots.
    pub fn ungroup_elements(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        let element = self.elements.get(&id)?;
        if element.is_page_root() || !element.element_type.is_container() {
            return None;
        }
        let parent_id = element.parent?;
        let offset = element.position;
        let children = element.children.clone();

        let parent_el = self.elements.get_mut(&parent_id)?;
        let slot = parent_el
            .children
            .iter()
            .position(|cid| *cid == id)
            .unwrap_or_else(|| parent_el.children.len());
        parent_el.children.retain(|cid| *cid != id);
        for (i, child) in children.iter().enumerate() {
            parent_el.children.insert(slot + i, *child);
        }

        for child in &children {
            if let Some(el) = self.elements.get_mut(child) {
                el.parent = Some(parent_id);
                el.position.x += offset.x;
                el.position.y += offset.y;
            }
        }
        self.elements.remove(&id);
        Some(children)
    }

    // -----------------------------------------------------------------------
    // Validation & snapshot support
    // -----------------------------------------------------------------------

    /// Check the forest invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTree`] when any element's parent link or
    /// children list is inconsistent, or a page root is malformed.
    pub fn validate(&self) -> CoreResult<()> {
        for page in self.pages.values() {
            let root = self
                .elements
                .get(&page.root_element)
                .ok_or_else(|| CoreError::InvalidTree(format!("page {} root missing", page.id)))?;
            if root.element_type != ElementType::Page || root.parent.is_some() {
                return Err(CoreError::InvalidTree(format!(
                    "page {} root is not a parentless page element",
                    page.id
                )));
            }
        }

        for element in self.elements.values() {
            match element.parent {
                Some(parent_id) => {
                    let parent = self.elements.get(&parent_id).ok_or_else(|| {
                        CoreError::InvalidTree(format!("{} has a dangling parent", element.id))
                    })?;
                    let occurrences = parent.children.iter().filter(|c| **c == element.id).count();
                    if occurrences != 1 {
                        return Err(CoreError::InvalidTree(format!(
                            "{} appears {occurrences} times in its parent's children",
                            element.id
                        )));
                    }
                }
                None => {
                    if !self.pages.values().any(|p| p.root_element == element.id) {
                        return Err(CoreError::InvalidTree(format!(
                            "{} has no parent and is not a page root",
                            element.id
                        )));
                    }
                }
            }

            let mut seen = HashSet::new();
            for child in &element.children {
                if !seen.insert(*child) {
                    return Err(CoreError::InvalidTree(format!(
                        "{} lists child {child} twice",
                        element.id
                    )));
                }
                let child_el = self.elements.get(child).ok_or_else(|| {
                    CoreError::InvalidTree(format!("{} lists a dangling child", element.id))
                })?;
                if child_el.parent != Some(element.id) {
                    return Err(CoreError::InvalidTree(format!(
                        "{child} does not point back at its parent"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Snapshot of the element/page maps for the history recorder.
    #[must_use]
    pub(crate) fn snapshot_maps(
        &self,
    ) -> (HashMap<ElementId, CanvasElement>, HashMap<PageId, CanvasPage>, Vec<PageId>) {
        (self.elements.clone(), self.pages.clone(), self.page_order.clone())
    }

    /// Restore the element/page maps from a history snapshot.
    pub(crate) fn restore_maps(
        &mut self,
        elements: HashMap<ElementId, CanvasElement>,
        pages: HashMap<PageId, CanvasPage>,
        page_order: Vec<PageId>,
    ) {
        self.elements = elements;
        self.pages = pages;
        self.page_order = page_order;
        if self
            .current_page
            .is_none_or(|id| !self.pages.contains_key(&id))
        {
            self.current_page = self.page_order.first().copied();
        }
        // Restored styles may differ from the live ones.
        self.style_revision += 1;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
