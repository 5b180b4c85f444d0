//! The transient interaction overlay.
//!
//! During a drag the engine writes positions here instead of the document,
//! so the render path stays at frame rate while the canonical store only
//! commits once at gesture end ("local authority, eventual consistency").
//! The overlay also carries the last rendered bounds of every element, which
//! the reorder controller reads for live sibling midpoints.

use std::collections::HashMap;

use studio_core::{ElementId, Position};
use studio_layout::Rect;

/// Uncommitted interaction state rendered preferentially over the document.
#[derive(Debug, Clone, Default)]
pub struct InteractionOverlay {
    positions: HashMap<ElementId, Position>,
    rendered_bounds: HashMap<ElementId, Rect>,
}

impl InteractionOverlay {
    /// Create an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transient position for an element, if one is being dragged.
    #[must_use]
    pub fn position_of(&self, id: ElementId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Write a transient position for an element.
    pub fn set_position(&mut self, id: ElementId, position: Position) {
        self.positions.insert(id, position);
    }

    /// Whether any transient positions are pending.
    #[must_use]
    pub fn has_pending_positions(&self) -> bool {
        !self.positions.is_empty()
    }

    /// Take all pending positions, leaving the overlay clean.
    ///
    /// Called exactly once per gesture commit.
    pub fn drain_positions(&mut self) -> Vec<(ElementId, Position)> {
        self.positions.drain().collect()
    }

    /// Drop all pending positions without committing them.
    pub fn discard_positions(&mut self) {
        self.positions.clear();
    }

    /// Record an element's rendered bounds, in canvas space.
    ///
    /// The renderer (or the host's measure pass) refreshes these every frame;
    /// flex reflow moves siblings mid-drag, so reorder targeting must read
    /// live values.
    pub fn record_bounds(&mut self, id: ElementId, bounds: Rect) {
        self.rendered_bounds.insert(id, bounds);
    }

    /// Last rendered bounds of an element, if known.
    #[must_use]
    pub fn bounds_of(&self, id: ElementId) -> Option<Rect> {
        self.rendered_bounds.get(&id).copied()
    }

    /// Forget all recorded bounds (e.g. when switching pages).
    pub fn clear_bounds(&mut self) {
        self.rendered_bounds.clear();
    }
}
