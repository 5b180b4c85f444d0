//! Breakpoint-aware style resolution.
//!
//! The effective style of an element is its base sheet with the default
//! breakpoint's override layered on (when a default exists and is not the
//! active breakpoint) and the active breakpoint's override layered on last.
//! Resolution runs on every interactive frame, so [`StyleResolver`] memoizes
//! per (element, breakpoint) and invalidates on the document's style
//! revision; the cache is a correctness-adjacent requirement, not a tuning
//! knob.

use std::collections::HashMap;

use studio_core::{Breakpoint, BreakpointId, Document, ElementId, StyleSheet};

/// Pure composition of base + breakpoint override layers.
///
/// Unknown `active` ids simply contribute no layer, falling back to base.
#[must_use]
pub fn resolve_styles(
    base: &StyleSheet,
    overrides: &HashMap<BreakpointId, StyleSheet>,
    breakpoints: &[Breakpoint],
    active: Option<BreakpointId>,
) -> StyleSheet {
    let mut effective = base.clone();
    let default_id = breakpoints.iter().find(|b| b.is_default).map(|b| b.id);

    if let Some(default_id) = default_id {
        if Some(default_id) != active {
            if let Some(layer) = overrides.get(&default_id) {
                effective.merge_from(layer);
            }
        }
    }
    if let Some(active_id) = active {
        if breakpoints.iter().any(|b| b.id == active_id) {
            if let Some(layer) = overrides.get(&active_id) {
                effective.merge_from(layer);
            }
        }
    }
    effective
}

/// Memoizing wrapper over [`resolve_styles`].
#[derive(Debug, Default)]
pub struct StyleResolver {
    cache: HashMap<(ElementId, Option<BreakpointId>), StyleSheet>,
    /// Style revision of the document the cache was built against.
    revision: u64,
}

impl StyleResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective style of an element under the document's active breakpoint.
    ///
    /// Unknown element ids resolve to the empty sheet.
    pub fn resolve(&mut self, doc: &Document, id: ElementId) -> StyleSheet {
        if self.revision != doc.style_revision() {
            tracing::trace!(
                "Style cache invalidated at revision {}",
                doc.style_revision()
            );
            self.cache.clear();
            self.revision = doc.style_revision();
        }

        let key = (id, doc.active_breakpoint());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let effective = doc.element(id).map_or_else(StyleSheet::default, |el| {
            resolve_styles(
                &el.styles,
                &el.responsive_styles,
                doc.breakpoints(),
                doc.active_breakpoint(),
            )
        });
        self.cache.insert(key, effective.clone());
        effective
    }

    /// Number of cached entries, for diagnostics.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
