//! JSON exchange format for element subtrees.
//!
//! The same nested `{type, name, content?, styles, children: [...]}` shape is
//! produced by clipboard serialization and consumed from the AI generation
//! layer. Externally supplied trees are untrusted: they are validated
//! wholesale before a single element is created, and rejected in full when
//! anything is off - a subtree is never merged piecemeal.
//!
//! ## Example
//!
//! ```json
//! {
//!   "type": "stack",
//!   "name": "Hero",
//!   "styles": { "display": "flex", "flexDirection": "column" },
//!   "children": [
//!     { "type": "heading", "content": "Welcome", "styles": {} },
//!     { "type": "button", "content": "Get started", "styles": {} }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::element::{CanvasElement, ElementId, ElementType};
use crate::style::StyleSheet;

/// Maximum nesting depth accepted from external trees.
const MAX_INGEST_DEPTH: usize = 64;

/// Errors rejecting an external element subtree.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The JSON did not parse into the exchange shape.
    #[error("Malformed exchange JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A node carries a type tag outside the known set.
    #[error("Unknown element type tag: {0}")]
    UnknownType(String),

    /// A `page` element appeared below the root of a subtree.
    #[error("Nested page element at depth {0}")]
    NestedPage(usize),

    /// A leaf-type node carries children.
    #[error("Leaf element '{tag}' has {count} children")]
    LeafWithChildren {
        /// The offending type tag.
        tag: String,
        /// Number of children found.
        count: usize,
    },

    /// The tree nests deeper than [`MAX_INGEST_DEPTH`].
    #[error("Subtree exceeds maximum depth of {0}")]
    TooDeep(usize),

    /// The requested parent does not exist in the document.
    #[error("Parent element not found: {0}")]
    ParentNotFound(String),

    /// The requested parent cannot hold children.
    #[error("Parent element is not a container: {0}")]
    ParentNotContainer(String),
}

/// One node of the nested exchange tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeNode {
    /// Element type tag, e.g. `"stack"` or `"heading"`.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Optional layer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional text content for text-bearing leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Optional source URI for image/video/icon leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Style record for the node.
    #[serde(default)]
    pub styles: StyleSheet,
    /// Nested children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExchangeNode>,
}

impl ExchangeNode {
    /// Parse an exchange tree from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Parse`] if the JSON does not match the shape.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the tree to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, IngestError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate the whole tree against the data-model invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found; nothing about the tree is trusted
    /// until this passes.
    pub fn validate(&self) -> Result<(), IngestError> {
        self.validate_at(0)
    }

    fn validate_at(&self, depth: usize) -> Result<(), IngestError> {
        if depth > MAX_INGEST_DEPTH {
            return Err(IngestError::TooDeep(MAX_INGEST_DEPTH));
        }
        let element_type: ElementType = self
            .type_tag
            .parse()
            .map_err(|_| IngestError::UnknownType(self.type_tag.clone()))?;
        if element_type == ElementType::Page && depth > 0 {
            return Err(IngestError::NestedPage(depth));
        }
        if element_type.is_leaf() && !self.children.is_empty() {
            return Err(IngestError::LeafWithChildren {
                tag: self.type_tag.clone(),
                count: self.children.len(),
            });
        }
        for child in &self.children {
            child.validate_at(depth + 1)?;
        }
        Ok(())
    }
}

impl Document {
    /// Materialize an external subtree under a parent, issuing fresh ids.
    ///
    /// The tree is validated in full before any element is created; a
    /// rejected tree leaves the document untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestError`] describing the first invariant violation,
    /// or an unknown/non-container parent.
    pub fn ingest_subtree(
        &mut self,
        parent: ElementId,
        node: &ExchangeNode,
    ) -> Result<ElementId, IngestError> {
        node.validate()?;
        let parent_el = self
            .element(parent)
            .ok_or_else(|| IngestError::ParentNotFound(parent.to_string()))?;
        if !parent_el.element_type.is_container() {
            return Err(IngestError::ParentNotContainer(parent.to_string()));
        }
        tracing::debug!("Ingesting '{}' subtree under {parent}", node.type_tag);
        self.materialize(parent, node)
    }

    /// Instantiate a validated node and its children under a parent.
    ///
    /// The error paths are unreachable after [`ExchangeNode::validate`]; they
    /// exist so no invariant rests on an `expect`.
    fn materialize(&mut self, parent: ElementId, node: &ExchangeNode) -> Result<ElementId, IngestError> {
        let element_type: ElementType = node
            .type_tag
            .parse()
            .map_err(|_| IngestError::UnknownType(node.type_tag.clone()))?;
        let mut element = CanvasElement::new(element_type);
        if let Some(name) = &node.name {
            element.name.clone_from(name);
        }
        element.content.clone_from(&node.content);
        element.src.clone_from(&node.src);
        element.styles.merge_from(&node.styles);

        let id = self
            .attach_element(element, parent)
            .ok_or_else(|| IngestError::ParentNotFound(parent.to_string()))?;
        for child in &node.children {
            self.materialize(id, child)?;
        }
        Ok(id)
    }

    /// Serialize an element subtree into the exchange shape.
    ///
    /// Returns `None` for unknown ids. Ids, positions, lock/visibility flags
    /// and responsive overrides are deliberately not part of the exchange
    /// shape; a paste re-issues all of them.
    #[must_use]
    pub fn export_subtree(&self, id: ElementId) -> Option<ExchangeNode> {
        let element = self.element(id)?;
        let children = element
            .children
            .iter()
            .filter_map(|child| self.export_subtree(*child))
            .collect();
        Some(ExchangeNode {
            type_tag: element.element_type.tag().to_string(),
            name: Some(element.name.clone()),
            content: element.content.clone(),
            src: element.src.clone(),
            styles: element.styles.clone(),
            children,
        })
    }
}
