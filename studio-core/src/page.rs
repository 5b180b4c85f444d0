//! Pages and breakpoints.
//!
//! A page is an artboard on the infinite canvas; its element tree hangs off a
//! single root element of type `page`. Breakpoints are named viewport
//! profiles carrying optional per-element style overrides.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::ElementId;

/// Unique identifier for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(Uuid);

impl PageId {
    /// Create a new unique page ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a page ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakpointId(Uuid);

impl BreakpointId {
    /// Create a new unique breakpoint ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a breakpoint ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for BreakpointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An artboard on the infinite canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasPage {
    /// Unique identifier.
    pub id: PageId,
    /// Page name shown in the pages panel.
    pub name: String,
    /// The page's root element (always of type `page`).
    pub root_element: ElementId,
    /// Horizontal placement on the infinite canvas.
    pub x: f32,
    /// Vertical placement on the infinite canvas.
    pub y: f32,
    /// Baseline page width in canvas units.
    pub width: f32,
    /// Baseline page height in canvas units.
    pub height: f32,
}

/// Patch applied to a page by [`crate::Document::update_page`].
///
/// Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePatch {
    /// New page name.
    pub name: Option<String>,
    /// New baseline width.
    pub width: Option<f32>,
    /// New baseline height.
    pub height: Option<f32>,
}

/// A named viewport profile with an optional style-override layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Unique identifier.
    pub id: BreakpointId,
    /// Breakpoint name shown in the toolbar.
    pub name: String,
    /// Viewport width in canvas units.
    pub width: f32,
    /// Viewport height in canvas units.
    pub height: f32,
    /// Icon name shown next to the breakpoint.
    pub icon: String,
    /// Whether this is the default (base) breakpoint.
    pub is_default: bool,
}

impl Breakpoint {
    /// The standard desktop/tablet/mobile breakpoint set.
    #[must_use]
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self {
                id: BreakpointId::new(),
                name: "Desktop".to_string(),
                width: 1200.0,
                height: 800.0,
                icon: "monitor".to_string(),
                is_default: true,
            },
            Self {
                id: BreakpointId::new(),
                name: "Tablet".to_string(),
                width: 768.0,
                height: 1024.0,
                icon: "tablet".to_string(),
                is_default: false,
            },
            Self {
                id: BreakpointId::new(),
                name: "Mobile".to_string(),
                width: 375.0,
                height: 812.0,
                icon: "smartphone".to_string(),
                is_default: false,
            },
        ]
    }
}
