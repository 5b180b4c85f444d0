//! Canvas elements - the building blocks of page layouts.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::page::BreakpointId;
use crate::style::{Display, FlexDirection, StyleSheet};

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tag of a canvas element.
///
/// Containers arrange children (either free-positioned or in flex flow);
/// leaves carry content payloads such as text or an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// The root of a page. Exactly one per page, never nested.
    Page,
    /// A generic free-form container.
    Frame,
    /// A vertical auto-layout container.
    Stack,
    /// A grid-flow container.
    Grid,
    /// A full-width page section.
    Section,
    /// A generic grouping container.
    Container,
    /// A horizontal auto-layout container.
    Row,
    /// A plain box container.
    Box,
    /// Body text.
    Text,
    /// A heading.
    Heading,
    /// A paragraph of text.
    Paragraph,
    /// A clickable button.
    Button,
    /// A hyperlink.
    Link,
    /// A raster or vector image.
    Image,
    /// A named icon glyph.
    Icon,
    /// An embedded video.
    Video,
    /// A text input field.
    Input,
}

impl ElementType {
    /// Whether this type may hold children.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::Page
                | Self::Frame
                | Self::Stack
                | Self::Grid
                | Self::Section
                | Self::Container
                | Self::Row
                | Self::Box
        )
    }

    /// Whether this type is a leaf (carries content, never children).
    #[must_use]
    pub fn is_leaf(self) -> bool {
        !self.is_container()
    }

    /// Whether this type renders flowing text.
    ///
    /// Text types nested in a column-flow parent stretch to the full column
    /// width by default so text alignment stays meaningful.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::Heading | Self::Paragraph)
    }

    /// Whether double-clicking this type enters inline text editing.
    #[must_use]
    pub fn supports_text_editing(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Heading | Self::Paragraph | Self::Button | Self::Link | Self::Input
        )
    }

    /// The display name used for freshly created elements.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Page => "Page",
            Self::Frame => "Frame",
            Self::Stack => "Stack",
            Self::Grid => "Grid",
            Self::Section => "Section",
            Self::Container => "Container",
            Self::Row => "Row",
            Self::Box => "Box",
            Self::Text => "Text",
            Self::Heading => "Heading",
            Self::Paragraph => "Paragraph",
            Self::Button => "Button",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Icon => "Icon",
            Self::Video => "Video",
            Self::Input => "Input",
        }
    }

    /// The lowercase tag used in the JSON exchange format.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Frame => "frame",
            Self::Stack => "stack",
            Self::Grid => "grid",
            Self::Section => "section",
            Self::Container => "container",
            Self::Row => "row",
            Self::Box => "box",
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Button => "button",
            Self::Link => "link",
            Self::Image => "image",
            Self::Icon => "icon",
            Self::Video => "video",
            Self::Input => "input",
        }
    }

    /// Default style sheet for a freshly created element of this type.
    ///
    /// This is the single type -> behavior table: page-like containers start
    /// in column flex flow, rows in row flex flow, everything else in free
    /// positioning.
    #[must_use]
    pub fn default_styles(self) -> StyleSheet {
        let mut styles = StyleSheet::default();
        match self {
            Self::Page | Self::Stack | Self::Section => {
                styles.display = Some(Display::Flex);
                styles.flex_direction = Some(FlexDirection::Column);
            }
            Self::Row => {
                styles.display = Some(Display::Flex);
                styles.flex_direction = Some(FlexDirection::Row);
            }
            Self::Grid => {
                styles.display = Some(Display::Grid);
            }
            Self::Heading => {
                styles.font_size = Some(32.0);
                styles.font_weight = Some(700);
            }
            Self::Paragraph => {
                styles.font_size = Some(16.0);
            }
            _ => {}
        }
        styles
    }

    /// Default size for a freshly created element of this type.
    #[must_use]
    pub fn default_size(self) -> Size {
        match self {
            Self::Page => Size::new(1200.0, 800.0),
            Self::Icon => Size::new(24.0, 24.0),
            Self::Button => Size::new(120.0, 40.0),
            Self::Input => Size::new(200.0, 36.0),
            Self::Text | Self::Link => Size::new(160.0, 24.0),
            Self::Heading => Size::new(320.0, 40.0),
            Self::Paragraph => Size::new(320.0, 72.0),
            Self::Image | Self::Video => Size::new(240.0, 180.0),
            _ => Size::new(200.0, 200.0),
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ElementType {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "frame" => Ok(Self::Frame),
            "stack" => Ok(Self::Stack),
            "grid" => Ok(Self::Grid),
            "section" => Ok(Self::Section),
            "container" => Ok(Self::Container),
            "row" => Ok(Self::Row),
            "box" => Ok(Self::Box),
            "text" => Ok(Self::Text),
            "heading" => Ok(Self::Heading),
            "paragraph" => Ok(Self::Paragraph),
            "button" => Ok(Self::Button),
            "link" => Ok(Self::Link),
            "image" => Ok(Self::Image),
            "icon" => Ok(Self::Icon),
            "video" => Ok(Self::Video),
            "input" => Ok(Self::Input),
            other => Err(UnknownTypeTag(other.to_string())),
        }
    }
}

/// Error returned when a type tag does not name a known element type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown element type tag: {0}")]
pub struct UnknownTypeTag(pub String);

/// A position on the canvas, in canvas units.
///
/// Only meaningful while the owning element is free-positioned; elements in
/// flex flow derive their placement from the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X position in canvas units.
    pub x: f32,
    /// Y position in canvas units.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The fixed-mode baseline size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in canvas units.
    pub width: f32,
    /// Height in canvas units.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

/// Crop rectangle for image content, normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge, 0..=1.
    pub x: f32,
    /// Top edge, 0..=1.
    pub y: f32,
    /// Cropped width fraction.
    pub width: f32,
    /// Cropped height fraction.
    pub height: f32,
}

/// A canvas element: one node in a page's element tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Element tag.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Parent element. Absent only for page roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    /// Ordered children. The order is the auto-layout flow order.
    #[serde(default)]
    pub children: Vec<ElementId>,
    /// Free-positioning coordinates, relative to the parent.
    #[serde(default)]
    pub position: Position,
    /// Fixed-mode baseline size.
    #[serde(default)]
    pub size: Size,
    /// Base style record.
    #[serde(default)]
    pub styles: StyleSheet,
    /// Per-breakpoint style overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub responsive_styles: HashMap<BreakpointId, StyleSheet>,
    /// Text payload for text-bearing leaf types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Source URI for image/video/icon leaf types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Optional crop rectangle for image content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    /// Whether the element is rendered.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the element ignores pointer interaction.
    #[serde(default)]
    pub locked: bool,
    /// Human-readable layer name.
    pub name: String,
}

const fn default_true() -> bool {
    true
}

impl CanvasElement {
    /// Create a new element of the given type with type defaults applied.
    #[must_use]
    pub fn new(element_type: ElementType) -> Self {
        Self {
            id: ElementId::new(),
            element_type,
            parent: None,
            children: Vec::new(),
            position: Position::default(),
            size: element_type.default_size(),
            styles: element_type.default_styles(),
            responsive_styles: HashMap::new(),
            content: None,
            src: None,
            crop: None,
            visible: true,
            locked: false,
            name: element_type.display_name().to_string(),
        }
    }

    /// Set the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the free position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the baseline size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether this element is a page root.
    #[must_use]
    pub fn is_page_root(&self) -> bool {
        self.element_type == ElementType::Page
    }
}
