//! Fill/Hug/Fixed sizing and flex-child geometry.
//!
//! [`compute_layout`] turns one element's effective style plus its parent's
//! layout context into concrete layout instructions. It is a pure function;
//! callers re-run it whenever geometry, style, selection, hover, or the
//! parent context change and may cache the [`PartialEq`] result otherwise.

use serde::{Deserialize, Serialize};
use studio_core::{
    Align, CanvasElement, Display, FlexDirection, Justify, ResizeMode, StyleSheet,
};

/// Outline width for selected elements.
const SELECTED_OUTLINE: f32 = 2.0;

/// Outline width for hovered, unselected elements.
const HOVER_OUTLINE: f32 = 1.0;

/// How an element is placed relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// The parent lacks auto layout; the element uses its own `(x, y)`.
    Absolute,
    /// The element participates in the parent's flex/grid flow.
    Flow,
}

/// A resolved size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeValue {
    /// Explicit pixel value.
    Px(f32),
    /// Percentage of the parent's box.
    Percent(f32),
    /// Intrinsic content size.
    Auto,
    /// Content-fitting size; unlike `Auto` it hugs multi-line content.
    FitContent,
    /// No explicit size; the flex algorithm distributes the space.
    Flex,
}

/// Flex-basis of a flex child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexBasis {
    /// Basis zero: the child's share comes entirely from `flex-grow`.
    Zero,
    /// Basis auto: start from the child's intrinsic size.
    Auto,
}

/// Flex-child tuple applied to elements inside auto-layout parents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexChild {
    /// Growth weight.
    pub grow: f32,
    /// Shrink weight.
    pub shrink: f32,
    /// Starting basis.
    pub basis: FlexBasis,
}

impl FlexChild {
    /// The filling child: grows and shrinks from a zero basis.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            grow: 1.0,
            shrink: 1.0,
            basis: FlexBasis::Zero,
        }
    }

    /// The rigid child: keeps its intrinsic size.
    #[must_use]
    pub const fn rigid() -> Self {
        Self {
            grow: 0.0,
            shrink: 0.0,
            basis: FlexBasis::Auto,
        }
    }
}

/// Resolved per-edge padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
    /// Left inset.
    pub left: f32,
}

impl EdgeInsets {
    /// Resolve per-edge paddings, each falling back to the scalar `padding`.
    #[must_use]
    pub fn from_styles(styles: &StyleSheet) -> Self {
        let fallback = styles.padding.unwrap_or(0.0);
        Self {
            top: styles.padding_top.unwrap_or(fallback),
            right: styles.padding_right.unwrap_or(fallback),
            bottom: styles.padding_bottom.unwrap_or(fallback),
            left: styles.padding_left.unwrap_or(fallback),
        }
    }
}

/// Selection/hover outline.
///
/// An outline, never a shadow: ancestors may clip overflow, which would clip
/// a shadow but not an outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineSpec {
    /// Stroke width in screen pixels.
    pub width: f32,
    /// Offset from the border box; negative values inset the stroke.
    pub offset: f32,
}

/// Flow properties an auto-layout container applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerFlow {
    /// Flex or grid flow.
    pub display: Display,
    /// Main axis.
    pub direction: FlexDirection,
    /// Gap between children.
    pub gap: f32,
    /// Main-axis distribution.
    pub justify: Justify,
    /// Cross-axis alignment.
    pub align: Align,
}

/// The layout context an element inherits from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentContext {
    /// Whether the parent arranges children in flex/grid flow.
    pub auto_layout: bool,
    /// The parent's main axis (meaningful only under auto layout).
    pub direction: FlexDirection,
}

impl ParentContext {
    /// Context under a free-positioning parent (or no parent at all).
    #[must_use]
    pub const fn free() -> Self {
        Self {
            auto_layout: false,
            direction: FlexDirection::Column,
        }
    }

    /// Context under an auto-layout parent with the given main axis.
    #[must_use]
    pub const fn flow(direction: FlexDirection) -> Self {
        Self {
            auto_layout: true,
            direction,
        }
    }

    /// Derive the context a container hands to its children from the
    /// container's effective style.
    #[must_use]
    pub fn of(effective: &StyleSheet) -> Self {
        if effective.has_auto_layout() {
            Self::flow(effective.direction())
        } else {
            Self::free()
        }
    }
}

/// Concrete layout instructions for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInstructions {
    /// Placement mode.
    pub position: PositionMode,
    /// `(x, y)` offset; present only in absolute mode.
    pub offset: Option<(f32, f32)>,
    /// Resolved horizontal size.
    pub width: SizeValue,
    /// Resolved vertical size.
    pub height: SizeValue,
    /// Flex-child tuple; present only under an auto-layout parent.
    pub flex: Option<FlexChild>,
    /// Whether the element stretches across the parent's cross axis.
    pub stretch_cross_axis: bool,
    /// Resolved padding.
    pub padding: EdgeInsets,
    /// Selection/hover outline, if any.
    pub outline: Option<OutlineSpec>,
    /// Flow the element applies to its own children, when it has auto
    /// layout.
    pub flow: Option<ContainerFlow>,
}

/// Resolve the sizing mode for one axis.
fn mode_for(explicit: Option<ResizeMode>) -> ResizeMode {
    explicit.unwrap_or(ResizeMode::Fixed)
}

/// Compute layout instructions for an element.
///
/// `parent` describes the positioning regime the element lives in; `selected`
/// and `hovered` drive the outline. Pure function of its inputs.
#[must_use]
pub fn compute_layout(
    element: &CanvasElement,
    effective: &StyleSheet,
    parent: ParentContext,
    selected: bool,
    hovered: bool,
) -> LayoutInstructions {
    let position = if parent.auto_layout {
        PositionMode::Flow
    } else {
        PositionMode::Absolute
    };
    let offset = match position {
        PositionMode::Absolute => Some((element.position.x, element.position.y)),
        PositionMode::Flow => None,
    };

    let x_mode = mode_for(effective.resize_x);
    let y_mode = mode_for(effective.resize_y);
    let x_is_main = parent.direction == FlexDirection::Row;

    let width = match x_mode {
        ResizeMode::Fill if parent.auto_layout => {
            if x_is_main {
                SizeValue::Flex
            } else {
                SizeValue::Percent(100.0)
            }
        }
        ResizeMode::Hug => SizeValue::Auto,
        _ => {
            // Text in a column keeps the full column width so text alignment
            // stays meaningful, unless an explicit fill/hug says otherwise.
            if element.element_type.is_text()
                && parent.auto_layout
                && parent.direction == FlexDirection::Column
            {
                SizeValue::Percent(100.0)
            } else {
                SizeValue::Px(element.size.width)
            }
        }
    };

    let height = match y_mode {
        ResizeMode::Fill if parent.auto_layout => {
            if x_is_main {
                SizeValue::Percent(100.0)
            } else {
                SizeValue::Flex
            }
        }
        // fit-content, not auto, so multi-line content hugs correctly.
        ResizeMode::Hug => SizeValue::FitContent,
        _ => SizeValue::Px(element.size.height),
    };

    let (flex, stretch_cross_axis) = if parent.auto_layout {
        let main_mode = if x_is_main { x_mode } else { y_mode };
        let cross_mode = if x_is_main { y_mode } else { x_mode };
        let flex = if main_mode == ResizeMode::Fill {
            FlexChild::fill()
        } else {
            FlexChild::rigid()
        };
        (Some(flex), cross_mode == ResizeMode::Fill)
    } else {
        (None, false)
    };

    let outline = if element.is_page_root() {
        // Pages get a page-level overlay instead of a direct outline.
        None
    } else if selected {
        Some(OutlineSpec {
            width: SELECTED_OUTLINE,
            offset: -SELECTED_OUTLINE,
        })
    } else if hovered {
        Some(OutlineSpec {
            width: HOVER_OUTLINE,
            offset: 0.0,
        })
    } else {
        None
    };

    let flow = effective.has_auto_layout().then(|| ContainerFlow {
        display: effective.display.unwrap_or(Display::Flex),
        direction: effective.direction(),
        gap: effective.gap.unwrap_or(0.0),
        justify: effective.justify_content.unwrap_or_default(),
        align: effective.align_items.unwrap_or_default(),
    });

    LayoutInstructions {
        position,
        offset,
        width,
        height,
        flex,
        stretch_cross_axis,
        padding: EdgeInsets::from_styles(effective),
        outline,
        flow,
    }
}
