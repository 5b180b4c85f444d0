//! Declarative per-element style records.
//!
//! A [`StyleSheet`] is a partial record: every field is optional, and a sheet
//! only speaks for the properties it defines. Breakpoint overrides are plain
//! sheets layered over the base sheet by shallow per-property merge.

use serde::{Deserialize, Serialize};

/// Per-axis sizing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Use the element's explicit baseline size.
    #[default]
    Fixed,
    /// Stretch to the available space in the parent.
    Fill,
    /// Shrink to the intrinsic content size.
    Hug,
}

/// How a container arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    /// Children use free `(x, y)` positioning.
    Block,
    /// Children flow along a flex axis.
    Flex,
    /// Children flow in a grid.
    Grid,
}

impl Display {
    /// Whether children participate in auto layout rather than free
    /// positioning.
    #[must_use]
    pub fn is_auto_layout(self) -> bool {
        matches!(self, Self::Flex | Self::Grid)
    }
}

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    /// Children flow left to right.
    Row,
    /// Children flow top to bottom.
    #[default]
    Column,
}

impl FlexDirection {
    /// The perpendicular axis.
    #[must_use]
    pub fn cross(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// Main-axis distribution of flex children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// Pack children at the start.
    #[default]
    Start,
    /// Center children.
    Center,
    /// Pack children at the end.
    End,
    /// Distribute remaining space between children.
    SpaceBetween,
}

/// Cross-axis alignment of flex children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// Align children at the start.
    #[default]
    Start,
    /// Center children.
    Center,
    /// Align children at the end.
    End,
    /// Stretch children across the axis.
    Stretch,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned text.
    #[default]
    Left,
    /// Centered text.
    Center,
    /// Right-aligned text.
    Right,
}

/// A partial style record for one element.
///
/// All fields are optional; unset fields fall through to the layer below
/// (breakpoint override -> base -> engine defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSheet {
    /// Horizontal sizing mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_x: Option<ResizeMode>,
    /// Vertical sizing mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_y: Option<ResizeMode>,
    /// Child arrangement mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    /// Flex main axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<FlexDirection>,
    /// Main-axis distribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<Justify>,
    /// Cross-axis alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<Align>,
    /// Gap between flex children, canvas units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f32>,
    /// Scalar padding applied to any edge without its own value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    /// Top padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f32>,
    /// Right padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f32>,
    /// Bottom padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f32>,
    /// Left padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f32>,
    /// Background color as a hex string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Foreground/text color as a hex string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Font size in canvas units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font weight (100-900).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    /// Text alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Corner radius in canvas units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    /// Opacity, 0..=1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

impl StyleSheet {
    /// Shallow-merge another sheet over this one.
    ///
    /// Only the properties the other sheet defines are taken; everything else
    /// is left untouched.
    pub fn merge_from(&mut self, layer: &StyleSheet) {
        if layer.resize_x.is_some() {
            self.resize_x = layer.resize_x;
        }
        if layer.resize_y.is_some() {
            self.resize_y = layer.resize_y;
        }
        if layer.display.is_some() {
            self.display = layer.display;
        }
        if layer.flex_direction.is_some() {
            self.flex_direction = layer.flex_direction;
        }
        if layer.justify_content.is_some() {
            self.justify_content = layer.justify_content;
        }
        if layer.align_items.is_some() {
            self.align_items = layer.align_items;
        }
        if layer.gap.is_some() {
            self.gap = layer.gap;
        }
        if layer.padding.is_some() {
            self.padding = layer.padding;
        }
        if layer.padding_top.is_some() {
            self.padding_top = layer.padding_top;
        }
        if layer.padding_right.is_some() {
            self.padding_right = layer.padding_right;
        }
        if layer.padding_bottom.is_some() {
            self.padding_bottom = layer.padding_bottom;
        }
        if layer.padding_left.is_some() {
            self.padding_left = layer.padding_left;
        }
        if layer.background.is_some() {
            self.background.clone_from(&layer.background);
        }
        if layer.color.is_some() {
            self.color.clone_from(&layer.color);
        }
        if layer.font_size.is_some() {
            self.font_size = layer.font_size;
        }
        if layer.font_weight.is_some() {
            self.font_weight = layer.font_weight;
        }
        if layer.text_align.is_some() {
            self.text_align = layer.text_align;
        }
        if layer.corner_radius.is_some() {
            self.corner_radius = layer.corner_radius;
        }
        if layer.opacity.is_some() {
            self.opacity = layer.opacity;
        }
    }

    /// Whether children of an element with this effective sheet participate
    /// in auto layout.
    #[must_use]
    pub fn has_auto_layout(&self) -> bool {
        self.display.is_some_and(Display::is_auto_layout)
    }

    /// The effective flex direction, defaulting to column flow.
    #[must_use]
    pub fn direction(&self) -> FlexDirection {
        self.flex_direction.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_takes_only_defined_properties() {
        let mut base = StyleSheet {
            background: Some("#ffffff".to_string()),
            font_size: Some(16.0),
            ..StyleSheet::default()
        };
        let layer = StyleSheet {
            font_size: Some(24.0),
            ..StyleSheet::default()
        };

        base.merge_from(&layer);

        assert_eq!(base.font_size, Some(24.0));
        assert_eq!(base.background.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_merge_overwrites_sizing_modes() {
        let mut base = StyleSheet {
            resize_x: Some(ResizeMode::Fixed),
            ..StyleSheet::default()
        };
        let layer = StyleSheet {
            resize_x: Some(ResizeMode::Fill),
            ..StyleSheet::default()
        };
        base.merge_from(&layer);
        assert_eq!(base.resize_x, Some(ResizeMode::Fill));
    }

    #[test]
    fn test_auto_layout_detection() {
        let mut sheet = StyleSheet::default();
        assert!(!sheet.has_auto_layout());
        sheet.display = Some(Display::Flex);
        assert!(sheet.has_auto_layout());
        sheet.display = Some(Display::Block);
        assert!(!sheet.has_auto_layout());
    }

    #[test]
    fn test_serde_shape_is_camel_case() {
        let sheet = StyleSheet {
            resize_x: Some(ResizeMode::Fill),
            flex_direction: Some(FlexDirection::Row),
            ..StyleSheet::default()
        };
        let json = serde_json::to_string(&sheet).expect("serialize");
        assert!(json.contains("\"resizeX\":\"fill\""));
        assert!(json.contains("\"flexDirection\":\"row\""));
    }
}
