//! Pointer input types fed in by the host event loop.

use serde::{Deserialize, Serialize};

/// A pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPoint {
    /// X position in screen pixels.
    pub x: f32,
    /// Y position in screen pixels.
    pub y: f32,
}

impl PointerPoint {
    /// Create a new pointer position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Cmd (macOS) or Ctrl (elsewhere) held.
    pub command: bool,
}

impl ClickModifiers {
    /// No modifiers held.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            shift: false,
            command: false,
        }
    }

    /// Shift held.
    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            command: false,
        }
    }

    /// Cmd/Ctrl held.
    #[must_use]
    pub const fn command() -> Self {
        Self {
            shift: false,
            command: true,
        }
    }
}

/// The active canvas tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select and manipulate elements; background drags marquee-select.
    #[default]
    Select,
    /// Pan the canvas; pointer drags translate the viewport.
    Pan,
}
