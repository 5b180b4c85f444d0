//! # Saorsa Studio Layout
//!
//! The pure read path of the layout engine: breakpoint style resolution,
//! Fill/Hug/Fixed sizing into concrete layout instructions, and the pan/zoom
//! viewport math shared by hit-testing and rendering.
//!
//! Everything here is a function of the document plus interaction state;
//! nothing in this crate mutates the document.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geometry;
pub mod resolver;
pub mod viewport;

pub use geometry::{
    compute_layout, ContainerFlow, EdgeInsets, FlexBasis, FlexChild, LayoutInstructions,
    OutlineSpec, ParentContext, PositionMode, SizeValue,
};
pub use resolver::{resolve_styles, StyleResolver};
pub use viewport::{Rect, Viewport};

/// Studio layout version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
