//! # Saorsa Studio Interact
//!
//! The pointer-facing half of the layout engine: click resolution with
//! parent-first selection, marquee hit-testing in the panned/zoomed canvas,
//! and the free-move/reorder drag state machine. Transient gesture state
//! lives in the [`InteractionOverlay`]; the document commits once per
//! completed gesture.
//!
//! ```text
//! pointer events ──► SelectionEngine ──┐
//!                                      ├──► Document mutation ──► History
//!                ──► DragController ───┘
//!                         │
//!                         ▼ (per frame)
//!                  InteractionOverlay ──► renderer
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod drag;
pub mod input;
pub mod overlay;
pub mod selection;

pub use drag::{DragCommit, DragController};
pub use input::{ClickModifiers, PointerPoint, Tool};
pub use overlay::InteractionOverlay;
pub use selection::{ClickOutcome, EscapeOutcome, SelectionEngine};

/// Studio interact version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
