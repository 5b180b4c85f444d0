//! # Saorsa Studio Core
//!
//! Canonical document model for the visual page-layout editor: the element
//! forest, pages and breakpoints, the named mutation surface, snapshot
//! history, and the JSON exchange format shared with the AI layer and the
//! clipboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                studio-core                  │
//! ├──────────────────────┬──────────────────────┤
//! │  Document            │  Exchange            │
//! │  - element forest    │  - nested JSON shape │
//! │  - pages/breakpoints │  - ingest validation │
//! │  - mutation surface  │  - clipboard         │
//! ├──────────────────────┼──────────────────────┤
//! │  History             │  DocumentStore       │
//! │  - snapshots         │  - named documents   │
//! │  - undo/redo cursor  │  - JSON persistence  │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clipboard;
pub mod document;
pub mod element;
pub mod error;
pub mod exchange;
pub mod history;
pub mod page;
pub mod store;
pub mod style;

pub use clipboard::Clipboard;
pub use document::{Document, DropSide};
pub use element::{CanvasElement, CropRect, ElementId, ElementType, Position, Size};
pub use error::{CoreError, CoreResult};
pub use exchange::{ExchangeNode, IngestError};
pub use history::History;
pub use page::{Breakpoint, BreakpointId, CanvasPage, PageId, PagePatch};
pub use store::{DocumentStore, StoreError, DEFAULT_DOCUMENT};
pub use style::{
    Align, Display, FlexDirection, Justify, ResizeMode, StyleSheet, TextAlign,
};

/// Studio core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
