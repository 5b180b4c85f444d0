//! Error types for document operations.

use thiserror::Error;

/// Result type for document operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in document operations.
///
/// Interactive mutation paths are defensive no-ops on bad input and never
/// surface these; they exist for the validation and serialization surfaces.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Page not found in the document.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// The element graph violates the forest invariants.
    #[error("Invalid element tree: {0}")]
    InvalidTree(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
