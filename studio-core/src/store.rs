//! Shared document storage.
//!
//! Provides a thread-safe [`DocumentStore`] holding named documents, so the
//! editor shell, keyboard layer, and AI integration all mutate one explicit
//! state object instead of an ambient global. Optionally persists documents
//! as JSON files in a data directory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::document::Document;

/// Default document identifier.
pub const DEFAULT_DOCUMENT: &str = "default";

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Thread-safe, optionally persistent document storage.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<String, Document>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl DocumentStore {
    /// Create a store with a default single-page document (no persistence).
    #[must_use]
    pub fn new() -> Self {
        let mut documents = HashMap::new();
        documents.insert(DEFAULT_DOCUMENT.to_string(), Document::with_page("Page 1"));
        Self {
            documents: Arc::new(RwLock::new(documents)),
            data_dir: None,
        }
    }

    /// Create a store with filesystem persistence.
    ///
    /// Documents are saved as JSON files in `data_dir`, which is created if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        let mut documents = HashMap::new();
        documents.insert(DEFAULT_DOCUMENT.to_string(), Document::with_page("Page 1"));
        Ok(Self {
            documents: Arc::new(RwLock::new(documents)),
            data_dir: Some(data_dir),
        })
    }

    /// Get a clone of a document by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Document> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        documents.get(name).cloned()
    }

    /// Replace a document wholesale, creating it if absent.
    pub fn replace(&self, name: &str, document: Document) {
        {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            documents.insert(name.to_string(), document);
        }
        self.persist(name);
    }

    /// Mutate a document in place through a closure.
    ///
    /// The closure runs under the write lock, so the mutation is atomic with
    /// respect to every other accessor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if the document does not
    /// exist.
    pub fn update<F>(&self, name: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Document),
    {
        {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let document = documents
                .get_mut(name)
                .ok_or_else(|| StoreError::DocumentNotFound(name.to_string()))?;
            f(document);
        }
        self.persist(name);
        Ok(())
    }

    /// Names of all loaded documents.
    #[must_use]
    pub fn document_names(&self) -> Vec<String> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        documents.keys().cloned().collect()
    }

    /// Save a document to disk as JSON. No-op without a data directory.
    fn persist(&self, name: &str) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let Some(document) = self.get(name) else {
            return;
        };
        let json = match serde_json::to_string_pretty(&document) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize document {name}: {e}");
                return;
            }
        };
        let path = data_dir.join(format!("{}.json", sanitize_filename(name)));
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("Failed to persist document {name} to {}: {e}", path.display());
        }
    }

    /// Load a document from disk into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured, the file is
    /// missing, or the JSON does not parse.
    pub fn load_from_disk(&self, name: &str) -> Result<(), StoreError> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| StoreError::Serialization("No data directory configured".into()))?;
        let path = data_dir.join(format!("{}.json", sanitize_filename(name)));
        let contents = std::fs::read_to_string(&path)?;
        let document: Document = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        document
            .validate()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        documents.insert(name.to_string(), document);
        Ok(())
    }
}

/// Sanitize a document name for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
