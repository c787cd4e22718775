//! Storage abstraction for persistence.
//!
//! A stored document is its stroke sequence, serialized as JSON.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::shapes::Stroke;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
pub trait Storage: Send + Sync {
    /// Save a document's strokes.
    fn save(&self, id: &str, strokes: &[Stroke]) -> StorageResult<()>;

    /// Load a document's strokes.
    fn load(&self, id: &str) -> StorageResult<Vec<Stroke>>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all document IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// Serialize strokes the way every backend stores them.
pub fn strokes_to_json(strokes: &[Stroke]) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(strokes)?)
}

pub fn strokes_from_json(json: &str) -> StorageResult<Vec<Stroke>> {
    Ok(serde_json::from_str(json)?)
}
