//! Error types for gallery operations.
//!
//! None of these are fatal. The store degrades to session-only state when
//! persistence fails, and the ingestion pipeline skips files it cannot read.

use thiserror::Error;

use crate::model::ImageId;

/// Errors that can occur while ingesting, storing or persisting images.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// A record with this id is already in the collection
    #[error("Duplicate image id: {id}")]
    DuplicateId {
        /// The colliding id
        id: ImageId,
    },

    /// The key-value store rejected a write (quota exceeded, storage disabled)
    #[error("Failed to persist gallery: {message}")]
    PersistenceWrite {
        /// Description of the storage failure
        message: String,
    },

    /// The stored blob could not be read or parsed
    #[error("Failed to read persisted gallery: {message}")]
    PersistenceRead {
        /// Description of the read failure
        message: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Malformed data URI or base64 payload
    #[error("Codec error: {0}")]
    Codec(String),

    /// The file contents could not be read
    #[error("Failed to read file '{name}': {message}")]
    FileRead {
        /// Name of the file being read
        name: String,
        /// Description of the read failure
        message: String,
    },

    /// A browser DOM call failed
    #[error("DOM error: {0}")]
    Dom(String),
}

impl GalleryError {
    /// Create a persistence write error with a message.
    pub fn persistence_write(message: impl Into<String>) -> Self {
        Self::PersistenceWrite {
            message: message.into(),
        }
    }

    /// Create a persistence read error with a message.
    pub fn persistence_read(message: impl Into<String>) -> Self {
        Self::PersistenceRead {
            message: message.into(),
        }
    }

    /// Create a file read error.
    pub fn file_read(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileRead {
            name: name.into(),
            message: message.into(),
        }
    }
}
