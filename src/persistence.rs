//! Persistence adapter for the image collection.
//!
//! The whole collection is stored as one JSON array under a single key. Every
//! save overwrites the full blob; there is no incremental diffing.

use crate::error::GalleryError;
use crate::model::ImageRecord;
use crate::storage::KeyValueStorage;

/// Default storage key for the gallery collection.
pub const DEFAULT_STORAGE_KEY: &str = "galleryImages";

/// Serializes the collection to and from a key-value store.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> PersistenceAdapter<S> {
    /// Create an adapter writing under [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create an adapter writing under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The key the collection is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize the full collection and overwrite the stored blob.
    pub fn save(&self, records: &[ImageRecord]) -> Result<(), GalleryError> {
        let json = serde_json::to_string(records)?;
        self.storage.set_item(&self.key, &json)?;
        log::debug!(
            "💾 Saved {} images ({} bytes) under '{}'",
            records.len(),
            json.len(),
            self.key
        );
        Ok(())
    }

    /// Load the stored collection.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<Vec<ImageRecord>>, GalleryError> {
        let Some(json) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };

        let records: Vec<ImageRecord> = serde_json::from_str(&json)
            .map_err(|e| GalleryError::persistence_read(format!("corrupt gallery data: {}", e)))?;
        Ok(Some(records))
    }

    /// Load the stored collection, treating a missing or corrupt blob as empty.
    pub fn load(&self) -> Vec<ImageRecord> {
        match self.try_load() {
            Ok(Some(records)) => {
                log::info!("💾 Loaded {} images from '{}'", records.len(), self.key);
                records
            }
            Ok(None) => {
                log::debug!("No saved gallery found under '{}'", self.key);
                Vec::new()
            }
            Err(e) => {
                log::warn!("Could not load saved gallery, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove the stored blob.
    pub fn clear(&self) -> Result<(), GalleryError> {
        self.storage.remove_item(&self.key)
    }
}
