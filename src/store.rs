//! The ordered image collection and its write-through persistence.
//!
//! [`ImageStore`] is the only writer of persisted gallery state. Every
//! mutation updates memory first, then saves the full collection. A failed
//! save is logged and otherwise ignored: the in-memory collection stays
//! authoritative for the rest of the session.

use std::collections::HashSet;

use crate::error::GalleryError;
use crate::model::{ImageId, ImageRecord};
use crate::persistence::PersistenceAdapter;
use crate::storage::KeyValueStorage;

/// Owns the ordered collection of image records.
#[derive(Debug)]
pub struct ImageStore<S: KeyValueStorage> {
    /// Records in insertion (display) order
    records: Vec<ImageRecord>,
    persistence: PersistenceAdapter<S>,
}

impl<S: KeyValueStorage> ImageStore<S> {
    /// Create an empty store backed by the given adapter.
    pub fn new(persistence: PersistenceAdapter<S>) -> Self {
        Self {
            records: Vec::new(),
            persistence,
        }
    }

    /// Create a store and hydrate it from whatever the adapter has saved.
    pub fn load(persistence: PersistenceAdapter<S>) -> Self {
        let records = persistence.load();
        let mut store = Self::new(persistence);
        store.hydrate(records);
        store
    }

    /// The persistence adapter.
    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Replace the collection wholesale without writing back.
    ///
    /// Records repeating an earlier id are dropped.
    pub fn hydrate(&mut self, records: Vec<ImageRecord>) {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();

        let dropped = total - self.records.len();
        if dropped > 0 {
            log::warn!("Dropped {} saved images with duplicate ids", dropped);
        }
        log::debug!("Hydrated store with {} images", self.records.len());
    }

    /// Append a record to the end of the collection and persist.
    pub fn add(&mut self, record: ImageRecord) -> Result<(), GalleryError> {
        if self.contains(&record.id) {
            return Err(GalleryError::DuplicateId { id: record.id });
        }

        log::info!("🖼️ Added '{}' ({})", record.name, record.size_label);
        self.records.push(record);
        self.persist();
        Ok(())
    }

    /// Set the caption of the record with `id` and persist.
    ///
    /// Returns false (and writes nothing) if no record has that id.
    pub fn update_caption(&mut self, id: &ImageId, caption: impl Into<String>) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            log::debug!("Caption update for unknown image {}", id);
            return false;
        };

        record.caption = caption.into();
        self.persist();
        true
    }

    /// Remove the record with `id` and persist.
    ///
    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: &ImageId) -> bool {
        let Some(index) = self.records.iter().position(|r| &r.id == id) else {
            log::debug!("Delete for unknown image {}", id);
            return false;
        };

        let removed = self.records.remove(index);
        log::info!("🗑️ Deleted '{}'", removed.name);
        self.persist();
        true
    }

    /// The current collection in display order.
    pub fn list(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Get a record by id.
    pub fn get(&self, id: &ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Check if a record with `id` exists.
    pub fn contains(&self, id: &ImageId) -> bool {
        self.get(id).is_some()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.records) {
            log::warn!("Could not save gallery, changes are kept for this session only: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DEFAULT_STORAGE_KEY;
    use crate::storage::MemoryStorage;

    fn record(id: &str) -> ImageRecord {
        ImageRecord::with_id(
            ImageId::from(id),
            "data:image/png;base64,AA==",
            format!("{}.png", id),
            "1 Bytes",
            "01/02/2024",
        )
    }

    fn new_store() -> (ImageStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = ImageStore::new(PersistenceAdapter::new(storage.clone()));
        (store, storage)
    }

    fn ids(store: &ImageStore<MemoryStorage>) -> Vec<&str> {
        store.list().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (mut store, _) = new_store();
        for id in ["c", "a", "b"] {
            store.add(record(id)).unwrap();
        }
        assert_eq!(ids(&store), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let (mut store, _) = new_store();
        store.add(record("a")).unwrap();

        let result = store.add(record("a"));
        assert!(matches!(result, Err(GalleryError::DuplicateId { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_persists() {
        let (mut store, storage) = new_store();
        store.add(record("a")).unwrap();

        let saved = PersistenceAdapter::new(storage).load();
        assert_eq!(saved, store.list());
    }

    #[test]
    fn test_length_tracks_adds_minus_deletes() {
        let (mut store, _) = new_store();
        for id in ["a", "b", "c", "d"] {
            store.add(record(id)).unwrap();
        }
        assert!(store.delete(&ImageId::from("b")));
        assert!(!store.delete(&ImageId::from("missing")));
        assert!(store.delete(&ImageId::from("d")));

        assert_eq!(store.len(), 2);
        assert_eq!(ids(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_update_caption_changes_only_that_caption() {
        let (mut store, storage) = new_store();
        store.add(record("a")).unwrap();
        store.add(record("b")).unwrap();
        let before = store.list().to_vec();

        assert!(store.update_caption(&ImageId::from("a"), "hello"));

        let after = store.list();
        assert_eq!(after[0].caption, "hello");
        assert_eq!(after[0].data, before[0].data);
        assert_eq!(after[0].name, before[0].name);
        assert_eq!(after[0].size_label, before[0].size_label);
        assert_eq!(after[0].date_label, before[0].date_label);
        assert_eq!(after[1], before[1]);

        let saved = PersistenceAdapter::new(storage).load();
        assert_eq!(saved[0].caption, "hello");
    }

    #[test]
    fn test_update_caption_unknown_id_is_noop() {
        let (mut store, storage) = new_store();
        assert!(!store.update_caption(&ImageId::from("missing"), "x"));
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, _) = new_store();
        store.add(record("a")).unwrap();
        store.add(record("b")).unwrap();

        assert!(store.delete(&ImageId::from("a")));
        let once = store.list().to_vec();
        assert!(!store.delete(&ImageId::from("a")));
        assert_eq!(store.list(), once.as_slice());
    }

    #[test]
    fn test_hydrate_does_not_write_back() {
        let (mut store, storage) = new_store();
        store.hydrate(vec![record("a"), record("b")]);

        assert_eq!(store.len(), 2);
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_hydrate_drops_duplicate_ids() {
        let (mut store, _) = new_store();
        let mut later = record("a");
        later.caption = "later".to_string();
        store.hydrate(vec![record("a"), record("b"), later]);

        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.list()[0].caption, "");
    }

    #[test]
    fn test_load_from_corrupt_storage_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "[{\"broken\"").unwrap();

        let store = ImageStore::load(PersistenceAdapter::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let storage = MemoryStorage::with_quota(8);
        let mut store = ImageStore::new(PersistenceAdapter::new(storage.clone()));

        store.add(record("a")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.update_caption(&ImageId::from("a"), "kept"));
        assert_eq!(store.list()[0].caption, "kept");
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }
}
