//! Key-value storage backends.
//!
//! The gallery persists into a string key-value store with the semantics of
//! the browser's `localStorage`: whole-value reads and writes, and writes that
//! can be rejected when the origin's quota is exhausted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::GalleryError;

/// A string key-value store.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, GalleryError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), GalleryError>;

    /// Remove the value stored under `key`.
    fn remove_item(&self, key: &str) -> Result<(), GalleryError>;
}

/// In-memory storage, used on native builds and in tests.
///
/// Clones share the same underlying map, so a caller can keep a handle and
/// inspect what a store has written. An optional quota (in bytes of keys plus
/// values) makes writes fail the way a full `localStorage` does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unlimited storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Rc::default(),
            quota: Some(quota),
        }
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GalleryError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), GalleryError> {
        if let Some(quota) = self.quota {
            let existing = self
                .items
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let needed = self.used_bytes() - existing + key.len() + value.len();
            if needed > quota {
                return Err(GalleryError::persistence_write(format!(
                    "quota exceeded ({} of {} bytes)",
                    needed, quota
                )));
            }
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), GalleryError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser `localStorage` (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's `localStorage`.
    pub fn open() -> Result<Self, GalleryError> {
        let window = web_sys::window()
            .ok_or_else(|| GalleryError::Dom("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| {
                GalleryError::persistence_read(format!("localStorage access error: {:?}", e))
            })?
            .ok_or_else(|| GalleryError::persistence_read("localStorage not available"))?;

        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GalleryError> {
        self.storage.get_item(key).map_err(|e| {
            GalleryError::persistence_read(format!("Failed to read from localStorage: {:?}", e))
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), GalleryError> {
        self.storage.set_item(key, value).map_err(|e| {
            GalleryError::persistence_write(format!("Failed to save to localStorage: {:?}", e))
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), GalleryError> {
        self.storage.remove_item(key).map_err(|e| {
            GalleryError::persistence_write(format!("Failed to remove from localStorage: {:?}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_clones_share_items() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(handle.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();

        let result = storage.set_item("k", "123456789012");
        assert!(matches!(result, Err(GalleryError::PersistenceWrite { .. })));

        // Previous value is untouched
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn test_quota_counts_replacement_not_sum() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap();
        storage.set_item("k", "987654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }
}
