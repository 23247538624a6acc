//! In-memory storage backend

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageError};

/// A process-local key-value map, for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);

        Ok(())
    }
}
