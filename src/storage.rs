//! Persistent document storage
//!
//! The cart, wishlist and preferences are each persisted as one independently keyed JSON
//! document in a key-value medium (browser `localStorage`, a directory on disk, or memory).
//!
//! [`DocumentStore`] is the only boundary the aggregates talk to. It never fails: a missing
//! medium, a missing document or a malformed document all read back as the document's empty
//! default, and writes to a missing medium are dropped.

use std::{fmt, io, rc::Rc};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

mod file;
mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::LocalStorage;

/// Default prefix for document keys.
pub const DEFAULT_KEY_PREFIX: &str = "balaji_sweets";

/// Errors raised by storage backends. These never escape [`DocumentStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error from the file backend.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the host storage medium.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A synchronous string key-value medium.
pub trait KeyValueStore: fmt::Debug {
    /// Whether a storage medium exists at all. When `false`, reads are empty and writes skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium could not be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium could not be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium could not be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Backend for hosts without any storage medium, such as headless execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl KeyValueStore for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// The independently keyed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// Cart line items
    Cart,

    /// Wishlist entries
    Wishlist,

    /// Recently viewed products and search history
    Preferences,
}

impl Document {
    fn suffix(self) -> &'static str {
        match self {
            Document::Cart => "cart",
            Document::Wishlist => "wishlist",
            Document::Preferences => "prefs",
        }
    }
}

/// Maps documents to storage keys (`<prefix>_cart`, `<prefix>_wishlist`, `<prefix>_prefs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    /// Create keys with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Storage key for a document.
    #[must_use]
    pub fn key(&self, document: Document) -> String {
        format!("{}_{}", self.prefix, document.suffix())
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

/// Loads and saves typed documents through a shared [`KeyValueStore`] handle.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Rc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl DocumentStore {
    /// Create a document store over a backend with the default keys.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_keys(backend, StorageKeys::default())
    }

    /// Create a document store over a backend with custom keys.
    pub fn with_keys(backend: impl KeyValueStore + 'static, keys: StorageKeys) -> Self {
        Self::from_shared(Rc::new(backend), keys)
    }

    /// Create a document store over an already shared backend.
    pub fn from_shared(backend: Rc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    /// Document store for hosts without storage: every load is empty, every save is dropped.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(Unavailable)
    }

    /// Document store backed by a fresh in-memory map.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Whether writes reach a storage medium.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// The keys used for each document.
    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Load a document, falling back to its empty default when it is absent or unreadable.
    pub fn load<T>(&self, document: Document) -> T
    where
        T: DeserializeOwned + Default,
    {
        if !self.is_available() {
            return T::default();
        }

        let key = self.keys.key(document);

        let raw = match self.backend.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(error) => {
                warn!(%key, %error, "failed to read document, using empty default");

                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(%key, %error, "malformed document, using empty default");

            T::default()
        })
    }

    /// Save a document. Skipped when no medium is available; backend failures are logged.
    pub fn save<T>(&self, document: Document, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if !self.is_available() {
            return;
        }

        let key = self.keys.key(document);

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%key, %error, "failed to serialize document, write skipped");

                return;
            }
        };

        match self.backend.set_item(&key, &raw) {
            Ok(()) => debug!(%key, bytes = raw.len(), "document saved"),
            Err(error) => warn!(%key, %error, "failed to write document"),
        }
    }

    /// Remove a document entirely.
    pub fn remove(&self, document: Document) {
        if !self.is_available() {
            return;
        }

        let key = self.keys.key(document);

        match self.backend.remove_item(&key) {
            Ok(()) => debug!(%key, "document removed"),
            Err(error) => warn!(%key, %error, "failed to remove document"),
        }
    }
}
