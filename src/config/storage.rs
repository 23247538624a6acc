//! Storage Config

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::storage::{DEFAULT_KEY_PREFIX, DocumentStore, FileStore, MemoryStore, StorageKeys};

/// Persistence settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory for persisted documents; omit to keep state in memory only
    #[arg(long, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Prefix for document keys
    #[arg(long, env = "STOREFRONT_KEY_PREFIX", default_value = DEFAULT_KEY_PREFIX)]
    pub key_prefix: String,
}

impl StorageConfig {
    /// Open the configured document store.
    #[must_use]
    pub fn open(&self) -> DocumentStore {
        let keys = StorageKeys::new(self.key_prefix.clone());

        match &self.data_dir {
            Some(dir) => {
                info!(dir = %dir.display(), prefix = %self.key_prefix, "using file storage");

                DocumentStore::with_keys(FileStore::new(dir.clone()), keys)
            }
            None => {
                info!(prefix = %self.key_prefix, "using in-memory storage");

                DocumentStore::with_keys(MemoryStore::default(), keys)
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}
