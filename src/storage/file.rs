//! Directory-backed storage

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, StorageError};

/// Stores each key as `<key>.json` inside a directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory documents are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_reads_as_none() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        assert_eq!(store.get_item("balaji_sweets_cart")?, None);

        Ok(())
    }

    #[test]
    fn set_creates_directory_and_file() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("nested"));

        store.set_item("balaji_sweets_cart", "[]")?;

        let written = fs::read_to_string(dir.path().join("nested/balaji_sweets_cart.json"))?;
        assert_eq!(written, "[]");
        assert_eq!(store.get_item("balaji_sweets_cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        store.set_item("balaji_sweets_prefs", "{}")?;
        store.remove_item("balaji_sweets_prefs")?;
        store.remove_item("balaji_sweets_prefs")?;

        assert_eq!(store.get_item("balaji_sweets_prefs")?, None);

        Ok(())
    }
}
