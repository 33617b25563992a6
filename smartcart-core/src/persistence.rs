//! Durable local persistence for the item list.
//!
//! The full list is serialized as a JSON array and written under a single
//! fixed storage file on every change. There is no versioning or migration
//! of the stored schema - a format change is a breaking change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::models::Item;

/// File name of the durable snapshot (the storage key).
pub const STORAGE_FILE_NAME: &str = "smartcart-pro-v2.json";

/// Snapshot persistence for the item list.
///
/// Injected into the sync engine so storage access never happens through
/// globals. `save` is synchronous relative to the calling mutation.
pub trait Persistence: Send + Sync {
    /// Reads the saved list. `Ok(None)` means no usable saved data.
    fn load(&self) -> Result<Option<Vec<Item>>, PersistenceError>;

    /// Replaces the saved list with the given snapshot.
    fn save(&self, items: &[Item]) -> Result<(), PersistenceError>;
}

/// JSON-file backed persistence.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing to an explicit file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store using the default file name inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE_NAME),
        }
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFileStore {
    /// Reads the snapshot file once.
    ///
    /// A missing file means no saved data. A file that fails to parse is
    /// treated the same way: the error is logged and the caller falls back
    /// to the default list.
    fn load(&self) -> Result<Option<Vec<Item>>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::Io(self.path.clone(), e)),
        };

        match serde_json::from_str::<Vec<Item>>(&contents) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!(
                    "ignoring unreadable snapshot {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::Io(parent.to_path_buf(), e))?;
        }

        let json = serde_json::to_string(items).map_err(PersistenceError::Encode)?;
        fs::write(&self.path, json).map_err(|e| PersistenceError::Io(self.path.clone(), e))?;

        Ok(())
    }
}

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error reading or writing the snapshot file.
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
    /// Failed to serialize the item list.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_items;
    use tempfile::TempDir;

    fn test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_store_path_uses_storage_key() {
        let (store, _temp) = test_store();
        assert!(store.path().ends_with(STORAGE_FILE_NAME));
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (store, _temp) = test_store();
        let items = default_items();

        store.save(&items).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(items, loaded);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = JsonFileStore::in_dir(&nested);

        store.save(&default_items()).unwrap();

        assert!(nested.exists());
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_save_replaces_prior_snapshot() {
        let (store, _temp) = test_store();
        store.save(&default_items()).unwrap();
        store.save(&[]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_parse_error_treated_as_no_saved_data() {
        let (store, _temp) = test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json {").unwrap();

        assert!(store.load().unwrap().is_none());
    }
}
