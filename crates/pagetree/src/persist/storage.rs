//! Local storage backends.
//!
//! [`Storage`] is a string key/value store with the semantics of browser
//! local storage: whole values are read and replaced, never patched.
//!
//! - [`MemoryStorage`] keeps values in memory.
//! - [`FileStorage`] keeps one `<key>.json` file per key in a directory and
//!   replaces files atomically (write to a temporary file, then rename).
//!
//! Both accept an optional quota on the size of a single value.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("quota exceeded: {needed} bytes requested, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// String key/value store.
pub trait Storage {
    /// Reads the value stored under `key`, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the value is too large and
    /// [`StorageError::Unavailable`] when the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`; removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

fn check_quota(quota: Option<usize>, value: &str) -> Result<(), StorageError> {
    match quota {
        Some(quota) if value.len() > quota => Err(StorageError::QuotaExceeded {
            needed: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: IndexMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the size of a single value to `quota` bytes.
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(self.quota, value)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.shift_remove(key);
        Ok(())
    }
}

/// Directory-backed storage, one file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Creates storage rooted at `directory`; the directory is created on
    /// first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            quota: None,
        }
    }

    /// Limits the size of a single value to `quota` bytes.
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File that holds `key`.
    ///
    /// Keys are limited to ASCII letters, digits, `-`, `_` and `.` so they
    /// cannot escape the directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for any other key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }

    fn unavailable(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
        move |source| StorageError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                trace!(path = path.display().to_string(), bytes = value.len(); "Read storage file");
                Ok(Some(value))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::unavailable(&path)(err)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        check_quota(self.quota, value)?;

        fs::create_dir_all(&self.directory).map_err(Self::unavailable(&self.directory))?;
        let mut file =
            NamedTempFile::new_in(&self.directory).map_err(Self::unavailable(&self.directory))?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(Self::unavailable(&path))?;
        file.persist(&path)
            .map_err(|err| Self::unavailable(&path)(err.error))?;

        debug!(path = path.display().to_string(), bytes = value.len(); "Wrote storage file");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::unavailable(&path)(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_quota() {
        let mut storage = MemoryStorage::new().with_quota(4);
        storage.set_item("k", "1234").unwrap();
        let err = storage.set_item("k", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 5,
                quota: 4
            }
        ));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempdir().expect("Failed to create temp directory");
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("page-editor-data").unwrap(), None);
        storage.set_item("page-editor-data", "{}").unwrap();
        assert_eq!(
            storage.get_item("page-editor-data").unwrap().as_deref(),
            Some("{}")
        );
        assert!(dir.path().join("nested/page-editor-data.json").is_file());

        storage.remove_item("page-editor-data").unwrap();
        storage.remove_item("page-editor-data").unwrap();
        assert_eq!(storage.get_item("page-editor-data").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_escaping_keys() {
        let dir = tempdir().expect("Failed to create temp directory");
        let mut storage = FileStorage::new(dir.path());
        for key in ["", "../x", "a/b", ".hidden"] {
            assert!(matches!(
                storage.set_item(key, "v"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_file_storage_quota() {
        let dir = tempdir().expect("Failed to create temp directory");
        let mut storage = FileStorage::new(dir.path()).with_quota(Some(2));
        assert!(matches!(
            storage.set_item("k", "abc"),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
