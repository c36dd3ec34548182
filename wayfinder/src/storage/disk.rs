//! Disk-backed storage backend.
//!
//! Each key is persisted as a single file under a data directory, so state
//! survives restarts the way browser local storage would. Writes go through
//! a temp file + rename to avoid half-written values being read back after
//! a crash.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Storage, StorageError};

/// File-per-key store rooted at a data directory.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at the platform data directory
    /// (`<data_dir>/wayfinder`).
    pub fn new() -> Result<Self, StorageError> {
        let root = dirs::data_dir()
            .ok_or(StorageError::NoDataDir)?
            .join("wayfinder");
        Self::at(root)
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are flat identifiers; replace anything path-hostile so a key
        // can never escape the root directory.
        let safe: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, bytes = value.len(), "persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
