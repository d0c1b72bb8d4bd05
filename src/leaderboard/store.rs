//! Durable storage for the leaderboard blob.

use std::cell::RefCell;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Directory under the home directory holding squad data.
const DATA_DIR: &str = ".squad";

/// File name of the persisted leaderboard.
const SCORES_FILE: &str = "highscores.json";

/// A small durable record holding the serialized leaderboard.
pub trait ScoreStore: Debug {
    /// Read the stored blob, or `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save(&self, blob: &str) -> Result<(), StoreError>;

    /// Remove the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        (**self).save(blob)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Get the path to the squad data directory (~/.squad).
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or directory creation fails.
pub fn squad_data_dir() -> Result<PathBuf, StoreError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| StoreError::NoHomeDir)?;

    let data_dir = Path::new(&home).join(DATA_DIR);
    fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
    Ok(data_dir)
}

/// Get the default leaderboard path (~/.squad/highscores.json).
///
/// # Errors
///
/// Returns an error if the data directory is unavailable.
pub fn default_scores_path() -> Result<PathBuf, StoreError> {
    Ok(squad_data_dir()?.join(SCORES_FILE))
}

/// Leaderboard stored as a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the file at `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unavailable.
    pub fn at_default_location() -> Result<Self, StoreError> {
        default_scores_path().map(Self::new)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        // Readers never observe a partially written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

/// In-process store for tests and unsaved play.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Store pre-filled with `blob`.
    #[must_use]
    pub fn with_contents(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }

    /// Current stored blob.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.blob.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("scores.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("scores.json"));

        store.save("[]").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("[]"));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_unreadable_is_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a file
        let store = FileStore::new(dir.path());
        assert!(store.load().is_err());
    }

    #[test]
    fn test_boxed_store() {
        let store: Box<dyn ScoreStore> = Box::new(MemoryStore::default());
        store.save("x").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("x"));
    }
}
