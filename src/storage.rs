use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::data_models::Bookmarks;
use crate::error::PersistError;

/// Blob names as constants for consistency
pub mod keys {
    pub const BOOKMARKS: &str = "bookmarks";
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable string key-value storage. Calls are synchronous: once `set`
/// returns, the value is durable.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PersistResult<()>;
    fn clear(&self, key: &str) -> PersistResult<()>;
}

// =============================================================================
// File backed storage
// =============================================================================

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl AsRef<Path>) -> PersistResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        log::debug!("file storage opened at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        // write-then-rename so a crash never leaves a half written blob
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> PersistResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Process-local storage. Clones share the same map, so a second store built
/// from a clone sees what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> PersistResult<()> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed JSON access
// =============================================================================

/// JSON (de)serialization on top of a [`KeyValueStore`].
pub struct Repository<S> {
    storage: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load and decode a blob. A missing blob is `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> PersistResult<Option<T>> {
        match self.storage.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PersistResult<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }

    pub fn clear(&self, key: &str) -> PersistResult<()> {
        self.storage.clear(key)
    }
}

/// The bookmarks blob.
pub struct BookmarkRepo<S> {
    repo: Repository<S>,
}

impl<S: KeyValueStore> BookmarkRepo<S> {
    pub fn new(storage: S) -> Self {
        Self {
            repo: Repository::new(storage),
        }
    }

    /// Absence of persisted bookmarks yields an empty collection.
    pub fn load(&self) -> PersistResult<Bookmarks> {
        let bookmarks: Bookmarks = self.repo.load(keys::BOOKMARKS)?.unwrap_or_default();
        log::info!("loaded {} bookmark(s) from storage", bookmarks.len());
        Ok(bookmarks)
    }

    pub fn save(&self, bookmarks: &Bookmarks) -> PersistResult<()> {
        self.repo.save(keys::BOOKMARKS, bookmarks)?;
        log::debug!("persisted {} bookmark(s)", bookmarks.len());
        Ok(())
    }

    pub fn clear(&self) -> PersistResult<()> {
        self.repo.clear(keys::BOOKMARKS)
    }
}
