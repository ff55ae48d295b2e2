//! Key/value persistence backends.
//!
//! The backing table is shared: every store owns one disjoint key in it.
//! `get` is only read synchronously at hydration; `set` failures are logged by
//! the store and never reach the caller of `update`/`set`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StorageError;

pub trait PersistenceAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryTable {
    entries: BTreeMap<String, String>,
    writes: Vec<(String, String)>,
}

/// In-memory table. Clones share the same table, and every `set` is recorded
/// in write order so callers can observe exactly what reached storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    table: Rc<RefCell<MemoryTable>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key without recording a write.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.table
            .borrow_mut()
            .entries
            .insert(key.into(), value.into());
    }

    /// Every write so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.table.borrow().writes.clone()
    }

    /// Values written under `key`, in order.
    #[must_use]
    pub fn writes_for(&self, key: &str) -> Vec<String> {
        self.table
            .borrow()
            .writes
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Current value under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.table.borrow().entries.get(key).cloned()
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut table = self.table.borrow_mut();
        table.entries.insert(key.to_string(), value.to_string());
        table.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistenceAdapter for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Write-then-rename so a crash never leaves a half-written record.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}
