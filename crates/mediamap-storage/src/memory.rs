use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;

use crate::traits::{Storage, StorageError, StorageResult};

/// In-memory storage backend.
///
/// Keeps every file in a map keyed by its full path, with directory
/// semantics derived from `/`-separated prefixes. Intended for tests and for
/// hosts that only need ephemeral media.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, BTreeMap<String, Bytes>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dir_prefix(dir: &str) -> String {
        format!("{}/", dir.trim_end_matches('/'))
    }
}

impl Storage for MemoryStorage {
    fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        if path.is_empty() || path.contains("..") || path.starts_with('/') {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        self.guard().insert(path.to_string(), data);
        Ok(())
    }

    fn get(&self, path: &str) -> StorageResult<Bytes> {
        self.guard()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        self.guard().remove(path);
        Ok(())
    }

    fn all_files(&self, dir: &str) -> StorageResult<Vec<String>> {
        let prefix = Self::dir_prefix(dir);
        Ok(self
            .guard()
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn delete_directory(&self, dir: &str) -> StorageResult<()> {
        let prefix = Self::dir_prefix(dir);
        self.guard().retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.guard().contains_key(path))
    }
}
