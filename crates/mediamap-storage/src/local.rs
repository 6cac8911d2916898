use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::traits::{Storage, StorageError, StorageResult};

/// Local filesystem storage implementation
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `root`, creating the
    /// directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create storage root {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage { root })
    }

    /// Convert a storage path to a filesystem path with security validation
    ///
    /// Rejects paths containing traversal sequences that could escape the
    /// storage root.
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty() || path.contains("..") || path.starts_with('/') {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }

    fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<String>) -> StorageResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let child = format!("{prefix}/{name}");
            if entry.file_type()?.is_dir() {
                Self::collect_files(&entry.path(), &child, out)?;
            } else {
                out.push(child);
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        let full = self.resolve(path)?;
        let size = data.len();

        Self::ensure_parent_dir(&full)?;

        let start = std::time::Instant::now();

        fs::write(&full, &data).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", full.display(), e))
        })?;

        tracing::info!(
            path = %full.display(),
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    fn get(&self, path: &str) -> StorageResult<Bytes> {
        let full = self.resolve(path)?;

        if !full.is_file() {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let data = fs::read(&full).map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", full.display(), e))
        })?;

        Ok(Bytes::from(data))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;

        if !full.exists() {
            return Ok(());
        }

        fs::remove_file(&full).map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", full.display(), e))
        })?;

        tracing::info!(
            path = %full.display(),
            key = %path,
            "Local storage delete successful"
        );

        Ok(())
    }

    fn all_files(&self, dir: &str) -> StorageResult<Vec<String>> {
        let full = self.resolve(dir)?;

        if !full.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        Self::collect_files(&full, dir.trim_end_matches('/'), &mut out)?;
        out.sort();
        Ok(out)
    }

    fn delete_directory(&self, dir: &str) -> StorageResult<()> {
        let full = self.resolve(dir)?;

        if !full.is_dir() {
            return Ok(());
        }

        fs::remove_dir_all(&full).map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete directory {}: {}",
                full.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %full.display(),
            key = %dir,
            "Local storage directory delete successful"
        );

        Ok(())
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.resolve(path)?.is_file())
    }
}
