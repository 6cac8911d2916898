//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement.

use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for mediamap_core::MediaError {
    fn from(err: StorageError) -> Self {
        mediamap_core::MediaError::Storage(err.to_string())
    }
}

/// Byte-addressable path store.
///
/// All backends share the same contract: `delete` and `delete_directory` are
/// no-ops when the target is already absent, and `all_files` lists the files
/// under a directory recursively, returning an empty list when the directory
/// does not exist. This is what makes the media delete cascade idempotent.
pub trait Storage: Send + Sync {
    /// Write `data` at `path`, creating intermediate directories as needed.
    fn put(&self, path: &str, data: Bytes) -> StorageResult<()>;

    /// Read the bytes stored at `path`.
    fn get(&self, path: &str) -> StorageResult<Bytes>;

    /// Remove the file at `path`. Absent paths are not an error.
    fn delete(&self, path: &str) -> StorageResult<()>;

    /// All file paths under `dir`, recursively. Empty when `dir` is absent.
    fn all_files(&self, dir: &str) -> StorageResult<Vec<String>>;

    /// Remove `dir` and everything under it. Absent dirs are not an error.
    fn delete_directory(&self, dir: &str) -> StorageResult<()>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> StorageResult<bool>;
}
