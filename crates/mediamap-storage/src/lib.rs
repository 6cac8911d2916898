//! Mediamap Storage Library
//!
//! This crate provides the byte-addressable path store the media service
//! writes through, plus local filesystem and in-memory backends.
//!
//! # Storage path format
//!
//! Paths use `/` separators and are relative to the backend root, e.g.
//! `user_profile/{hash}/{hash}/avatar_200x150.jpg` with conversion images
//! under a `conversions/` segment. Paths must not contain `..` or a leading
//! `/`.

pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};
