//! Mediamap Core Library
//!
//! This crate provides the value objects, mapping registry, path generation
//! and configuration types of the media mapping pipeline. It is pure data and
//! logic; storage backends and the image codec live in their own crates.

pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod path;
pub mod record;
pub mod utils;

// Re-export commonly used types
pub use config::{CleanupPolicy, MediaConfig};
pub use error::MediaError;
pub use mapping::{
    ConversionSettings, FileMapping, ImageMapping, MediaMapper, MediaMapping, PathGeneratorRef,
};
pub use models::{File, Image, Media, MediaKind};
pub use path::{DefaultPathGenerator, FilePath, PathGenerator};
pub use record::Record;
