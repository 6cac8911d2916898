//! Mediamap
//!
//! A media mapping and storage pipeline for host records: fields declare how
//! their file or image uploads are named, sized and stored, and the service
//! turns an arbitrary source (local file, URL, base64 data URI) into persisted
//! bytes plus a serializable value object.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediamap::{MediaConfig, MediaMapper, MediaService, MediaSource};
//! use mediamap::storage::LocalStorage;
//!
//! # fn run(record: &dyn mediamap::Record) -> Result<(), mediamap::MediaError> {
//! let storage = Arc::new(LocalStorage::new("uploads")?);
//! let service = MediaService::new(storage, MediaConfig::default());
//!
//! let mut mapper = MediaMapper::new();
//! mapper.image("avatar").width(200).height(200);
//!
//! let source = MediaSource::detect("avatar.png");
//! let media = service.make_media_for(&source, &mapper, "avatar", record)?;
//! let scalar = media.to_scalar()?;
//! # Ok(())
//! # }
//! ```

pub mod service;
pub mod source;

pub use mediamap_core::{
    CleanupPolicy, ConversionSettings, DefaultPathGenerator, File, FileMapping, FilePath, Image,
    ImageMapping, Media, MediaConfig, MediaError, MediaKind, MediaMapper, MediaMapping,
    PathGenerator, PathGeneratorRef, Record,
};
pub use mediamap_processing::ImageTransformer;
pub use mediamap_storage as storage;
pub use mediamap_storage::{Storage, StorageError};

pub use service::MediaService;
pub use source::{MediaSource, SourceFile, TempFileUploader};
