//! Error taxonomy for the media pipeline.
//!
//! Configuration errors (`InvalidPathGenerator`, `UnknownMappedType`) are
//! surfaced as soon as mapping setup or field resolution touches them. Source
//! normalization uses a single consistent policy: any input that cannot be
//! turned into local media bytes yields `InvalidSourceMedia`, never a silent
//! absence. Storage failures are carried through unmodified; no retry layer
//! exists here.

use thiserror::Error;

/// Media pipeline errors
#[derive(Debug, Error)]
pub enum MediaError {
    /// The source could not be normalized into local media bytes
    /// (unsupported input, unreachable URL, malformed or disallowed base64).
    #[error("Invalid source media: {0}")]
    InvalidSourceMedia(String),

    /// Bytes handed to an image mapping do not decode as an image.
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// A mapping references a path generator that is not registered.
    #[error("Invalid path generator: {0}")]
    InvalidPathGenerator(String),

    /// A field's declared media kind has no registered mapping.
    #[error("Unknown mapped type: {0}")]
    UnknownMappedType(String),

    /// Image encoding failed for the target format.
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// Storage backend failure, propagated to the caller.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
