//! Persisted media value objects.
//!
//! `File` and `Image` are the small serializable structures stored as the
//! host record's scalar column value. They are constructed either by the
//! media service from a freshly stored upload, or rehydrated from a persisted
//! scalar with no I/O.

mod file;
mod image;

pub use file::File;
pub use image::Image;

use crate::error::MediaError;

/// Closed set of media value-object kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    File,
    Image,
}

impl MediaKind {
    /// Parse a declared field type name (`"file"` or `"image"`).
    pub fn parse(name: &str) -> Result<MediaKind, MediaError> {
        match name {
            "file" => Ok(MediaKind::File),
            "image" => Ok(MediaKind::Image),
            other => Err(MediaError::UnknownMappedType(other.to_string())),
        }
    }
}

/// A stored media value: either a plain file or an image with conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    File(File),
    Image(Image),
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::File(_) => MediaKind::File,
            Media::Image(_) => MediaKind::Image,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Media::File(file) => &file.name,
            Media::Image(image) => &image.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Media::File(file) => &file.path,
            Media::Image(image) => &image.path,
        }
    }

    pub fn base_path(&self) -> &str {
        match self {
            Media::File(file) => &file.base_path,
            Media::Image(image) => &image.base_path,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Media::File(file) => Some(file),
            Media::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Media::Image(image) => Some(image),
            Media::File(_) => None,
        }
    }

    /// Serialize into the scalar JSON persisted on the host record.
    pub fn to_scalar(&self) -> Result<String, MediaError> {
        let raw = match self {
            Media::File(file) => serde_json::to_string(file)?,
            Media::Image(image) => serde_json::to_string(image)?,
        };
        Ok(raw)
    }

    /// Rehydrate from a persisted scalar. Pure data, no I/O; nested
    /// conversions are reconstructed recursively.
    pub fn from_scalar(kind: MediaKind, raw: &str) -> Result<Media, MediaError> {
        let media = match kind {
            MediaKind::File => Media::File(serde_json::from_str(raw)?),
            MediaKind::Image => Media::Image(serde_json::from_str(raw)?),
        };
        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_kind() {
        assert_eq!(MediaKind::parse("file").unwrap(), MediaKind::File);
        assert_eq!(MediaKind::parse("image").unwrap(), MediaKind::Image);
        assert!(matches!(
            MediaKind::parse("settings"),
            Err(MediaError::UnknownMappedType(name)) if name == "settings"
        ));
    }

    #[test]
    fn test_media_scalar_round_trip() {
        let file = File {
            name: "manual".to_string(),
            filename: "manual.pdf".to_string(),
            path: "product/ab12cd34/manual.pdf".to_string(),
            base_path: "product/ab12cd34".to_string(),
            size: 1024,
            extension: "pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        };

        let media = Media::File(file);
        let scalar = media.to_scalar().unwrap();
        let restored = Media::from_scalar(MediaKind::File, &scalar).unwrap();
        assert_eq!(media, restored);
    }
}
