//! Deterministic storage-path generation.

use crate::mapping::{FileMapping, ImageMapping};

/// A base-directory + filename pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    base: String,
    filename: String,
}

impl FilePath {
    pub fn new(base: impl Into<String>, filename: impl Into<String>) -> Self {
        FilePath {
            base: base.into(),
            filename: filename.into(),
        }
    }

    /// Full path: base and filename joined with exactly one separator,
    /// regardless of whether the base already ends with one.
    pub fn full(&self) -> String {
        if self.base.is_empty() {
            return self.filename.clone();
        }
        format!("{}/{}", self.base.trim_end_matches('/'), self.filename)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Strategy for deriving where a mapping's bytes land.
///
/// The resolved base upload directory is passed in by the caller; generators
/// never reach back into the mapper.
pub trait PathGenerator: Send + Sync {
    fn generate_path_for_files(
        &self,
        extension: &str,
        mapping: &FileMapping,
        base_dir: &str,
    ) -> FilePath;

    fn generate_path_for_images(
        &self,
        width: u32,
        height: u32,
        extension: &str,
        mapping: &ImageMapping,
        base_dir: &str,
    ) -> FilePath;
}

/// Default naming scheme: `{file_name}.{ext}` for files,
/// `{file_name}_{w}x{h}.{ext}` for images, with conversion images placed
/// under a single `conversions/` segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPathGenerator;

impl PathGenerator for DefaultPathGenerator {
    fn generate_path_for_files(
        &self,
        extension: &str,
        mapping: &FileMapping,
        base_dir: &str,
    ) -> FilePath {
        FilePath::new(base_dir, format!("{}.{}", mapping.file_name(), extension))
    }

    fn generate_path_for_images(
        &self,
        width: u32,
        height: u32,
        extension: &str,
        mapping: &ImageMapping,
        base_dir: &str,
    ) -> FilePath {
        // Conversions never nest, so the suffix is appended at most once.
        let mut base = base_dir.to_string();
        if mapping.is_conversion() {
            base.push_str("/conversions");
        }
        FilePath::new(
            base,
            format!("{}_{}x{}.{}", mapping.file_name(), width, height, extension),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ConversionSettings, MediaMapper};

    #[test]
    fn test_full_joins_with_exactly_one_separator() {
        assert_eq!(FilePath::new("a/b", "c.png").full(), "a/b/c.png");
        assert_eq!(FilePath::new("a/b/", "c.png").full(), "a/b/c.png");
        assert_eq!(FilePath::new("", "c.png").full(), "c.png");
    }

    #[test]
    fn test_generate_path_for_files() {
        let mut mapper = MediaMapper::new();
        mapper.file("manual").name("user-manual");
        let mapping = mapper.find("manual").unwrap().as_file().unwrap().clone();

        let path = DefaultPathGenerator.generate_path_for_files("pdf", &mapping, "product/ab12cd34");
        assert_eq!(path.full(), "product/ab12cd34/user-manual.pdf");
        assert_eq!(path.base(), "product/ab12cd34");
        assert_eq!(path.filename(), "user-manual.pdf");
    }

    #[test]
    fn test_generate_path_for_images_has_no_conversions_segment() {
        let mut mapper = MediaMapper::new();
        mapper.image("photo");
        let mapping = mapper.find("photo").unwrap().as_image().unwrap().clone();

        let path =
            DefaultPathGenerator.generate_path_for_images(800, 600, "jpg", &mapping, "product/ab12cd34");
        assert_eq!(path.full(), "product/ab12cd34/photo_800x600.jpg");
        assert_eq!(path.full().matches("/conversions").count(), 0);
    }

    #[test]
    fn test_generate_path_for_conversions_has_segment_exactly_once() {
        let mut mapper = MediaMapper::new();
        mapper
            .image("photo")
            .add_conversion("thumb", ConversionSettings::default());
        let parent = mapper.find("photo").unwrap().as_image().unwrap().clone();
        let conversion = parent.conversions().get("thumb").unwrap();

        let path = DefaultPathGenerator.generate_path_for_images(
            100,
            75,
            "jpg",
            conversion,
            "product/ab12cd34",
        );
        assert_eq!(path.base(), "product/ab12cd34/conversions");
        assert_eq!(path.full().matches("/conversions").count(), 1);
        assert_eq!(path.filename(), "photo_100x75.jpg");
    }
}
