//! Media pipeline orchestration.
//!
//! `MediaService` drives the full lifecycle: normalize the source, dispatch
//! on the mapping kind, transform and encode images, write through storage
//! and build the value object the host record persists. Deletion cascades
//! over conversions and cleans up the base directory once it is empty.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};

use mediamap_core::{
    CleanupPolicy, File, FileMapping, Image, ImageMapping, Media, MediaConfig, MediaError,
    MediaMapper, MediaMapping, Record,
};
use mediamap_processing::{decode_image, encode_image, ImageTransformer};
use mediamap_storage::Storage;

use crate::source::{MediaSource, SourceFile, TempFileUploader};

pub struct MediaService {
    storage: Arc<dyn Storage>,
    config: MediaConfig,
    uploader: TempFileUploader,
    transformer: ImageTransformer,
}

impl MediaService {
    pub fn new(storage: Arc<dyn Storage>, config: MediaConfig) -> Self {
        MediaService {
            storage,
            config,
            uploader: TempFileUploader::new(),
            transformer: ImageTransformer::new(),
        }
    }

    /// Normalize `source` and store it according to `mapping`, rooted at
    /// `base_dir`. Returns the value object the caller persists.
    pub fn make_media(
        &self,
        source: &MediaSource,
        mapping: &MediaMapping,
        base_dir: &str,
    ) -> Result<Media, MediaError> {
        let file = self.uploader.get_temp_file(source)?;

        match mapping {
            MediaMapping::File(mapping) => Ok(Media::File(self.make_file(&file, mapping, base_dir)?)),
            MediaMapping::Image(mapping) => {
                Ok(Media::Image(self.make_image(&file, mapping, base_dir)?))
            }
        }
    }

    /// Store media for a record's mapped field, resolving the base upload
    /// directory once per call. Fields with no registered mapping are a
    /// configuration error.
    pub fn make_media_for(
        &self,
        source: &MediaSource,
        mapper: &MediaMapper,
        field: &str,
        record: &dyn Record,
    ) -> Result<Media, MediaError> {
        let mapping = mapper
            .find(field)
            .ok_or_else(|| MediaError::UnknownMappedType(field.to_string()))?;
        let base_dir = mapper.resolve_base_upload_dir(record);
        self.make_media(source, mapping, &base_dir)
    }

    fn make_file(
        &self,
        file: &SourceFile,
        mapping: &FileMapping,
        base_dir: &str,
    ) -> Result<File, MediaError> {
        let data = file.read()?;

        let generator = self.config.resolve_generator(mapping.path_generator())?;
        let filepath = generator.generate_path_for_files(file.extension(), mapping, base_dir);

        self.storage.put(&filepath.full(), data)?;

        tracing::info!(
            path = %filepath.full(),
            size_bytes = file.size(),
            "Stored file media"
        );

        Ok(File {
            name: mapping.file_name().to_string(),
            filename: filepath.filename().to_string(),
            path: filepath.full(),
            base_path: filepath.base().to_string(),
            size: file.size(),
            extension: file.extension().to_string(),
            mime_type: file.mime_type().to_string(),
        })
    }

    fn make_image(
        &self,
        file: &SourceFile,
        mapping: &ImageMapping,
        base_dir: &str,
    ) -> Result<Image, MediaError> {
        let data = file.read()?;
        let original = decode_image(&data)?;

        let mut image = self.make_and_store_image(&original, file, mapping, base_dir)?;

        // Conversions derive from the original, never from the primary's
        // already-transformed output.
        for (name, conversion) in mapping.conversions() {
            let stored = self.make_and_store_image(&original, file, conversion, base_dir)?;
            image.add_conversion(name.clone(), stored);
        }

        Ok(image)
    }

    fn make_and_store_image(
        &self,
        original: &DynamicImage,
        file: &SourceFile,
        mapping: &ImageMapping,
        base_dir: &str,
    ) -> Result<Image, MediaError> {
        let start = Instant::now();

        let transformed = self.transformer.transform_with(original, mapping);
        let (width, height) = transformed.dimensions();

        let quality = mapping.quality_or(self.config.default_quality);
        let encoded = encode_image(&transformed, file.extension(), quality)?;

        let generator = self.config.resolve_generator(mapping.path_generator())?;
        let filepath =
            generator.generate_path_for_images(width, height, file.extension(), mapping, base_dir);

        self.storage.put(&filepath.full(), encoded)?;

        tracing::info!(
            path = %filepath.full(),
            width = width,
            height = height,
            conversion = mapping.is_conversion(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored image media"
        );

        Ok(Image {
            name: mapping.file_name().to_string(),
            filename: filepath.filename().to_string(),
            path: filepath.full(),
            base_path: filepath.base().to_string(),
            size: file.size(),
            extension: file.extension().to_string(),
            mime_type: file.mime_type().to_string(),
            width,
            height,
            conversions: BTreeMap::new(),
        })
    }

    /// Delete `media` from storage: conversions first, then the primary, then
    /// the base directory once nothing is left under it. Idempotent; deleting
    /// already-absent paths is not an error.
    pub fn delete(&self, media: &Media) -> Result<(), MediaError> {
        if let Media::Image(image) = media {
            for conversion in image.conversions.values() {
                self.storage.delete(&conversion.path)?;
            }
        }

        self.storage.delete(media.path())?;

        if self.storage.all_files(media.base_path())?.is_empty() {
            self.storage.delete_directory(media.base_path())?;
        }

        tracing::info!(path = %media.path(), "Deleted media");

        Ok(())
    }

    /// Lifecycle hook the host persistence layer calls with the values a save
    /// replaced. A `Never` cleanup policy turns this into a no-op.
    pub fn cleanup_superseded(&self, superseded: &[Media]) -> Result<(), MediaError> {
        if self.config.cleanup == CleanupPolicy::Never {
            return Ok(());
        }

        for media in superseded {
            self.delete(media)?;
        }

        Ok(())
    }
}
