use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::path::PathGenerator;

use super::file_mapping::PathGeneratorRef;

/// Settings for a named conversion of an image mapping.
///
/// Unset fields fall back to the mapping defaults; an unset `name` inherits
/// the parent mapping's current file name.
#[derive(Debug, Clone, Default)]
pub struct ConversionSettings {
    pub name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub canvas_width: Option<u32>,
    pub canvas_height: Option<u32>,
    pub keep_aspect_ratio: Option<bool>,
}

/// Declarative descriptor of how one field's image is sized, named and
/// stored, including its named conversion sub-mappings.
///
/// Builder methods mutate in place and return `&mut Self` for chaining.
#[derive(Debug, Clone)]
pub struct ImageMapping {
    key: String,
    file_name: Option<String>,
    path_generator: Option<PathGeneratorRef>,
    width: Option<u32>,
    height: Option<u32>,
    canvas_width: Option<u32>,
    canvas_height: Option<u32>,
    fit_width: Option<u32>,
    fit_height: Option<u32>,
    keep_aspect_ratio: bool,
    quality: Option<u8>,
    is_conversion: bool,
    conversions: BTreeMap<String, ImageMapping>,
}

impl ImageMapping {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        ImageMapping {
            key: key.into(),
            file_name: None,
            path_generator: None,
            width: None,
            height: None,
            canvas_width: None,
            canvas_height: None,
            fit_width: None,
            fit_height: None,
            keep_aspect_ratio: true,
            quality: None,
            is_conversion: false,
            conversions: BTreeMap::new(),
        }
    }

    /// Override the stored file name (defaults to the field key).
    pub fn name(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = Some(width);
        self
    }

    pub fn height(&mut self, height: u32) -> &mut Self {
        self.height = Some(height);
        self
    }

    pub fn canvas_width(&mut self, canvas_width: u32) -> &mut Self {
        self.canvas_width = Some(canvas_width);
        self
    }

    pub fn canvas_height(&mut self, canvas_height: u32) -> &mut Self {
        self.canvas_height = Some(canvas_height);
        self
    }

    pub fn fit_width(&mut self, fit_width: u32) -> &mut Self {
        self.fit_width = Some(fit_width);
        self
    }

    pub fn fit_height(&mut self, fit_height: u32) -> &mut Self {
        self.fit_height = Some(fit_height);
        self
    }

    /// Crop-and-scale the image to exactly this size as the final transform
    /// step. Both dimensions are required for the step to run.
    pub fn fit(&mut self, width: u32, height: u32) -> &mut Self {
        self.fit_width = Some(width);
        self.fit_height = Some(height);
        self
    }

    pub fn keep_aspect_ratio(&mut self) -> &mut Self {
        self.keep_aspect_ratio = true;
        self
    }

    pub fn dont_keep_aspect_ratio(&mut self) -> &mut Self {
        self.keep_aspect_ratio = false;
        self
    }

    /// Encoding quality, 0-100. Unset mappings use the config default.
    pub fn quality(&mut self, quality: u8) -> &mut Self {
        self.quality = Some(quality.min(100));
        self
    }

    /// Use a specific path generator instance for this mapping.
    pub fn generate_path_with(&mut self, generator: Arc<dyn PathGenerator>) -> &mut Self {
        self.path_generator = Some(PathGeneratorRef::Instance(generator));
        self
    }

    /// Use a generator registered by name in the media config.
    pub fn generate_path_with_named(&mut self, name: impl Into<String>) -> &mut Self {
        self.path_generator = Some(PathGeneratorRef::Named(name.into()));
        self
    }

    /// Register a named conversion derived from this mapping.
    ///
    /// The conversion shares this mapping's key and base directory and lands
    /// under a `conversions/` segment. The returned reference can be chained
    /// to customize it further (e.g. a `fit` size).
    ///
    /// # Panics
    ///
    /// Conversions cannot be nested; registering a conversion on a conversion
    /// is a configuration error and panics at setup time.
    pub fn add_conversion(
        &mut self,
        name: impl Into<String>,
        settings: ConversionSettings,
    ) -> &mut ImageMapping {
        assert!(!self.is_conversion, "conversions cannot be nested");

        let mut mapping = ImageMapping::new(self.key.clone());
        mapping.is_conversion = true;
        mapping.file_name = settings.name.clone().or_else(|| self.file_name.clone());
        mapping.width = settings.width;
        mapping.height = settings.height;
        mapping.canvas_width = settings.canvas_width;
        mapping.canvas_height = settings.canvas_height;
        if let Some(keep) = settings.keep_aspect_ratio {
            mapping.keep_aspect_ratio = keep;
        }

        match self.conversions.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(mapping);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(mapping),
        }
    }

    /// The field this mapping was registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored file name, falling back to the field key.
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.key)
    }

    pub fn path_generator(&self) -> Option<&PathGeneratorRef> {
        self.path_generator.as_ref()
    }

    /// Resize target dimensions `(width, height)`.
    pub fn size(&self) -> (Option<u32>, Option<u32>) {
        (self.width, self.height)
    }

    /// Canvas target dimensions `(width, height)`.
    pub fn canvas_size(&self) -> (Option<u32>, Option<u32>) {
        (self.canvas_width, self.canvas_height)
    }

    /// Fit target, present only when both dimensions are set.
    pub fn fit_size(&self) -> Option<(u32, u32)> {
        self.fit_width.zip(self.fit_height)
    }

    pub fn should_keep_aspect_ratio(&self) -> bool {
        self.keep_aspect_ratio
    }

    /// Effective encoding quality, falling back to `default`.
    pub fn quality_or(&self, default: u8) -> u8 {
        self.quality.unwrap_or(default).min(100)
    }

    pub fn is_conversion(&self) -> bool {
        self.is_conversion
    }

    pub fn conversions(&self) -> &BTreeMap<String, ImageMapping> {
        &self.conversions
    }

    pub fn has_conversions(&self) -> bool {
        !self.conversions.is_empty()
    }

    pub fn should_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    pub fn should_resize_canvas(&self) -> bool {
        self.canvas_width.is_some() || self.canvas_height.is_some()
    }

    pub fn should_fit(&self) -> bool {
        self.fit_width.is_some() && self.fit_height.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mapping = ImageMapping::new("photo");
        assert!(mapping.should_keep_aspect_ratio());
        assert_eq!(mapping.quality_or(100), 100);
        assert!(!mapping.is_conversion());
        assert!(!mapping.should_resize());
        assert!(!mapping.should_resize_canvas());
        assert!(!mapping.should_fit());
    }

    #[test]
    fn test_builder_chain() {
        let mut mapping = ImageMapping::new("photo");
        mapping
            .name("cover")
            .width(800)
            .height(600)
            .dont_keep_aspect_ratio()
            .quality(80);

        assert_eq!(mapping.file_name(), "cover");
        assert_eq!(mapping.size(), (Some(800), Some(600)));
        assert!(!mapping.should_keep_aspect_ratio());
        assert_eq!(mapping.quality_or(100), 80);
        assert!(mapping.should_resize());
    }

    #[test]
    fn test_fit_requires_both_dimensions() {
        let mut mapping = ImageMapping::new("photo");
        mapping.fit_width(100);
        assert!(!mapping.should_fit());
        mapping.fit_height(100);
        assert!(mapping.should_fit());
        assert_eq!(mapping.fit_size(), Some((100, 100)));
    }

    #[test]
    fn test_add_conversion_inherits_key_and_file_name() {
        let mut mapping = ImageMapping::new("photo");
        mapping.name("cover");
        mapping.add_conversion(
            "thumb",
            ConversionSettings {
                width: Some(100),
                height: Some(100),
                ..Default::default()
            },
        );

        let conversion = mapping.conversions().get("thumb").unwrap();
        assert_eq!(conversion.key(), "photo");
        assert_eq!(conversion.file_name(), "cover");
        assert!(conversion.is_conversion());
        assert_eq!(conversion.size(), (Some(100), Some(100)));
        assert!(conversion.should_keep_aspect_ratio());
    }

    #[test]
    fn test_conversion_settings_override_name_and_aspect() {
        let mut mapping = ImageMapping::new("photo");
        mapping.add_conversion(
            "banner",
            ConversionSettings {
                name: Some("wide".to_string()),
                width: Some(900),
                height: Some(300),
                keep_aspect_ratio: Some(false),
                ..Default::default()
            },
        );

        // The aspect flag applies to the conversion, not to the parent.
        assert!(mapping.should_keep_aspect_ratio());
        let conversion = mapping.conversions().get("banner").unwrap();
        assert_eq!(conversion.file_name(), "wide");
        assert!(!conversion.should_keep_aspect_ratio());
    }

    #[test]
    fn test_conversion_can_be_customized_after_creation() {
        let mut mapping = ImageMapping::new("photo");
        mapping
            .add_conversion("square", ConversionSettings::default())
            .fit(100, 100);

        let conversion = mapping.conversions().get("square").unwrap();
        assert_eq!(conversion.fit_size(), Some((100, 100)));
    }

    #[test]
    #[should_panic(expected = "conversions cannot be nested")]
    fn test_nested_conversions_are_rejected() {
        let mut mapping = ImageMapping::new("photo");
        mapping
            .add_conversion("thumb", ConversionSettings::default())
            .add_conversion("nested", ConversionSettings::default());
    }
}
