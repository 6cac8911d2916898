use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::MediaKind;
use crate::record::Record;
use crate::utils;

use super::file_mapping::FileMapping;
use super::image_mapping::ImageMapping;

/// A field's registered mapping: the closed set of media descriptors.
#[derive(Debug, Clone)]
pub enum MediaMapping {
    File(FileMapping),
    Image(ImageMapping),
}

impl MediaMapping {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaMapping::File(_) => MediaKind::File,
            MediaMapping::Image(_) => MediaKind::Image,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            MediaMapping::File(mapping) => mapping.key(),
            MediaMapping::Image(mapping) => mapping.key(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            MediaMapping::File(mapping) => mapping.file_name(),
            MediaMapping::Image(mapping) => mapping.file_name(),
        }
    }

    pub fn as_file(&self) -> Option<&FileMapping> {
        match self {
            MediaMapping::File(mapping) => Some(mapping),
            MediaMapping::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageMapping> {
        match self {
            MediaMapping::Image(mapping) => Some(mapping),
            MediaMapping::File(_) => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageMapping> {
        match self {
            MediaMapping::Image(mapping) => Some(mapping),
            MediaMapping::File(_) => None,
        }
    }
}

/// Per-record registry of field name → media mapping, plus base-directory
/// derivation.
///
/// The mapper owns its mappings by value; neither side holds a pointer to the
/// other, and the owning record is passed in by reference where its state is
/// needed. One mapper is created lazily per record instance and lives for
/// that instance's lifetime; it is never persisted.
#[derive(Debug)]
pub struct MediaMapper {
    mappings: BTreeMap<String, MediaMapping>,
    base_upload_dir: Option<String>,
    // Random discriminator segment, fixed at construction so the derived
    // directory is identical across every resolve call for this mapper.
    instance_hash: String,
    fallback_dir: OnceLock<String>,
}

impl Default for MediaMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaMapper {
    pub fn new() -> Self {
        MediaMapper {
            mappings: BTreeMap::new(),
            base_upload_dir: None,
            instance_hash: utils::random_short_hash(),
            fallback_dir: OnceLock::new(),
        }
    }

    /// Register a file mapping for `name`, replacing any prior mapping.
    pub fn file(&mut self, name: impl Into<String>) -> &mut FileMapping {
        let name = name.into();
        self.mappings.insert(
            name.clone(),
            MediaMapping::File(FileMapping::new(name.clone())),
        );
        match self.mappings.get_mut(&name) {
            Some(MediaMapping::File(mapping)) => mapping,
            _ => unreachable!("file mapping was just registered"),
        }
    }

    /// Register an image mapping for `name`, replacing any prior mapping.
    pub fn image(&mut self, name: impl Into<String>) -> &mut ImageMapping {
        let name = name.into();
        self.mappings.insert(
            name.clone(),
            MediaMapping::Image(ImageMapping::new(name.clone())),
        );
        match self.mappings.get_mut(&name) {
            Some(MediaMapping::Image(mapping)) => mapping,
            _ => unreachable!("image mapping was just registered"),
        }
    }

    /// Register a mapping of the given kind, replacing any prior mapping.
    pub fn register(&mut self, kind: MediaKind, name: impl Into<String>) -> &mut MediaMapping {
        let name = name.into();
        let mapping = match kind {
            MediaKind::File => MediaMapping::File(FileMapping::new(name.clone())),
            MediaKind::Image => MediaMapping::Image(ImageMapping::new(name.clone())),
        };
        self.mappings.insert(name.clone(), mapping);
        match self.mappings.get_mut(&name) {
            Some(mapping) => mapping,
            None => unreachable!("mapping was just registered"),
        }
    }

    pub fn find(&self, name: &str) -> Option<&MediaMapping> {
        self.mappings.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut MediaMapping> {
        self.mappings.get_mut(name)
    }

    pub fn mappings(&self) -> &BTreeMap<String, MediaMapping> {
        &self.mappings
    }

    /// Set an explicit base-directory template; trailing separators are
    /// stripped. The template may contain a single `{field}` placeholder
    /// substituted with the record's live field value on every resolve.
    pub fn base_upload_dir(&mut self, template: impl Into<String>) -> &mut Self {
        let template = template.into();
        self.base_upload_dir = Some(template.trim_end_matches('/').to_string());
        self
    }

    /// Resolve the record's base upload directory.
    ///
    /// With a template set, the value is recomputed on every call so that
    /// `{field}` substitution reflects the record's current field state —
    /// it is deliberately not cached. Without a template, the directory is
    /// derived once from the record's type name, primary key and this
    /// mapper's fixed random segment, then cached: every call, including the
    /// first, returns the identical string for the mapper's lifetime.
    pub fn resolve_base_upload_dir(&self, record: &dyn Record) -> String {
        if let Some(template) = &self.base_upload_dir {
            return substitute_field(template, record);
        }

        self.fallback_dir
            .get_or_init(|| {
                let discriminator = match record.primary_key() {
                    Some(key) if !key.is_empty() => {
                        format!("{}/{}", utils::short_hash(&key), self.instance_hash)
                    }
                    _ => self.instance_hash.clone(),
                };
                let dir = format!(
                    "{}/{}",
                    utils::snake_case(record.type_name()),
                    discriminator
                );
                tracing::debug!(dir = %dir, "derived base upload directory");
                dir
            })
            .clone()
    }
}

/// Replace the first `{field}` placeholder with the record's value for that
/// field. Templates without a placeholder pass through unchanged; a missing
/// field substitutes as empty.
fn substitute_field(template: &str, record: &dyn Record) -> String {
    let (Some(start), Some(end)) = (template.find('{'), template.find('}')) else {
        return template.to_string();
    };
    if end < start {
        return template.to_string();
    }
    let field = &template[start + 1..end];
    let value = record.field_value(field).unwrap_or_default();
    format!("{}{}{}", &template[..start], value, &template[end + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestRecord {
        key: Option<String>,
        fields: HashMap<String, String>,
    }

    impl TestRecord {
        fn new(key: Option<&str>) -> Self {
            TestRecord {
                key: key.map(str::to_string),
                fields: HashMap::new(),
            }
        }

        fn with_field(mut self, name: &str, value: &str) -> Self {
            self.fields.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl Record for TestRecord {
        fn primary_key(&self) -> Option<String> {
            self.key.clone()
        }

        fn field_value(&self, name: &str) -> Option<String> {
            self.fields.get(name).cloned()
        }

        fn type_name(&self) -> &str {
            "UserProfile"
        }
    }

    #[test]
    fn test_register_and_find() {
        let mut mapper = MediaMapper::new();
        mapper.image("photo").width(200);
        mapper.file("manual");

        assert!(mapper.find("photo").unwrap().as_image().is_some());
        assert!(mapper.find("manual").unwrap().as_file().is_some());
        assert!(mapper.find("missing").is_none());
        assert_eq!(mapper.mappings().len(), 2);
    }

    #[test]
    fn test_reregistering_replaces_prior_mapping() {
        let mut mapper = MediaMapper::new();
        mapper.image("media").width(200);
        mapper.file("media");

        let mapping = mapper.find("media").unwrap();
        assert_eq!(mapping.kind(), MediaKind::File);
        assert_eq!(mapper.mappings().len(), 1);
    }

    #[test]
    fn test_register_by_kind() {
        let mut mapper = MediaMapper::new();
        let mapping = mapper.register(MediaKind::Image, "photo");
        mapping.as_image_mut().unwrap().width(640);

        let stored = mapper.find("photo").unwrap().as_image().unwrap();
        assert_eq!(stored.size(), (Some(640), None));
    }

    #[test]
    fn test_template_strips_trailing_separators() {
        let mut mapper = MediaMapper::new();
        mapper.base_upload_dir("uploads/avatars/");
        let record = TestRecord::new(Some("7"));
        assert_eq!(mapper.resolve_base_upload_dir(&record), "uploads/avatars");
    }

    #[test]
    fn test_template_substitution_reflects_live_field_state() {
        let mut mapper = MediaMapper::new();
        mapper.base_upload_dir("users/{slug}/media");

        let record = TestRecord::new(Some("7")).with_field("slug", "alice");
        assert_eq!(mapper.resolve_base_upload_dir(&record), "users/alice/media");

        // Not cached: a changed field value shows up on the next call.
        let record = TestRecord::new(Some("7")).with_field("slug", "bob");
        assert_eq!(mapper.resolve_base_upload_dir(&record), "users/bob/media");
    }

    #[test]
    fn test_template_with_missing_field_substitutes_empty() {
        let mut mapper = MediaMapper::new();
        mapper.base_upload_dir("users/{slug}/media");
        let record = TestRecord::new(None);
        assert_eq!(mapper.resolve_base_upload_dir(&record), "users//media");
    }

    #[test]
    fn test_fallback_dir_is_stable_across_calls() {
        let mapper = MediaMapper::new();
        let record = TestRecord::new(Some("42"));

        let first = mapper.resolve_base_upload_dir(&record);
        let second = mapper.resolve_base_upload_dir(&record);
        assert_eq!(first, second);

        let expected_prefix = format!("user_profile/{}/", utils::short_hash("42"));
        assert!(first.starts_with(&expected_prefix), "got {first}");
    }

    #[test]
    fn test_fallback_dir_without_primary_key() {
        let mapper = MediaMapper::new();
        let record = TestRecord::new(None);

        let dir = mapper.resolve_base_upload_dir(&record);
        assert!(dir.starts_with("user_profile/"));
        // type segment + single random segment
        assert_eq!(dir.split('/').count(), 2);
    }

    #[test]
    fn test_fallback_dirs_differ_between_mappers() {
        let record = TestRecord::new(None);
        let a = MediaMapper::new().resolve_base_upload_dir(&record);
        let b = MediaMapper::new().resolve_base_upload_dir(&record);
        assert_ne!(a, b);
    }
}
