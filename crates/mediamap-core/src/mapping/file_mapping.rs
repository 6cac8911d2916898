use std::fmt;
use std::sync::Arc;

use crate::path::PathGenerator;

/// Reference to the path generator a mapping should use.
///
/// `Named` entries are resolved through the `MediaConfig` generator registry
/// when a path is generated; unknown names surface
/// `MediaError::InvalidPathGenerator` there.
#[derive(Clone)]
pub enum PathGeneratorRef {
    Named(String),
    Instance(Arc<dyn PathGenerator>),
}

impl fmt::Debug for PathGeneratorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathGeneratorRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            PathGeneratorRef::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// Declarative descriptor of how one field's file is named and stored.
///
/// Builder methods mutate in place and return `&mut Self` for chaining.
#[derive(Debug, Clone)]
pub struct FileMapping {
    key: String,
    file_name: Option<String>,
    path_generator: Option<PathGeneratorRef>,
}

impl FileMapping {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        FileMapping {
            key: key.into(),
            file_name: None,
            path_generator: None,
        }
    }

    /// Override the stored file name (defaults to the field key).
    pub fn name(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.file_name = Some(file_name.into());
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
}
