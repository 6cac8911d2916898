//! Service configuration.
//!
//! An explicit configuration struct handed to the media service at
//! construction. Mappings that reference a generator by name are resolved
//! against the registry here; unknown names are a fatal configuration error.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::MediaError;
use crate::mapping::PathGeneratorRef;
use crate::path::{DefaultPathGenerator, PathGenerator};

/// When superseded media should be removed from storage.
///
/// The host persistence layer decides the moment; the media service only
/// honors `Never` by refusing to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Never delete automatically; callers manage storage themselves.
    Never,
    /// Delete as soon as a field's value is replaced.
    OnSet,
    /// Delete after the owning record has been saved successfully.
    #[default]
    OnSave,
}

/// Configuration for the media service.
#[derive(Clone)]
pub struct MediaConfig {
    /// Generator used by mappings that do not name one of their own.
    pub path_generator: Arc<dyn PathGenerator>,
    /// Named generators resolvable from `generate_path_with_named`.
    pub generators: HashMap<String, Arc<dyn PathGenerator>>,
    /// Encoding quality applied when a mapping leaves its quality unset.
    pub default_quality: u8,
    /// Cleanup timing for superseded media.
    pub cleanup: CleanupPolicy,
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            path_generator: Arc::new(DefaultPathGenerator),
            generators: HashMap::new(),
            default_quality: 100,
            cleanup: CleanupPolicy::OnSave,
        }
    }
}

impl MediaConfig {
    /// Register a generator under a name mappings can reference.
    pub fn register_generator(
        &mut self,
        name: impl Into<String>,
        generator: Arc<dyn PathGenerator>,
    ) -> &mut Self {
        self.generators.insert(name.into(), generator);
        self
    }

    /// Resolve the generator a mapping should use. A missing reference falls
    /// back to the default generator; an unknown name is fatal.
    pub fn resolve_generator(
        &self,
        reference: Option<&PathGeneratorRef>,
    ) -> Result<Arc<dyn PathGenerator>, MediaError> {
        match reference {
            None => Ok(Arc::clone(&self.path_generator)),
            Some(PathGeneratorRef::Instance(generator)) => Ok(Arc::clone(generator)),
            Some(PathGeneratorRef::Named(name)) => self
                .generators
                .get(name)
                .cloned()
                .ok_or_else(|| MediaError::InvalidPathGenerator(name.clone())),
        }
    }
}
