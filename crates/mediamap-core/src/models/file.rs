use serde::{Deserialize, Serialize};

/// Persisted representation of one stored file.
///
/// This flat keyed structure is the wire format between the media core and
/// the host record's storage column; round-trip fidelity through it is a hard
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    pub filename: String,
    pub path: String,
    pub base_path: String,
    pub size: u64,
    pub extension: String,
    pub mime_type: String,
}

impl File {
    /// Display name with extension, e.g. for download headers.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}
