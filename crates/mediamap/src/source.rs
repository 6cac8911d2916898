//! Source normalization.
//!
//! Uploads arrive as one of three source kinds: an already-local file, a
//! fetchable URL, or a base64 data URI. `TempFileUploader` resolves any of
//! them into a [`SourceFile`], a local readable handle with metadata. Every
//! input that cannot be normalized yields `MediaError::InvalidSourceMedia`;
//! there is no silent "no media" outcome.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use bytes::Bytes;
use regex::Regex;
use tempfile::NamedTempFile;

use mediamap_core::MediaError;
use mediamap_processing::sniff_extension;

/// Data URIs are restricted to an allow-listed set of image formats.
fn data_uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^data:image/(png|jpeg|jpg|svg\+xml|svg);base64,(.+)$")
            .expect("data URI pattern is valid")
    })
}

/// The kinds of raw input a media field accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A file already on the local filesystem.
    File(PathBuf),
    /// A fetchable http(s) URL.
    Url(String),
    /// An inline `data:image/...;base64,...` payload.
    DataUri(String),
}

impl MediaSource {
    /// Classify a raw string: `data:` prefixes are data URIs, `http(s)://`
    /// prefixes are URLs, everything else is treated as a local path.
    pub fn detect(raw: &str) -> MediaSource {
        if raw.starts_with("data:") {
            MediaSource::DataUri(raw.to_string())
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            MediaSource::Url(raw.to_string())
        } else {
            MediaSource::File(PathBuf::from(raw))
        }
    }
}

impl From<&Path> for MediaSource {
    fn from(path: &Path) -> Self {
        MediaSource::File(path.to_path_buf())
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        MediaSource::File(path)
    }
}

/// A normalized, locally readable upload.
///
/// When the source was remote or inline, the bytes live in a named temp file
/// whose guard is owned here, so the path stays valid for this handle's
/// lifetime.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    size: u64,
    extension: String,
    mime_type: String,
    _temp: Option<NamedTempFile>,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Read the full contents.
    pub fn read(&self) -> Result<Bytes, MediaError> {
        Ok(Bytes::from(fs::read(&self.path)?))
    }
}

/// Resolves an arbitrary [`MediaSource`] into a local [`SourceFile`].
#[derive(Debug, Default)]
pub struct TempFileUploader {
    client: reqwest::blocking::Client,
}

impl TempFileUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `source` into a locally readable file.
    pub fn get_temp_file(&self, source: &MediaSource) -> Result<SourceFile, MediaError> {
        match source {
            MediaSource::File(path) => self.from_local(path),
            MediaSource::Url(url) => self.from_url(url),
            MediaSource::DataUri(uri) => self.from_data_uri(uri),
        }
    }

    fn from_local(&self, path: &Path) -> Result<SourceFile, MediaError> {
        let metadata = fs::metadata(path).map_err(|e| {
            MediaError::InvalidSourceMedia(format!("unreadable file {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(MediaError::InvalidSourceMedia(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let extension = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
        {
            Some(ext) => ext,
            None => sniffed_extension_of(path)?,
        };

        Ok(SourceFile {
            path: path.to_path_buf(),
            size: metadata.len(),
            mime_type: mime_for_extension(&extension).to_string(),
            extension,
            _temp: None,
        })
    }

    fn from_url(&self, url: &str) -> Result<SourceFile, MediaError> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| MediaError::InvalidSourceMedia(format!("unreachable URL {url}: {e}")))?;

        let data = response
            .bytes()
            .map_err(|e| MediaError::InvalidSourceMedia(format!("failed to read {url}: {e}")))?;

        tracing::debug!(
            url = %url,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched remote media source"
        );

        let extension = url_extension(url)
            .or_else(|| sniff_extension(&data).map(str::to_string))
            .unwrap_or_else(|| "bin".to_string());

        Self::into_temp_file(&data, extension)
    }

    fn from_data_uri(&self, uri: &str) -> Result<SourceFile, MediaError> {
        let captures = data_uri_regex().captures(uri).ok_or_else(|| {
            MediaError::InvalidSourceMedia("malformed or disallowed data URI".to_string())
        })?;

        let format = &captures[1];
        let payload = &captures[2];

        // Reject anything outside the base64 alphabet before decoding.
        if !payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
        {
            return Err(MediaError::InvalidSourceMedia(
                "data URI payload is not valid base64".to_string(),
            ));
        }

        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;
        let data = STANDARD.decode(payload).map_err(|e| {
            MediaError::InvalidSourceMedia(format!("data URI payload is not valid base64: {e}"))
        })?;

        let extension = match format {
            "jpeg" => "jpg",
            "svg+xml" => "svg",
            other => other,
        };

        Self::into_temp_file(&data, extension.to_string())
    }

    fn into_temp_file(data: &[u8], extension: String) -> Result<SourceFile, MediaError> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(data)?;
        temp.flush()?;

        Ok(SourceFile {
            path: temp.path().to_path_buf(),
            size: data.len() as u64,
            mime_type: mime_for_extension(&extension).to_string(),
            extension,
            _temp: Some(temp),
        })
    }
}

fn sniffed_extension_of(path: &Path) -> Result<String, MediaError> {
    let data = fs::read(path)?;
    Ok(sniff_extension(&data).unwrap_or("bin").to_string())
}

/// Extension from a URL's final path segment, ignoring query and fragment.
fn url_extension(url: &str) -> Option<String> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()?;
    let (_, ext) = path.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    #[test]
    fn test_detect_classifies_sources() {
        assert!(matches!(
            MediaSource::detect("data:image/png;base64,AAAA"),
            MediaSource::DataUri(_)
        ));
        assert!(matches!(
            MediaSource::detect("https://example.com/a.png"),
            MediaSource::Url(_)
        ));
        assert!(matches!(
            MediaSource::detect("uploads/a.png"),
            MediaSource::File(_)
        ));
    }

    #[test]
    fn test_local_file_passes_through_without_copy() {
        let mut temp = NamedTempFile::with_suffix(".pdf").unwrap();
        temp.write_all(b"%PDF-1.4").unwrap();

        let uploader = TempFileUploader::new();
        let source = MediaSource::File(temp.path().to_path_buf());
        let file = uploader.get_temp_file(&source).unwrap();

        assert_eq!(file.path(), temp.path());
        assert_eq!(file.size(), 8);
        assert_eq!(file.extension(), "pdf");
        assert_eq!(file.mime_type(), "application/pdf");
        assert_eq!(file.read().unwrap(), Bytes::from_static(b"%PDF-1.4"));
    }

    #[test]
    fn test_missing_local_file_is_invalid_source() {
        let uploader = TempFileUploader::new();
        let source = MediaSource::File(PathBuf::from("/nonexistent/upload.png"));
        assert!(matches!(
            uploader.get_temp_file(&source),
            Err(MediaError::InvalidSourceMedia(_))
        ));
    }

    #[test]
    fn test_data_uri_decodes_to_temp_file() {
        let payload = STANDARD.encode(b"<svg/>");
        let uri = format!("data:image/svg+xml;base64,{payload}");

        let uploader = TempFileUploader::new();
        let file = uploader.get_temp_file(&MediaSource::DataUri(uri)).unwrap();

        assert_eq!(file.extension(), "svg");
        assert_eq!(file.mime_type(), "image/svg+xml");
        assert_eq!(file.read().unwrap(), Bytes::from_static(b"<svg/>"));
    }

    #[test]
    fn test_data_uri_with_unlisted_format_is_rejected() {
        let payload = STANDARD.encode(b"GIF89a");
        let uri = format!("data:image/gif;base64,{payload}");

        let uploader = TempFileUploader::new();
        assert!(matches!(
            uploader.get_temp_file(&MediaSource::DataUri(uri)),
            Err(MediaError::InvalidSourceMedia(_))
        ));
    }

    #[test]
    fn test_data_uri_with_invalid_base64_is_rejected() {
        let uploader = TempFileUploader::new();
        let uri = "data:image/png;base64,not base64!".to_string();
        assert!(matches!(
            uploader.get_temp_file(&MediaSource::DataUri(uri)),
            Err(MediaError::InvalidSourceMedia(_))
        ));
    }

    #[test]
    fn test_url_extension_ignores_query_and_fragment() {
        assert_eq!(
            url_extension("https://example.com/a/photo.PNG?w=1#top"),
            Some("png".to_string())
        );
        assert_eq!(url_extension("https://example.com/download"), None);
        assert_eq!(url_extension("https://example.com/archive.tar.gz"), Some("gz".to_string()));
    }
}
