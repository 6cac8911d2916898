//! Image byte codecs.
//!
//! Decoding guesses the format from the bytes rather than trusting the
//! extension, so a mislabeled upload still decodes (or fails loudly).

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use mediamap_core::MediaError;

/// Decode raw bytes into an image, sniffing the format from the content.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, MediaError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| MediaError::InvalidImageData(e.to_string()))?;

    reader
        .decode()
        .map_err(|e| MediaError::InvalidImageData(e.to_string()))
}

/// Encode an image into the format implied by `extension`.
///
/// Jpeg honors `quality` (0-100); other formats encode at their native
/// settings since the underlying encoders take no quality knob.
pub fn encode_image(
    image: &DynamicImage,
    extension: &str,
    quality: u8,
) -> Result<Bytes, MediaError> {
    let mut out = Cursor::new(Vec::new());

    match extension {
        "jpg" | "jpeg" => {
            // Jpeg has no alpha channel.
            let encoder = JpegEncoder::new_with_quality(&mut out, quality.min(100));
            image
                .to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| MediaError::Encode(e.to_string()))?;
        }
        _ => {
            let format = ImageFormat::from_extension(extension).ok_or_else(|| {
                MediaError::Encode(format!("unsupported image extension: {extension}"))
            })?;
            image
                .write_to(&mut out, format)
                .map_err(|e| MediaError::Encode(e.to_string()))?;
        }
    }

    Ok(Bytes::from(out.into_inner()))
}

/// Sniff a file extension from image bytes, for sources that carry none.
pub fn sniff_extension(data: &[u8]) -> Option<&'static str> {
    match image::guess_format(data).ok()? {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}
