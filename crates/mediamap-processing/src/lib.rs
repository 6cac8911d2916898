//! Mediamap Processing Library
//!
//! Image decoding, encoding and the transform pipeline that turns an
//! original upload into the sized variants an image mapping describes.

pub mod codec;
pub mod transformer;

// Re-export commonly used types
pub use codec::{decode_image, encode_image, sniff_extension};
pub use transformer::ImageTransformer;
