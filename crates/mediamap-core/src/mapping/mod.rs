//! Declarative media mappings and the per-record registry.

mod file_mapping;
mod image_mapping;
mod mapper;

pub use file_mapping::{FileMapping, PathGeneratorRef};
pub use image_mapping::{ConversionSettings, ImageMapping};
pub use mapper::{MediaMapper, MediaMapping};
