//! Transform pipeline for image mappings.
//!
//! Each mapping is applied to a freshly decoded original in three steps:
//! resize, canvas resize, then fit. Steps whose dimensions are unset are
//! skipped, so an empty mapping passes the image through untouched.

use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use mediamap_core::ImageMapping;

/// Applies the sizing steps of an [`ImageMapping`] to a decoded image.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        ImageTransformer
    }

    /// Run the mapping's transform steps and return the result.
    pub fn transform_with(&self, image: &DynamicImage, mapping: &ImageMapping) -> DynamicImage {
        let mut current = image.clone();

        if mapping.should_resize() {
            let (width, height) = mapping.size();
            current = Self::resize(
                &current,
                width,
                height,
                mapping.should_keep_aspect_ratio(),
            );
        }

        if mapping.should_resize_canvas() {
            let (width, height) = mapping.canvas_size();
            current = Self::resize_canvas(&current, width, height);
        }

        if let Some((width, height)) = mapping.fit_size() {
            current = Self::fit(&current, width, height);
        }

        tracing::debug!(
            key = %mapping.key(),
            width = current.width(),
            height = current.height(),
            "Image transform complete"
        );

        current
    }

    /// Select appropriate filter type based on resize ratio
    fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }

    /// Resize with optional aspect-ratio preservation.
    ///
    /// With aspect preserved, a single dimension scales the other
    /// proportionally and two dimensions bound the image to fit within them.
    /// Without it, the image is stretched to the given dimensions, with a
    /// missing one held at the original.
    fn resize(
        image: &DynamicImage,
        width: Option<u32>,
        height: Option<u32>,
        keep_aspect_ratio: bool,
    ) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();

        let (target_width, target_height) = if keep_aspect_ratio {
            match (width, height) {
                (Some(w), Some(h)) => {
                    let scale =
                        (w as f32 / orig_width as f32).min(h as f32 / orig_height as f32);
                    (
                        ((orig_width as f32 * scale).round() as u32).max(1),
                        ((orig_height as f32 * scale).round() as u32).max(1),
                    )
                }
                (Some(w), None) => {
                    let h = (w as f32 * orig_height as f32 / orig_width as f32).round() as u32;
                    (w, h.max(1))
                }
                (None, Some(h)) => {
                    let w = (h as f32 * orig_width as f32 / orig_height as f32).round() as u32;
                    (w.max(1), h)
                }
                (None, None) => (orig_width, orig_height),
            }
        } else {
            (width.unwrap_or(orig_width), height.unwrap_or(orig_height))
        };

        if (target_width, target_height) == (orig_width, orig_height) {
            return image.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, target_width, target_height);
        image.resize_exact(target_width, target_height, filter)
    }

    /// Re-center the image on a canvas of the given size without scaling it.
    ///
    /// A larger canvas pads with transparency, a smaller one crops. A missing
    /// dimension keeps the current one.
    fn resize_canvas(image: &DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();
        let canvas_width = width.unwrap_or(orig_width);
        let canvas_height = height.unwrap_or(orig_height);

        if (canvas_width, canvas_height) == (orig_width, orig_height) {
            return image.clone();
        }

        let canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
        let mut canvas = DynamicImage::ImageRgba8(canvas);

        // Signed offsets so an oversized image center-crops.
        let x_offset = (canvas_width as i64 - orig_width as i64) / 2;
        let y_offset = (canvas_height as i64 - orig_height as i64) / 2;
        imageops::overlay(&mut canvas, image, x_offset, y_offset);

        canvas
    }

    /// Crop-and-scale to exactly the given size, preserving aspect ratio by
    /// trimming overflow from the centered image.
    fn fit(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        image.resize_to_fill(width, height, filter)
    }
}
