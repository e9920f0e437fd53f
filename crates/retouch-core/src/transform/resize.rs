//! Absolute and percentage resizing.
//!
//! Resampling goes through the `image` crate's filters. Both entry points
//! treat a non-positive target size as a no-op: the input is returned
//! unchanged rather than an error being raised.

use crate::decode::{FilterType, PixelBuffer};

/// Smallest accepted scale percentage.
pub const SCALE_PERCENT_MIN: i32 = 25;
/// Largest accepted scale percentage.
pub const SCALE_PERCENT_MAX: i32 = 200;

/// Resize an image to exact dimensions.
///
/// Returns `None` if either target dimension is zero, leaving the caller
/// to decide what a no-op means for it.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Option<PixelBuffer> {
    if width == 0 || height == 0 {
        return None;
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Some(image.clone());
    }

    let rgb_image = image.to_rgb_image()?;
    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Some(PixelBuffer::from_rgb_image(resized))
}

/// Target dimensions for scaling `width x height` by `percent`.
///
/// The percentage is clamped to 25..=200 and each side is rounded to the
/// nearest pixel.
///
/// # Example
///
/// ```
/// use retouch_core::transform::scaled_dimensions;
///
/// assert_eq!(scaled_dimensions(101, 50, 50), (51, 25));
/// assert_eq!(scaled_dimensions(100, 50, 500), (200, 100));
/// ```
pub fn scaled_dimensions(width: u32, height: u32, percent: i32) -> (u32, u32) {
    let percent = percent.clamp(SCALE_PERCENT_MIN, SCALE_PERCENT_MAX) as f64;
    let scale = |dim: u32| (dim as f64 * percent / 100.0).round() as u32;
    (scale(width), scale(height))
}

/// Scale an image proportionally by a clamped percentage.
///
/// Returns `None` when the rounded target collapses to zero pixels
/// (e.g. a 1-pixel-wide image at 25%).
pub fn scale_percent(image: &PixelBuffer, percent: i32, filter: FilterType) -> Option<PixelBuffer> {
    let (width, height) = scaled_dimensions(image.width, image.height, percent);
    resize(image, width, height, filter)
}
