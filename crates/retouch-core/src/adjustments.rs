//! Per-pixel tonal adjustments
//!
//! Grayscale conversion and linear brightness/contrast. All arithmetic
//! saturates at [0, 255]; nothing here wraps.

use crate::decode::PixelBuffer;
use crate::luminance::luma_plane;

/// Lowest accepted brightness offset.
pub const BRIGHTNESS_MIN: i32 = -100;
/// Highest accepted brightness offset.
pub const BRIGHTNESS_MAX: i32 = 100;
/// Lowest accepted contrast gain.
pub const CONTRAST_MIN: f32 = 0.5;
/// Highest accepted contrast gain.
pub const CONTRAST_MAX: f32 = 3.0;

/// Convert to luminance and replicate it back into all three channels.
///
/// # Example
/// ```
/// use retouch_core::decode::PixelBuffer;
/// use retouch_core::adjustments::grayscale;
///
/// let img = PixelBuffer::filled(1, 1, [255, 0, 0]);
/// assert_eq!(grayscale(&img).pixels, vec![76, 76, 76]);
/// ```
pub fn grayscale(image: &PixelBuffer) -> PixelBuffer {
    if image.is_empty() {
        return image.clone();
    }
    PixelBuffer::from_luma(image.width, image.height, &luma_plane(image))
}

/// Add a constant offset to every channel.
///
/// The offset is clamped to -100..=100 first.
pub fn adjust_brightness(image: &PixelBuffer, value: i32) -> PixelBuffer {
    let offset = value.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX) as i16;
    map_channels(image, |v| (v as i16 + offset).clamp(0, 255) as u8)
}

/// Multiply every channel by a gain, with no offset.
///
/// The gain is clamped to 0.5..=3.0 first; NaN is treated as the
/// lowest gain. Results are rounded to nearest before saturating.
pub fn adjust_contrast(image: &PixelBuffer, factor: f32) -> PixelBuffer {
    let gain = if factor.is_nan() {
        CONTRAST_MIN
    } else {
        factor.clamp(CONTRAST_MIN, CONTRAST_MAX)
    };
    map_channels(image, |v| (v as f32 * gain).round().clamp(0.0, 255.0) as u8)
}

#[inline]
fn map_channels(image: &PixelBuffer, f: impl Fn(u8) -> u8) -> PixelBuffer {
    if image.is_empty() {
        return image.clone();
    }
    PixelBuffer::new(
        image.width,
        image.height,
        image.pixels.iter().map(|&v| f(v)).collect(),
    )
}
