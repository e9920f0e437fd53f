//! Luminance calculation using ITU-R BT.601 coefficients.
//!
//! These are the weights used by conventional RGB to grayscale conversion in
//! desktop imaging libraries, and they feed both grayscale conversion and the
//! edge detector's single-channel input.

use crate::decode::PixelBuffer;

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.114;

/// Calculate luminance from u8 RGB values (0 to 255).
///
/// # Returns
/// Luminance value (0-255), rounded to nearest.
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Collapse an RGB buffer into one luminance byte per pixel.
pub fn luma_plane(image: &PixelBuffer) -> Vec<u8> {
    image
        .pixels
        .chunks_exact(3)
        .map(|px| calculate_luminance_u8(px[0], px[1], px[2]))
        .collect()
}

/// Collapse an RGB buffer into an `image::GrayImage`.
pub fn to_gray_image(image: &PixelBuffer) -> Option<image::GrayImage> {
    image::GrayImage::from_raw(image.width, image.height, luma_plane(image))
}
