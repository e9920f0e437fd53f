//! Fit-to-viewport placement for on-screen preview.
//!
//! Stateless: given a buffer and a viewport size, compute a downscaled copy
//! (never upscaled) and the offsets that center it. The editing engine
//! knows nothing about viewports; presentation code calls this with a copy
//! of the current image after each edit.

use crate::decode::{FilterType, PixelBuffer};
use crate::transform::resize;

/// A preview image positioned inside a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportFit {
    /// The (possibly downscaled) preview image.
    pub image: PixelBuffer,
    /// Applied scale factor, at most 1.0.
    pub scale: f64,
    /// Horizontal offset of the image's left edge.
    pub offset_x: i64,
    /// Vertical offset of the image's top edge.
    pub offset_y: i64,
}

/// Compute the preview size for an image inside a viewport.
///
/// Returns `(scale, width, height)`. Scale is
/// `min(viewport_w / w, viewport_h / h)` capped at 1.0; dimensions are
/// truncated and never below 1.
pub fn fit_dimensions(
    width: u32,
    height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> (f64, u32, u32) {
    if width == 0 || height == 0 {
        return (1.0, width, height);
    }

    let scale = (viewport_width as f64 / width as f64)
        .min(viewport_height as f64 / height as f64)
        .min(1.0);

    let new_w = ((width as f64 * scale) as u32).max(1);
    let new_h = ((height as f64 * scale) as u32).max(1);
    (scale, new_w, new_h)
}

/// Scale `image` down to fit the viewport and center it.
///
/// Images that already fit are copied unchanged. Offsets may be negative
/// when a 1-pixel minimum forces the preview past a degenerate viewport.
pub fn fit_to_viewport(
    image: &PixelBuffer,
    viewport_width: u32,
    viewport_height: u32,
) -> ViewportFit {
    let (scale, new_w, new_h) =
        fit_dimensions(image.width, image.height, viewport_width, viewport_height);

    let preview = if scale < 1.0 {
        resize(image, new_w, new_h, FilterType::Bilinear).unwrap_or_else(|| image.clone())
    } else {
        image.clone()
    };

    ViewportFit {
        offset_x: (viewport_width as i64 - preview.width as i64).div_euclid(2),
        offset_y: (viewport_height as i64 - preview.height as i64).div_euclid(2),
        image: preview,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_is_centered_not_upscaled() {
        let img = PixelBuffer::filled(200, 100, [1, 2, 3]);
        let fit = fit_to_viewport(&img, 800, 600);

        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.image, img);
        assert_eq!((fit.offset_x, fit.offset_y), (300, 250));
    }

    #[test]
    fn test_wide_image_is_limited_by_width() {
        let img = PixelBuffer::filled(1600, 400, [0, 0, 0]);
        let fit = fit_to_viewport(&img, 800, 600);

        assert!((fit.scale - 0.5).abs() < 1e-12);
        assert_eq!((fit.image.width, fit.image.height), (800, 200));
        assert_eq!((fit.offset_x, fit.offset_y), (0, 200));
    }

    #[test]
    fn test_tall_image_is_limited_by_height() {
        let (scale, w, h) = fit_dimensions(1000, 3000, 800, 600);
        assert!((scale - 0.2).abs() < 1e-12);
        assert_eq!((w, h), (200, 600));
    }

    #[test]
    fn test_dimensions_are_truncated() {
        // 333 * 0.5 = 166.5 -> 166
        let (_, w, h) = fit_dimensions(1000, 333, 500, 500);
        assert_eq!((w, h), (500, 166));
    }

    #[test]
    fn test_degenerate_viewport_keeps_one_pixel() {
        let (_, w, h) = fit_dimensions(50, 50, 0, 0);
        assert_eq!((w, h), (1, 1));

        let fit = fit_to_viewport(&PixelBuffer::filled(4, 4, [9, 9, 9]), 0, 0);
        assert_eq!((fit.image.width, fit.image.height), (1, 1));
        assert_eq!((fit.offset_x, fit.offset_y), (-1, -1));
    }

    #[test]
    fn test_exact_fit() {
        let img = PixelBuffer::filled(800, 600, [5, 5, 5]);
        let fit = fit_to_viewport(&img, 800, 600);
        assert_eq!(fit.scale, 1.0);
        assert_eq!((fit.offset_x, fit.offset_y), (0, 0));
    }
}
