//! Canny edge detection.
//!
//! The image is reduced to BT.601 luminance, run through a two-threshold
//! Canny operator, and the binary edge map is replicated back to three
//! channels so the result can sit in the edit history like any other
//! buffer.
//!
//! `imageproc`'s Canny smooths its input with a Gaussian (sigma 1.4) and
//! compares the thresholds against the L2 norm of the Sobel gradient. Canny
//! variants that skip the smoothing and use the L1 norm see larger
//! gradients for the same thresholds, so they mark more edges, especially
//! on fine texture. A hard black to white step gives a gradient of roughly
//! 510 here. Steps of less than about 50 grey levels stay below the low
//! threshold.

use imageproc::edges::canny;

use crate::decode::PixelBuffer;
use crate::luminance::to_gray_image;

/// Hysteresis low threshold on the 0-255 gradient scale.
pub const EDGE_LOW_THRESHOLD: f32 = 100.0;

/// Hysteresis high threshold on the 0-255 gradient scale.
pub const EDGE_HIGH_THRESHOLD: f32 = 200.0;

/// Detect edges with the fixed 100/200 thresholds.
///
/// Output pixels are either `[0, 0, 0]` or `[255, 255, 255]`.
pub fn detect_edges(image: &PixelBuffer) -> PixelBuffer {
    detect_edges_with(image, EDGE_LOW_THRESHOLD, EDGE_HIGH_THRESHOLD)
}

/// Detect edges with caller-supplied hysteresis thresholds.
pub fn detect_edges_with(image: &PixelBuffer, low: f32, high: f32) -> PixelBuffer {
    if image.is_empty() {
        return image.clone();
    }
    let Some(gray) = to_gray_image(image) else {
        return image.clone();
    };

    let edges = canny(&gray, low, high.max(low));
    PixelBuffer::from_luma(image.width, image.height, edges.as_raw())
}
