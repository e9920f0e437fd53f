//! Separable Gaussian blur with an explicit odd kernel size.
//!
//! # Algorithm
//!
//! The kernel size `k` comes straight from the requested intensity. Sigma
//! is derived from the kernel size the way common imaging libraries do when
//! no sigma is given:
//!
//! ```text
//! sigma = 0.3 * ((k - 1) * 0.5 - 1) + 0.8
//! ```
//!
//! The image is convolved horizontally into an `f32` scratch buffer and
//! then vertically back to `u8`. Borders use reflect-101 addressing
//! (`dcb|abcd|cba`), so edge pixels are never darkened by implicit zeros.
//!
//! # Wide kernels
//!
//! Reflect-101 addressing repeats every `2 * (len - 1)` samples, so a kernel
//! longer than that period is folded onto it before convolving. Per-pixel
//! work is bounded by the image size, not by the intensity.
//!
//! The kernel size itself is capped at `64 * max(width, height) + 1`. At
//! that size the folded weights are flat to well below one grey level, so
//! larger intensities give the same result.

use crate::decode::{PixelBuffer, CHANNELS};

/// Kernel sizes are capped at this many multiples of the longer side.
const KERNEL_CAP_FACTOR: usize = 64;

/// Clamp an intensity to >= 1 and bump even values to the next odd size.
///
/// # Example
///
/// ```
/// use retouch_core::transform::normalize_kernel_size;
///
/// assert_eq!(normalize_kernel_size(4), 5);
/// assert_eq!(normalize_kernel_size(5), 5);
/// assert_eq!(normalize_kernel_size(-3), 1);
/// ```
pub fn normalize_kernel_size(intensity: i32) -> usize {
    let k = intensity.max(1) as usize;
    if k % 2 == 0 {
        k + 1
    } else {
        k
    }
}

/// Blur an image with a `k x k` Gaussian, where `k` is the normalized
/// intensity (see [`normalize_kernel_size`]).
pub fn blur(image: &PixelBuffer, intensity: i32) -> PixelBuffer {
    if image.is_empty() {
        return image.clone();
    }
    let (w, h) = (image.width as usize, image.height as usize);
    let size = normalize_kernel_size(intensity).min(max_kernel_size(w, h));
    if size == 1 {
        return image.clone();
    }

    let kernel = gaussian_kernel(size);
    let radius = (size / 2) as i64;
    let taps_x = fold_kernel(&kernel, w);
    let taps_y = fold_kernel(&kernel, h);

    // Horizontal pass
    let mut scratch = vec![0.0f32; w * h * CHANNELS];
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (i, weight) in taps_x.iter().enumerate() {
                let sx = reflect_101(x as i64 + i as i64 - radius, w);
                let idx = (row + sx) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += image.pixels[idx + c] as f32 * weight;
                }
            }
            let dst = (row + x) * CHANNELS;
            scratch[dst..dst + CHANNELS].copy_from_slice(&acc);
        }
    }

    // Vertical pass
    let mut output = vec![0u8; w * h * CHANNELS];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (i, weight) in taps_y.iter().enumerate() {
                let sy = reflect_101(y as i64 + i as i64 - radius, h);
                let idx = (sy * w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += scratch[idx + c] * weight;
                }
            }
            let dst = (y * w + x) * CHANNELS;
            for c in 0..CHANNELS {
                output[dst + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    PixelBuffer::new(image.width, image.height, output)
}

/// Largest kernel size used for a `width x height` image. Always odd.
#[inline]
fn max_kernel_size(width: usize, height: usize) -> usize {
    width
        .max(height)
        .saturating_mul(KERNEL_CAP_FACTOR)
        .saturating_add(1)
        | 1
}

/// Fold `kernel` onto the reflect-101 period of an axis with `len` samples.
///
/// Tap `i` still sits at offset `i - radius`. Taps one period apart read
/// the same sample, so their weights are summed into one slot.
fn fold_kernel(kernel: &[f32], len: usize) -> Vec<f32> {
    if len == 1 {
        // Every tap reads the only sample
        return vec![kernel.iter().sum()];
    }
    let period = 2 * (len - 1);
    if kernel.len() <= period {
        return kernel.to_vec();
    }

    let mut folded = vec![0.0f32; period];
    for (i, weight) in kernel.iter().enumerate() {
        folded[i % period] += weight;
    }
    folded
}

/// Sigma used for a kernel of `size` taps.
#[inline]
fn sigma_for(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for an odd `size`.
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = sigma_for(size);
    let center = (size / 2) as f64;
    let denom = 2.0 * sigma * sigma;

    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();

    raw.into_iter().map(|v| (v / sum) as f32).collect()
}

/// Map an out-of-range index into `0..len` by mirroring without repeating
/// the edge sample.
#[inline]
fn reflect_101(index: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let i = index.rem_euclid(period);
    if i >= len as i64 {
        (period - i) as usize
    } else {
        i as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_normalize_kernel_size() {
        assert_eq!(normalize_kernel_size(0), 1);
        assert_eq!(normalize_kernel_size(1), 1);
        assert_eq!(normalize_kernel_size(2), 3);
        assert_eq!(normalize_kernel_size(4), 5);
        assert_eq!(normalize_kernel_size(7), 7);
    }

    #[test]
    fn test_even_intensity_matches_next_odd() {
        let img = checkerboard(12, 9);
        assert_eq!(blur(&img, 4), blur(&img, 5));
        assert_eq!(blur(&img, 10), blur(&img, 11));
    }

    #[test]
    fn test_non_positive_intensity_is_identity() {
        let img = checkerboard(5, 5);
        assert_eq!(blur(&img, 0), img);
        assert_eq!(blur(&img, -7), img);
        assert_eq!(blur(&img, 1), img);
    }

    #[test]
    fn test_blur_preserves_uniform_image() {
        let img = PixelBuffer::filled(10, 6, [90, 140, 210]);
        assert_eq!(blur(&img, 7), img);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let img = checkerboard(16, 16);
        let out = blur(&img, 5);

        let [v, _, _] = out.pixel(8, 8);
        assert!(v > 60 && v < 195, "center should be mid-gray, got {}", v);
    }

    #[test]
    fn test_blur_preserves_dimensions() {
        let img = checkerboard(7, 3);
        let out = blur(&img, 9);
        assert_eq!((out.width, out.height), (7, 3));
        assert_eq!(out.pixels.len(), img.pixels.len());
    }

    #[test]
    fn test_blur_single_pixel() {
        let img = PixelBuffer::filled(1, 1, [42, 43, 44]);
        assert_eq!(blur(&img, 15), img);
    }

    /// Direct convolution with the unfolded kernel.
    fn blur_unfolded(image: &PixelBuffer, size: usize) -> PixelBuffer {
        let kernel = gaussian_kernel(size);
        let radius = (size / 2) as i64;
        let (w, h) = (image.width as usize, image.height as usize);
        let mut rows = vec![0.0f32; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                for (i, weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as i64 + i as i64 - radius, w);
                    for c in 0..3 {
                        rows[(y * w + x) * 3 + c] +=
                            image.pixels[(y * w + sx) * 3 + c] as f32 * weight;
                    }
                }
            }
        }
        let mut out = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    let acc: f32 = kernel
                        .iter()
                        .enumerate()
                        .map(|(i, weight)| {
                            let sy = reflect_101(y as i64 + i as i64 - radius, h);
                            rows[(sy * w + x) * 3 + c] * weight
                        })
                        .sum();
                    out[(y * w + x) * 3 + c] = acc.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        PixelBuffer::new(image.width, image.height, out)
    }

    #[test]
    fn test_kernel_wider_than_image() {
        let out = blur(&checkerboard(3, 2), 21);
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.pixels.len(), 18);

        let flat = PixelBuffer::filled(3, 2, [17, 128, 240]);
        assert_eq!(blur(&flat, 21), flat);
    }

    #[test]
    fn test_folded_kernel_matches_direct_convolution() {
        let img = checkerboard(5, 3);
        for size in [5, 9, 11, 31] {
            let folded = blur(&img, size as i32);
            let direct = blur_unfolded(&img, size);
            for (a, b) in folded.pixels.iter().zip(&direct.pixels) {
                assert!((*a as i32 - *b as i32).abs() <= 1, "size {}: {} vs {}", size, a, b);
            }
        }
    }

    #[test]
    fn test_max_intensity_on_tiny_image() {
        let flat = PixelBuffer::filled(2, 2, [10, 20, 30]);
        assert_eq!(blur(&flat, i32::MAX), flat);

        let out = blur(&checkerboard(2, 2), i32::MAX);
        assert_eq!((out.width, out.height), (2, 2));
        assert_eq!(out.pixels.len(), 12);
    }

    #[test]
    fn test_intensity_beyond_cap_matches_cap() {
        let img = checkerboard(4, 3);
        let cap = max_kernel_size(4, 3);
        assert_eq!(cap, 257);
        assert_eq!(blur(&img, i32::MAX), blur(&img, cap as i32));
        assert_eq!(blur(&img, 100_000), blur(&img, cap as i32));
    }

    #[test]
    fn test_fold_kernel_preserves_weight() {
        let kernel = gaussian_kernel(41);
        for len in [1, 2, 3, 7, 40] {
            let folded = fold_kernel(&kernel, len);
            let sum: f32 = folded.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "len {} sums to {}", len, sum);
            assert!(folded.len() <= 41);
        }
        assert_eq!(fold_kernel(&kernel, 2).len(), 2);
        assert_eq!(fold_kernel(&kernel, 40), kernel);
    }

    #[test]
    fn test_malformed_buffer_is_returned_unchanged() {
        let bad = PixelBuffer {
            width: 4,
            height: 4,
            pixels: vec![9; 5],
        };
        assert_eq!(blur(&bad, 7), bad);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        for size in [3, 5, 9, 21] {
            let k = gaussian_kernel(size);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            for i in 0..size / 2 {
                assert!((k[i] - k[size - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn test_sigma_for_known_sizes() {
        assert!((sigma_for(3) - 0.8).abs() < 1e-9);
        assert!((sigma_for(5) - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-4, 2), 0);
        assert_eq!(reflect_101(3, 1), 0);
    }
}
