//! Encoding of the current image for saving.
//!
//! The output format is chosen from the destination path's extension, the
//! same way a desktop "Save As" infers the format from the file name.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::decode::{PixelBuffer, CHANNELS};

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Errors that can occur while encoding or writing an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The destination extension does not map to a supported format
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The codec rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the encoded bytes failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Output container formats supported for saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
}

impl OutputFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::UnsupportedFormat` when the path has no
    /// extension or the extension is not recognized.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| EncodeError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Encode a buffer to bytes in the given format.
///
/// `jpeg_quality` is only used for [`OutputFormat::Jpeg`] and is clamped
/// to 1..=100.
pub fn encode_image(
    image: &PixelBuffer,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let pixels = image.pixels.as_slice();

    let result = match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100))
                .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Bmp => {
            BmpEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a buffer using the format inferred from `path` and write it there.
///
/// The bytes go to a temporary file in the destination directory, which is
/// then renamed over `path`. A failed write leaves any existing file intact.
pub fn write_image(
    image: &PixelBuffer,
    path: impl AsRef<Path>,
    jpeg_quality: u8,
) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let bytes = encode_image(image, format, jpeg_quality)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io = |e: std::io::Error| EncodeError::Io(e.to_string());

    let mut file = NamedTempFile::new_in(dir).map_err(io)?;
    file.write_all(&bytes).map_err(io)?;
    file.as_file().sync_all().map_err(io)?;
    match_permissions(file.as_file(), path).map_err(io)?;
    file.persist(path).map_err(|e| io(e.error))?;
    Ok(())
}

/// Give the temporary file the mode of the file it replaces, or 0644 for a
/// new file. Temporary files are created owner-only.
#[cfg(unix)]
fn match_permissions(file: &std::fs::File, path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)
        .map(|meta| meta.permissions().mode())
        .unwrap_or(0o644);
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn match_permissions(_file: &std::fs::File, _path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(128);
            }
        }
        PixelBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("a/b/photo.JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path("photo.jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path("out.png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("out.Bmp").unwrap(), OutputFormat::Bmp);
    }

    #[test]
    fn test_format_from_path_unsupported() {
        assert!(matches!(
            OutputFormat::from_path("notes.txt"),
            Err(EncodeError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            OutputFormat::from_path("no_extension"),
            Err(EncodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let bytes = encode_image(&gradient(40, 30), OutputFormat::Jpeg, 90).unwrap();

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_image(&gradient(8, 8), OutputFormat::Png, 0).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_bmp_signature() {
        let bytes = encode_image(&gradient(5, 3), OutputFormat::Bmp, 0).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
    }

    #[test]
    fn test_png_is_lossless() {
        let img = gradient(16, 9);
        let bytes = encode_image(&img, OutputFormat::Png, 0).unwrap();
        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_jpeg_quality_clamping() {
        let img = PixelBuffer::filled(10, 10, [128, 128, 128]);
        assert!(encode_image(&img, OutputFormat::Jpeg, 0).is_ok());
        assert!(encode_image(&img, OutputFormat::Jpeg, 255).is_ok());
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let img = PixelBuffer {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        let result = encode_image(&img, OutputFormat::Png, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_short_pixel_data() {
        let img = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10 * 9 * 3],
        };
        let result = encode_image(&img, OutputFormat::Jpeg, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_write_image_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        write_image(&gradient(4, 4), &path, DEFAULT_JPEG_QUALITY).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(crate::decode::decode_image(&bytes).unwrap(), gradient(4, 4));
    }

    #[test]
    fn test_write_image_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        std::fs::write(&path, b"stale contents").unwrap();

        write_image(&gradient(6, 2), &path, DEFAULT_JPEG_QUALITY).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(crate::decode::decode_image(&bytes).unwrap(), gradient(6, 2));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.bmp")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_image(&gradient(2, 2), &path, DEFAULT_JPEG_QUALITY).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"previous save").unwrap();

        let bad = PixelBuffer {
            width: 3,
            height: 3,
            pixels: vec![0u8; 4],
        };
        assert!(write_image(&bad, &path, DEFAULT_JPEG_QUALITY).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous save");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_image_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let result = write_image(&gradient(4, 4), &path, DEFAULT_JPEG_QUALITY);
        assert!(matches!(result, Err(EncodeError::Io(_))));
    }
}
