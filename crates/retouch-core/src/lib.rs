//! Retouch Core - image state and edit-history engine
//!
//! This crate owns the canonical pixel buffer of an editing session, applies
//! transformations to it deterministically, and keeps a bounded linear
//! undo/redo history.
//!
//! # Module Structure
//!
//! - `decode` / `encode` - Reading and writing common raster formats
//! - `adjustments` - Grayscale, brightness and contrast
//! - `transform` - Blur, edge detection, rotation, flip, resize
//! - `operation` - Serializable description of one edit step
//! - `history` - Snapshot arena with a cursor
//! - `session` - The editor-facing state machine
//! - `viewport` - Fit-to-viewport placement for previews

pub mod adjustments;
pub mod decode;
pub mod encode;
pub mod history;
pub mod luminance;
pub mod operation;
pub mod session;
pub mod transform;
pub mod viewport;

pub use decode::{FilterType, PixelBuffer};
pub use encode::OutputFormat;
pub use history::DEFAULT_HISTORY_LIMIT;
pub use operation::Operation;
pub use session::{EditSession, SessionError};
pub use transform::{FlipAxis, RightAngle};

/// Settings for an [`EditSession`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of snapshots retained in history (minimum 1)
    pub history_limit: usize,
    /// JPEG quality used when saving (1 to 100)
    pub jpeg_quality: u8,
    /// Resampling filter for resize and scale
    pub resize_filter: FilterType,
    /// Whether EXIF orientation is applied when loading
    pub apply_exif_orientation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            jpeg_quality: encode::DEFAULT_JPEG_QUALITY,
            resize_filter: FilterType::Bilinear,
            apply_exif_orientation: true,
        }
    }
}

/// Shape of the current image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageInfo {
    /// Width in pixels (0 when no image is loaded)
    pub width: u32,
    /// Height in pixels (0 when no image is loaded)
    pub height: u32,
    /// Channel count (3 when loaded, 0 otherwise)
    pub channels: u32,
}

impl ImageInfo {
    /// Describe a buffer.
    pub fn of(image: &PixelBuffer) -> Self {
        Self {
            width: image.width,
            height: image.height,
            channels: image.channels(),
        }
    }

    /// Check if this describes "no image"
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
