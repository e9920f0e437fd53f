//! The edit session: original image, history, and the editor actions.
//!
//! An [`EditSession`] is either *empty* (nothing loaded) or *loaded*
//! (history non-empty, cursor valid). Every mutating call on an empty
//! session is a harmless no-op that reports `false`; nothing here panics
//! on a malformed call sequence.
//!
//! Callers only ever receive copies of snapshots, so a buffer handed out
//! for display can't be used to reach back into the history.
//!
//! The session isn't internally synchronized. A multi-threaded host
//! should wrap the whole session in one `Mutex`, since undo, redo and
//! append all update the history and cursor together.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decode::{decode_image, decode_image_no_orientation, DecodeError, PixelBuffer};
use crate::encode::{encode_image, write_image, EncodeError, OutputFormat};
use crate::history::History;
use crate::operation::Operation;
use crate::{ImageInfo, SessionConfig};

/// Failure outcomes of session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The source could not be read or decoded.
    #[error("could not decode image: {0}")]
    Decode(#[from] DecodeError),

    /// The current image could not be encoded or written.
    #[error("could not encode image: {0}")]
    Encode(#[from] EncodeError),

    /// No image has been loaded yet.
    #[error("no image loaded")]
    NoActiveImage,

    /// The cursor is already at the oldest retained snapshot.
    #[error("nothing to undo")]
    NoHistoryToUndo,

    /// The cursor is already at the newest snapshot.
    #[error("nothing to redo")]
    NoHistoryToRedo,
}

/// Image state and edit history.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    config: SessionConfig,
    original: Option<PixelBuffer>,
    history: History,
}

impl EditSession {
    /// Create an empty session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with explicit settings.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            history: History::new(config.history_limit),
            config,
            original: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------

    /// Read and decode an image file, replacing any current session state.
    ///
    /// On failure the session is left exactly as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<ImageInfo, SessionError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to read image");
            SessionError::Decode(DecodeError::IoError(e.to_string()))
        })?;

        let info = self.load_bytes(&bytes)?;
        info!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            "loaded image"
        );
        Ok(info)
    }

    /// Decode an in-memory image, replacing any current session state.
    ///
    /// On failure the session is left exactly as it was.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<ImageInfo, SessionError> {
        let decoded = if self.config.apply_exif_orientation {
            decode_image(bytes)
        } else {
            decode_image_no_orientation(bytes)
        }
        .map_err(|e| {
            warn!(error = %e, "failed to decode image");
            SessionError::Decode(e)
        })?;

        self.history.restart(decoded.clone());
        self.original = Some(decoded);
        Ok(self.info())
    }

    /// Encode the current image using the format implied by `path`'s
    /// extension and write it. History is never touched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let current = self.history.current().ok_or(SessionError::NoActiveImage)?;

        write_image(current, path, self.config.jpeg_quality).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to save image");
            SessionError::Encode(e)
        })?;
        info!(path = %path.display(), "saved image");
        Ok(())
    }

    /// Encode the current image to bytes.
    pub fn encode_current(&self, format: OutputFormat) -> Result<Vec<u8>, SessionError> {
        let current = self.history.current().ok_or(SessionError::NoActiveImage)?;
        Ok(encode_image(current, format, self.config.jpeg_quality)?)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Apply an operation to the current image and record the result.
    ///
    /// Returns `false` (and records nothing) when no image is loaded or the
    /// operation is a no-op for the current image.
    pub fn apply(&mut self, op: Operation) -> bool {
        let Some(current) = self.history.current() else {
            debug!(op = op.name(), "ignoring operation on empty session");
            return false;
        };

        match op.apply(current, &self.config) {
            Some(next) => {
                debug!(op = op.name(), width = next.width, height = next.height, "applied");
                self.history.push(next);
                true
            }
            None => {
                debug!(op = op.name(), "operation was a no-op");
                false
            }
        }
    }

    pub fn grayscale(&mut self) -> bool {
        self.apply(Operation::Grayscale)
    }

    pub fn blur(&mut self, intensity: i32) -> bool {
        self.apply(Operation::Blur { intensity })
    }

    pub fn detect_edges(&mut self) -> bool {
        self.apply(Operation::DetectEdges)
    }

    pub fn adjust_brightness(&mut self, value: i32) -> bool {
        self.apply(Operation::Brightness { value })
    }

    pub fn adjust_contrast(&mut self, factor: f32) -> bool {
        self.apply(Operation::Contrast { factor })
    }

    /// Rotate clockwise by 90, 180 or 270 degrees.
    ///
    /// Any other angle is silently ignored and returns `false`.
    pub fn rotate(&mut self, degrees: i32) -> bool {
        match Operation::rotate_degrees(degrees) {
            Some(op) => self.apply(op),
            None => {
                debug!(degrees, "ignoring unsupported rotation angle");
                false
            }
        }
    }

    /// Flip `"horizontal"` or `"vertical"`.
    ///
    /// Any other direction is silently ignored and returns `false`.
    pub fn flip(&mut self, direction: &str) -> bool {
        match Operation::flip_named(direction) {
            Some(op) => self.apply(op),
            None => {
                debug!(direction, "ignoring unsupported flip direction");
                false
            }
        }
    }

    /// Resize to exact dimensions. Non-positive dimensions are ignored.
    pub fn resize(&mut self, width: i64, height: i64) -> bool {
        let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
            return false;
        };
        self.apply(Operation::Resize { width, height })
    }

    /// Scale proportionally by a percentage clamped to 25..=200.
    pub fn scale(&mut self, percent: i32) -> bool {
        self.apply(Operation::Scale { percent })
    }

    // ------------------------------------------------------------------
    // History navigation
    // ------------------------------------------------------------------

    /// Step back one snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    /// Step forward one snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.try_redo().is_ok()
    }

    /// Like [`undo`](Self::undo), but reports why nothing happened.
    pub fn try_undo(&mut self) -> Result<(), SessionError> {
        self.history.undo().map(|_| ())
    }

    /// Like [`redo`](Self::redo), but reports why nothing happened.
    pub fn try_redo(&mut self) -> Result<(), SessionError> {
        self.history.redo().map(|_| ())
    }

    /// Push a copy of the original image as a new snapshot.
    ///
    /// Reset is itself an undoable step rather than a rewind.
    pub fn reset(&mut self) -> bool {
        let Some(original) = &self.original else {
            return false;
        };
        self.history.push(original.clone());
        debug!("reset to original");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        !self.history.is_empty()
    }

    /// Copy of the active snapshot.
    pub fn current_image(&self) -> Option<PixelBuffer> {
        self.history.current().cloned()
    }

    /// Copy of the image as it was loaded.
    pub fn original_image(&self) -> Option<PixelBuffer> {
        self.original.clone()
    }

    /// Dimensions of the active snapshot, zeroed when empty.
    pub fn info(&self) -> ImageInfo {
        self.history
            .current()
            .map(ImageInfo::of)
            .unwrap_or_default()
    }

    /// Number of retained snapshots.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Index of the active snapshot among retained ones.
    pub fn history_position(&self) -> usize {
        self.history.position()
    }
}
