//! Image encoding for Retouch.
//!
//! This module provides functionality for:
//! - Inferring the output format (JPEG, PNG, BMP) from a destination path
//! - Encoding a [`PixelBuffer`](crate::decode::PixelBuffer) with a configurable JPEG quality
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{encode_image, OutputFormat};
//!
//! let bytes = encode_image(&image, OutputFormat::Png, 95).unwrap();
//! ```

mod writer;

pub use writer::{encode_image, write_image, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
