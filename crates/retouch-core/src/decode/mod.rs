//! Image decoding for Retouch.
//!
//! This module provides functionality for:
//! - Decoding common raster formats (JPEG, PNG, BMP) into packed RGB8
//! - Applying EXIF orientation so images appear the way they were shot
//! - The [`PixelBuffer`] type shared by every other module
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer, CHANNELS};
