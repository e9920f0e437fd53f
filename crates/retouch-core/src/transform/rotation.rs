//! Lossless right-angle rotation and mirroring.
//!
//! Only multiples of 90° are supported, so no interpolation is involved:
//! every output pixel is an exact copy of one input pixel. Rotating by
//! [`RightAngle::Half`] twice, or flipping along the same axis twice,
//! reproduces the input byte for byte.
//!
//! Angles are clockwise: 90° moves the top-left corner to the top-right.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::PixelBuffer;

/// A rotation by a non-zero multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RightAngle {
    /// 90° clockwise.
    Quarter,
    /// 180°.
    Half,
    /// 270° clockwise (90° counter-clockwise).
    ThreeQuarter,
}

impl RightAngle {
    /// Map degrees to a rotation. Only 90, 180 and 270 are recognized.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            90 => Some(RightAngle::Quarter),
            180 => Some(RightAngle::Half),
            270 => Some(RightAngle::ThreeQuarter),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            RightAngle::Quarter => 90,
            RightAngle::Half => 180,
            RightAngle::ThreeQuarter => 270,
        }
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        !matches!(self, RightAngle::Half)
    }
}

impl TryFrom<i32> for RightAngle {
    type Error = String;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("unsupported rotation angle {degrees}, expected 90, 180 or 270"))
    }
}

impl From<RightAngle> for i32 {
    fn from(angle: RightAngle) -> Self {
        angle.degrees()
    }
}

impl fmt::Display for RightAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Mirror axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipAxis {
    /// Mirror left-right (across the vertical axis).
    Horizontal,
    /// Mirror top-bottom (across the horizontal axis).
    Vertical,
}

impl FlipAxis {
    /// Parse `"horizontal"` or `"vertical"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(FlipAxis::Horizontal),
            "vertical" => Some(FlipAxis::Vertical),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlipAxis::Horizontal => "horizontal",
            FlipAxis::Vertical => "vertical",
        }
    }
}

impl FromStr for FlipAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| format!("unsupported flip direction '{s}', expected horizontal or vertical"))
    }
}

impl fmt::Display for FlipAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotate an image clockwise by a right angle.
pub fn rotate(image: &PixelBuffer, angle: RightAngle) -> PixelBuffer {
    let Some(rgb) = image.to_rgb_image() else {
        return image.clone();
    };

    let rotated = match angle {
        RightAngle::Quarter => image::imageops::rotate90(&rgb),
        RightAngle::Half => image::imageops::rotate180(&rgb),
        RightAngle::ThreeQuarter => image::imageops::rotate270(&rgb),
    };
    PixelBuffer::from_rgb_image(rotated)
}

/// Mirror an image along the given axis.
pub fn flip(image: &PixelBuffer, axis: FlipAxis) -> PixelBuffer {
    let Some(rgb) = image.to_rgb_image() else {
        return image.clone();
    };

    let flipped = match axis {
        FlipAxis::Horizontal => image::imageops::flip_horizontal(&rgb),
        FlipAxis::Vertical => image::imageops::flip_vertical(&rgb),
    };
    PixelBuffer::from_rgb_image(flipped)
}
