//! Edit operations that can be recorded in the history.
//!
//! An [`Operation`] is a value describing one editor action together with
//! its parameters. It serializes as an internally tagged object, e.g.
//! `{"op": "blur", "intensity": 5}` or `{"op": "rotate", "angle": 90}`.

use serde::{Deserialize, Serialize};

use crate::adjustments::{adjust_brightness, adjust_contrast, grayscale};
use crate::decode::PixelBuffer;
use crate::transform::{blur, detect_edges, flip, resize, rotate, scale_percent, FlipAxis, RightAngle};
use crate::SessionConfig;

/// One transformation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Luminance conversion, replicated to 3 channels.
    Grayscale,
    /// Gaussian blur; intensity is the kernel size before normalization.
    Blur { intensity: i32 },
    /// Canny edge map with the fixed 100/200 thresholds.
    DetectEdges,
    /// Additive offset, clamped to -100..=100.
    Brightness { value: i32 },
    /// Multiplicative gain, clamped to 0.5..=3.0.
    Contrast { factor: f32 },
    /// Clockwise right-angle rotation.
    Rotate { angle: RightAngle },
    /// Mirror along an axis.
    Flip { axis: FlipAxis },
    /// Resample to exact dimensions.
    Resize { width: u32, height: u32 },
    /// Resample proportionally; percent is clamped to 25..=200.
    Scale { percent: i32 },
}

impl Operation {
    /// Short machine-friendly name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Grayscale => "grayscale",
            Operation::Blur { .. } => "blur",
            Operation::DetectEdges => "detect_edges",
            Operation::Brightness { .. } => "brightness",
            Operation::Contrast { .. } => "contrast",
            Operation::Rotate { .. } => "rotate",
            Operation::Flip { .. } => "flip",
            Operation::Resize { .. } => "resize",
            Operation::Scale { .. } => "scale",
        }
    }

    /// Build a rotate operation from raw degrees.
    ///
    /// Returns `None` for anything other than 90, 180 or 270.
    pub fn rotate_degrees(degrees: i32) -> Option<Self> {
        RightAngle::from_degrees(degrees).map(|angle| Operation::Rotate { angle })
    }

    /// Build a flip operation from a direction name.
    ///
    /// Returns `None` for anything other than `horizontal` or `vertical`.
    pub fn flip_named(direction: &str) -> Option<Self> {
        FlipAxis::from_name(direction).map(|axis| Operation::Flip { axis })
    }

    /// Produce the next buffer from `image`.
    ///
    /// Returns `None` when the operation cannot change the image (a zero
    /// resize target, or a scale that rounds down to zero pixels). Such
    /// no-ops must not be recorded as history entries.
    pub fn apply(&self, image: &PixelBuffer, config: &SessionConfig) -> Option<PixelBuffer> {
        let next = match *self {
            Operation::Grayscale => grayscale(image),
            Operation::Blur { intensity } => blur(image, intensity),
            Operation::DetectEdges => detect_edges(image),
            Operation::Brightness { value } => adjust_brightness(image, value),
            Operation::Contrast { factor } => adjust_contrast(image, factor),
            Operation::Rotate { angle } => rotate(image, angle),
            Operation::Flip { axis } => flip(image, axis),
            Operation::Resize { width, height } => {
                resize(image, width, height, config.resize_filter)?
            }
            Operation::Scale { percent } => scale_percent(image, percent, config.resize_filter)?,
        };
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let mut pixels = Vec::new();
        for i in 0..(8 * 6) {
            let v = (i * 5) as u8;
            pixels.extend_from_slice(&[v, 255 - v, v / 2]);
        }
        PixelBuffer::new(8, 6, pixels)
    }

    #[test]
    fn test_every_operation_keeps_three_channels() {
        let config = SessionConfig::default();
        let ops = [
            Operation::Grayscale,
            Operation::Blur { intensity: 3 },
            Operation::DetectEdges,
            Operation::Brightness { value: 20 },
            Operation::Contrast { factor: 1.5 },
            Operation::Rotate { angle: RightAngle::Quarter },
            Operation::Flip { axis: FlipAxis::Vertical },
            Operation::Resize { width: 4, height: 9 },
            Operation::Scale { percent: 50 },
        ];

        for op in ops {
            let out = op.apply(&sample(), &config).unwrap();
            assert_eq!(
                out.pixels.len(),
                out.pixel_count() * 3,
                "{} produced a malformed buffer",
                op.name()
            );
        }
    }

    #[test]
    fn test_malformed_buffer_passes_through() {
        let config = SessionConfig::default();
        let bad = PixelBuffer {
            width: 4,
            height: 4,
            pixels: vec![7u8; 10],
        };
        let ops = [
            Operation::Grayscale,
            Operation::Blur { intensity: 9 },
            Operation::DetectEdges,
            Operation::Brightness { value: 20 },
            Operation::Contrast { factor: 1.5 },
            Operation::Rotate { angle: RightAngle::Half },
            Operation::Flip { axis: FlipAxis::Horizontal },
            Operation::Resize { width: 4, height: 9 },
            Operation::Scale { percent: 50 },
        ];

        for op in ops {
            if let Some(out) = op.apply(&bad, &config) {
                assert_eq!(out, bad, "{} altered a malformed buffer", op.name());
            }
        }
    }

    #[test]
    fn test_resize_zero_is_noop() {
        let op = Operation::Resize { width: 0, height: 10 };
        assert!(op.apply(&sample(), &SessionConfig::default()).is_none());
    }

    #[test]
    fn test_rotate_degrees() {
        assert_eq!(
            Operation::rotate_degrees(270),
            Some(Operation::Rotate { angle: RightAngle::ThreeQuarter })
        );
        assert_eq!(Operation::rotate_degrees(45), None);
    }

    #[test]
    fn test_flip_named() {
        assert_eq!(
            Operation::flip_named("horizontal"),
            Some(Operation::Flip { axis: FlipAxis::Horizontal })
        );
        assert_eq!(Operation::flip_named("diagonal"), None);
    }

    #[test]
    fn test_scale_uses_current_dimensions() {
        let out = Operation::Scale { percent: 50 }
            .apply(&sample(), &SessionConfig::default())
            .unwrap();
        assert_eq!((out.width, out.height), (4, 3));
    }
}
