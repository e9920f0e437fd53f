//! Edit step grammar for the command line.
//!
//! Unlike the engine, which silently ignores unrecognized rotate angles and
//! flip directions, the command line rejects them up front so a typo in a
//! batch script fails loudly instead of producing an unedited file.

use std::str::FromStr;

use retouch_core::{FlipAxis, Operation, RightAngle};
use thiserror::Error;

/// One step of a batch run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Apply(Operation),
    Undo,
    Redo,
    Reset,
}

/// Errors produced while parsing a step.
#[derive(Debug, Error, PartialEq)]
pub enum StepParseError {
    #[error("unknown step '{0}'")]
    UnknownStep(String),

    #[error("step '{0}' requires a value, e.g. {0}=<value>")]
    MissingValue(String),

    #[error("step '{0}' does not take a value")]
    UnexpectedValue(String),

    #[error("invalid value '{value}' for step '{step}': {reason}")]
    InvalidArgument {
        step: String,
        value: String,
        reason: String,
    },
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim().to_ascii_lowercase(), Some(value.trim())),
            None => (s.to_ascii_lowercase(), None),
        };

        let invalid = |value: &str, reason: String| StepParseError::InvalidArgument {
            step: name.clone(),
            value: value.to_string(),
            reason,
        };
        let required = || value.ok_or_else(|| StepParseError::MissingValue(name.clone()));
        let bare = |step: Step| match value {
            Some(_) => Err(StepParseError::UnexpectedValue(name.clone())),
            None => Ok(step),
        };

        match name.as_str() {
            "grayscale" | "gray" => bare(Step::Apply(Operation::Grayscale)),
            "edges" => bare(Step::Apply(Operation::DetectEdges)),
            "undo" => bare(Step::Undo),
            "redo" => bare(Step::Redo),
            "reset" => bare(Step::Reset),
            "blur" => {
                let v = required()?;
                let intensity = v.parse().map_err(|e| invalid(v, format!("{e}")))?;
                Ok(Step::Apply(Operation::Blur { intensity }))
            }
            "brightness" => {
                let v = required()?;
                let value = v.parse().map_err(|e| invalid(v, format!("{e}")))?;
                Ok(Step::Apply(Operation::Brightness { value }))
            }
            "contrast" => {
                let v = required()?;
                let factor: f32 = v.parse().map_err(|e| invalid(v, format!("{e}")))?;
                if !factor.is_finite() {
                    return Err(invalid(v, "must be a finite number".to_string()));
                }
                Ok(Step::Apply(Operation::Contrast { factor }))
            }
            "rotate" => {
                let v = required()?;
                let degrees: i32 = v.parse().map_err(|e| invalid(v, format!("{e}")))?;
                let angle = RightAngle::try_from(degrees).map_err(|reason| invalid(v, reason))?;
                Ok(Step::Apply(Operation::Rotate { angle }))
            }
            "flip" => {
                let v = required()?;
                let axis: FlipAxis = v.parse().map_err(|reason| invalid(v, reason))?;
                Ok(Step::Apply(Operation::Flip { axis }))
            }
            "resize" => {
                let v = required()?;
                let (w, h) = v
                    .split_once(['x', 'X'])
                    .ok_or_else(|| invalid(v, "expected WIDTHxHEIGHT".to_string()))?;
                let width: u32 = w.trim().parse().map_err(|e| invalid(v, format!("{e}")))?;
                let height: u32 = h.trim().parse().map_err(|e| invalid(v, format!("{e}")))?;
                if width == 0 || height == 0 {
                    return Err(invalid(v, "dimensions must be positive".to_string()));
                }
                Ok(Step::Apply(Operation::Resize { width, height }))
            }
            "scale" => {
                let v = required()?;
                let percent = v
                    .trim_end_matches('%')
                    .parse()
                    .map_err(|e| invalid(v, format!("{e}")))?;
                Ok(Step::Apply(Operation::Scale { percent }))
            }
            _ => Err(StepParseError::UnknownStep(name.clone())),
        }
    }
}
