//! Geometric and filtering transforms.
//!
//! Every function here is a pure `(&PixelBuffer, params) -> PixelBuffer`
//! mapping with no shared state between calls. Out-of-range parameters are
//! clamped rather than rejected:
//!
//! - Blur intensity is clamped to >= 1 and bumped to the next odd kernel size
//! - Scale percentages are clamped to 25..=200
//! - Zero resize targets yield `None` (no-op)
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner
//! - Rotation angles are clockwise and restricted to 90/180/270

mod blur;
mod edges;
mod resize;
mod rotation;

pub use blur::{blur, normalize_kernel_size};
pub use edges::{detect_edges, detect_edges_with, EDGE_HIGH_THRESHOLD, EDGE_LOW_THRESHOLD};
pub use resize::{resize, scale_percent, scaled_dimensions, SCALE_PERCENT_MAX, SCALE_PERCENT_MIN};
pub use rotation::{flip, rotate, FlipAxis, RightAngle};
