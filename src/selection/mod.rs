//! Segment selection and wheel geometry
//!
//! This module provides the pure functions that decide where the wheel stops:
//! the weighted sampler that picks a segment, and the angle geometry that maps
//! segment index to rotation angle and back.
//!
//! # Submodules
//!
//! - [`geometry`] - Angular spans, target rotation and pointer lookup
//! - [`weighted`] - Weighted roulette selection over enabled segments
//!
//! # Example
//!
//! ```rust
//! use prize_wheel::selection::{pick_weighted, segment_at_rotation, target_rotation};
//! use prize_wheel::wheel::{PointerPosition, Segment, SegmentTarget};
//!
//! let segments = vec![
//!     Segment::new("1", "Common", "#ff0000").with_weight(3.0),
//!     Segment::new("2", "Rare", "#00ff00"),
//! ];
//!
//! let picked = pick_weighted(&segments).unwrap();
//! let rotation = target_rotation(&segments, &SegmentTarget::Index(picked.index), 5, PointerPosition::Top).unwrap();
//! let landed = segment_at_rotation(&segments, rotation, PointerPosition::Top).unwrap();
//! assert_eq!(landed.index, picked.index);
//! ```

pub mod geometry;
pub mod weighted;

pub use geometry::{
    landing_rotation, normalize_angle, pointer_frame_angle, resolve_target, rotation_delta,
    segment_angular_spans, segment_at_rotation, segment_bounds, target_rotation,
    target_rotation_with, DEFAULT_SPINS, FULL_TURN, JITTER_FRACTION, POINTER_REFERENCE_ANGLE,
};
pub use weighted::{pick_weighted, pick_weighted_with, selection_odds};

use thiserror::Error;

/// Errors raised when no segment can be drawn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The segment list is empty
    #[error("Cannot select from empty segments array")]
    EmptyInput,

    /// Every segment is disabled
    #[error("No enabled segments available for selection")]
    NoEligibleSegments,
}

/// Errors raised when a forced target cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// No segment carries the requested id
    #[error("No segment with id '{id}'")]
    NotFound { id: String },

    /// The requested index is outside the segment list
    #[error("Segment index {index} is out of bounds for {len} segments")]
    OutOfBounds { index: usize, len: usize },

    /// The requested segment is disabled and may not be landed on
    #[error("Segment {index} ('{id}') is disabled and cannot be targeted")]
    TargetDisabled { index: usize, id: String },
}

/// Returns the weights with their total
///
/// When finite weights add up past `f64::MAX`, every weight is divided by the
/// largest one first so the proportions survive the sum.
pub(crate) fn summable_weights(weights: Vec<f64>) -> (Vec<f64>, f64) {
    let total: f64 = weights.iter().sum();
    if total.is_finite() || weights.iter().any(|weight| !weight.is_finite()) {
        return (weights, total);
    }

    let largest = weights.iter().copied().fold(0.0, f64::max);
    let scaled: Vec<f64> = weights.into_iter().map(|weight| weight / largest).collect();
    let total = scaled.iter().sum();
    (scaled, total)
}
