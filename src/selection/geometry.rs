//! Wheel angle geometry
//!
//! Converts between segment weights, the rotation that lands a segment under
//! the pointer, and the segment found under the pointer for a given rotation.
//!
//! # Angle convention
//!
//! Rotation is clockwise-positive, the same sign a CSS `rotate()` or a canvas
//! `rotate()` uses. Inside the wheel, angles are measured clockwise from the
//! canvas x-axis (3 o'clock): segment 0 starts at 0° and the segments follow
//! in list order. The 12 o'clock pointer therefore reads wheel angle 270° on an
//! unrotated wheel.
//!
//! A point at wheel angle `w` on a wheel rotated by `r` shows up at screen
//! angle `w + r`, so the wheel angle under a pointer is `270 + offset - r`.
//! Solving for `r` gives the same expression with `w` and `r` swapped, which
//! is why [`pointer_frame_angle`] serves both directions of the mapping.

use rand::Rng;

use super::{summable_weights, SelectionError, TargetError};
use crate::wheel::{PointerPosition, Segment, SegmentTarget, SelectedSegment};

/// Degrees in a full turn
pub const FULL_TURN: f64 = 360.0;

/// Wheel-frame angle of the 12 o'clock pointer on an unrotated wheel
pub const POINTER_REFERENCE_ANGLE: f64 = 270.0;

/// Largest landing offset from a segment's centre, as a fraction of its span
pub const JITTER_FRACTION: f64 = 0.4;

/// Full rotations performed before landing when nothing else is configured
pub const DEFAULT_SPINS: u32 = 5;

/// Normalizes an angle into `[0, 360)`
///
/// # Example
///
/// ```rust
/// use prize_wheel::selection::normalize_angle;
///
/// assert_eq!(normalize_angle(725.0), 5.0);
/// assert_eq!(normalize_angle(-45.0), 315.0);
/// ```
pub fn normalize_angle(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if normalized >= FULL_TURN {
        0.0
    } else {
        normalized
    }
}

/// Maps a wheel-frame angle to the rotation placing it under the pointer, and back
///
/// The mapping is its own inverse:
/// `pointer_frame_angle(pointer_frame_angle(a, p), p) == normalize_angle(a)`.
pub fn pointer_frame_angle(angle: f64, pointer: PointerPosition) -> f64 {
    normalize_angle(POINTER_REFERENCE_ANGLE + pointer.offset_degrees() - angle)
}

/// Angular span of every segment in degrees
///
/// Each span is `weight / total_weight * 360`. Disabled segments keep their
/// share: they occupy wheel area even though they are never selected. The
/// spans of a non-empty list sum to 360.
///
/// A list whose weights do not sum to a positive finite number (only possible
/// for configurations that fail validation) is split evenly.
pub fn segment_angular_spans(segments: &[Segment]) -> Vec<f64> {
    if segments.is_empty() {
        return Vec::new();
    }

    let (weights, total_weight) =
        summable_weights(segments.iter().map(Segment::effective_weight).collect());
    if !(total_weight > 0.0 && total_weight.is_finite()) {
        let even = FULL_TURN / segments.len() as f64;
        return vec![even; segments.len()];
    }

    weights
        .into_iter()
        .map(|weight| weight / total_weight * FULL_TURN)
        .collect()
}

/// `[start, end)` wheel-frame bounds of every segment, in list order
pub fn segment_bounds(segments: &[Segment]) -> Vec<(f64, f64)> {
    let mut start = 0.0;
    segment_angular_spans(segments)
        .into_iter()
        .map(|span| {
            let bounds = (start, start + span);
            start += span;
            bounds
        })
        .collect()
}

/// Resolves a forced target to an index into `segments`
///
/// # Errors
///
/// - [`TargetError::OutOfBounds`] for an index outside `[0, len)`
/// - [`TargetError::NotFound`] for an id no segment carries
/// - [`TargetError::TargetDisabled`] when the resolved segment is disabled
pub fn resolve_target(segments: &[Segment], target: &SegmentTarget) -> Result<usize, TargetError> {
    let index = match target {
        SegmentTarget::Index(index) => {
            if *index >= segments.len() {
                return Err(TargetError::OutOfBounds {
                    index: *index,
                    len: segments.len(),
                });
            }
            *index
        }
        SegmentTarget::Id(id) => segments
            .iter()
            .position(|segment| &segment.id == id)
            .ok_or_else(|| TargetError::NotFound { id: id.clone() })?,
    };

    let segment = &segments[index];
    if segment.disabled {
        return Err(TargetError::TargetDisabled {
            index,
            id: segment.id.clone(),
        });
    }

    Ok(index)
}

/// Rotation that lands segment `index` under the pointer, with a fixed jitter
///
/// `jitter_fraction` is clamped to `[-0.4, 0.4]` and scaled by the target's
/// span, so the landing point always stays inside the target segment. With a
/// fraction of zero the pointer ends exactly on the segment's centre.
///
/// The result is `spins * 360 + pointer_frame_angle(centre) + jitter`; `spins`
/// is raised to at least 1.
pub fn landing_rotation(
    segments: &[Segment],
    index: usize,
    spins: u32,
    pointer: PointerPosition,
    jitter_fraction: f64,
) -> Result<f64, TargetError> {
    let index = resolve_target(segments, &SegmentTarget::Index(index))?;
    let (start, end) = segment_bounds(segments)[index];
    let span = end - start;
    let center = start + span / 2.0;
    let jitter = jitter_fraction.clamp(-JITTER_FRACTION, JITTER_FRACTION) * span;

    Ok(f64::from(spins.max(1)) * FULL_TURN + pointer_frame_angle(center, pointer) + jitter)
}

/// Rotation that lands the target segment under the pointer
///
/// Uses the thread-local RNG for the jitter. See [`target_rotation_with`].
///
/// # Example
///
/// ```rust
/// use prize_wheel::selection::target_rotation;
/// use prize_wheel::wheel::{PointerPosition, Segment, SegmentTarget};
///
/// let segments = vec![
///     Segment::new("1", "A", "#f00"),
///     Segment::new("2", "B", "#0f0"),
/// ];
/// let rotation = target_rotation(&segments, &SegmentTarget::from("2"), 5, PointerPosition::Top).unwrap();
/// assert!(rotation > 4.0 * 360.0);
/// ```
pub fn target_rotation(
    segments: &[Segment],
    target: &SegmentTarget,
    spins: u32,
    pointer: PointerPosition,
) -> Result<f64, TargetError> {
    target_rotation_with(segments, target, spins, pointer, &mut rand::thread_rng())
}

/// Rotation that lands the target segment under the pointer, drawing the
/// jitter from `rng`
///
/// The jitter is uniform in `[-0.4, 0.4]` times the target's span so that
/// repeated spins onto the same segment do not stop on the same pixel.
pub fn target_rotation_with<R: Rng + ?Sized>(
    segments: &[Segment],
    target: &SegmentTarget,
    spins: u32,
    pointer: PointerPosition,
    rng: &mut R,
) -> Result<f64, TargetError> {
    let index = resolve_target(segments, target)?;
    let jitter_fraction = rng.gen_range(-JITTER_FRACTION..=JITTER_FRACTION);
    landing_rotation(segments, index, spins, pointer, jitter_fraction)
}

/// Segment under the pointer for a given wheel rotation
///
/// The rotation may be any value, including negative ones or several full
/// turns. Floating-point error at the very end of the wheel falls back to the
/// last segment.
///
/// # Errors
///
/// Returns [`SelectionError::EmptyInput`] for an empty segment list.
pub fn segment_at_rotation(
    segments: &[Segment],
    rotation: f64,
    pointer: PointerPosition,
) -> Result<SelectedSegment<'_>, SelectionError> {
    if segments.is_empty() {
        return Err(SelectionError::EmptyInput);
    }

    let wheel_angle = pointer_frame_angle(normalize_angle(rotation), pointer);
    let index = segment_bounds(segments)
        .iter()
        .position(|&(start, end)| wheel_angle >= start && wheel_angle < end)
        .unwrap_or(segments.len() - 1);

    Ok(SelectedSegment::at(segments, index))
}

/// Rotation to add to `start_rotation` so the wheel stops where a relative
/// target rotation (as returned by [`target_rotation`]) aims
///
/// Target rotations are computed for a wheel at rest at 0°. A wheel resting at
/// any other angle first has to make up the difference to the next full turn;
/// for a start that is a whole number of turns the delta is the target itself.
pub fn rotation_delta(start_rotation: f64, relative_target: f64) -> f64 {
    relative_target + normalize_angle(-start_rotation)
}
