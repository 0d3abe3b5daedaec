//! Weighted roulette selection
//!
//! Picks a segment with probability proportional to its weight, considering
//! enabled segments only.

use rand::Rng;

use super::{summable_weights, SelectionError};
use crate::wheel::{Segment, SelectedSegment};

/// Picks an enabled segment with probability `weight / total_enabled_weight`
///
/// Uses the thread-local RNG. See [`pick_weighted_with`].
///
/// # Example
///
/// ```rust
/// use prize_wheel::selection::pick_weighted;
/// use prize_wheel::wheel::Segment;
///
/// let segments = vec![
///     Segment::new("1", "Common", "#000").with_weight(3.0),
///     Segment::new("2", "Rare", "#000"),
///     Segment::new("3", "Gone", "#000").with_disabled(true),
/// ];
///
/// let picked = pick_weighted(&segments).unwrap();
/// assert!(picked.index < 2);
/// ```
pub fn pick_weighted(segments: &[Segment]) -> Result<SelectedSegment<'_>, SelectionError> {
    pick_weighted_with(segments, &mut rand::thread_rng())
}

/// Picks an enabled segment using the given RNG
///
/// Draws a uniform value in `[0, total_weight)` and walks the enabled segments
/// accumulating weight until the running sum reaches the draw. The returned
/// index refers to the original list, disabled segments included.
///
/// # Errors
///
/// - [`SelectionError::EmptyInput`] when `segments` is empty
/// - [`SelectionError::NoEligibleSegments`] when every segment is disabled
pub fn pick_weighted_with<'a, R: Rng + ?Sized>(
    segments: &'a [Segment],
    rng: &mut R,
) -> Result<SelectedSegment<'a>, SelectionError> {
    if segments.is_empty() {
        return Err(SelectionError::EmptyInput);
    }

    let enabled: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_enabled())
        .map(|(index, _)| index)
        .collect();

    if enabled.is_empty() {
        return Err(SelectionError::NoEligibleSegments);
    }

    let (weights, total_weight) = summable_weights(
        enabled
            .iter()
            .map(|&index| segments[index].effective_weight())
            .collect(),
    );

    // Positive weights are a validation invariant; fall back to uniform if it was bypassed.
    if !(total_weight > 0.0 && total_weight.is_finite()) {
        let index = enabled[rng.gen_range(0..enabled.len())];
        return Ok(SelectedSegment::at(segments, index));
    }

    let draw = rng.gen::<f64>() * total_weight;

    let mut cumulative = 0.0;
    for (&index, weight) in enabled.iter().zip(&weights) {
        cumulative += weight;
        if cumulative >= draw {
            return Ok(SelectedSegment::at(segments, index));
        }
    }

    // Rounding in the running sum can leave the draw just above the total.
    let last = enabled[enabled.len() - 1];
    Ok(SelectedSegment::at(segments, last))
}

/// Probability of each segment being picked
///
/// Disabled segments get 0. Returns all zeros when nothing is selectable.
pub fn selection_odds(segments: &[Segment]) -> Vec<f64> {
    let (weights, total_weight) = summable_weights(
        segments
            .iter()
            .map(|segment| {
                if segment.is_enabled() {
                    segment.effective_weight()
                } else {
                    0.0
                }
            })
            .collect(),
    );

    segments
        .iter()
        .zip(weights)
        .map(|(segment, weight)| {
            if segment.is_enabled() && total_weight > 0.0 {
                weight / total_weight
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment::new("1", "Prize 1", "#ff0000").with_weight(1.0),
            Segment::new("2", "Prize 2", "#00ff00").with_weight(2.0),
            Segment::new("3", "Prize 3", "#0000ff").with_weight(1.0),
        ]
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pick_weighted(&[]).unwrap_err(), SelectionError::EmptyInput);
    }

    #[test]
    fn test_all_disabled() {
        let segments: Vec<Segment> = sample_segments()
            .into_iter()
            .map(|s| s.with_disabled(true))
            .collect();
        assert_eq!(
            pick_weighted(&segments).unwrap_err(),
            SelectionError::NoEligibleSegments
        );
    }

    #[test]
    fn test_returns_original_index() {
        let segments = vec![
            Segment::new("1", "Off", "#000").with_disabled(true),
            Segment::new("2", "Off", "#000").with_disabled(true),
            Segment::new("3", "On", "#000"),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = pick_weighted_with(&segments, &mut rng).unwrap();
            assert_eq!(picked.index, 2);
            assert_eq!(picked.segment.id, "3");
        }
    }

    #[test]
    fn test_never_returns_disabled() {
        let mut segments = sample_segments();
        segments.push(Segment::new("4", "Disabled", "#000000").with_disabled(true));
        segments[0].disabled = true;

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let picked = pick_weighted_with(&segments, &mut rng).unwrap();
            assert!(picked.segment.is_enabled());
        }
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_uniform() {
        let segments = vec![
            Segment::new("1", "A", "#000").with_weight(0.0),
            Segment::new("2", "B", "#000").with_weight(0.0),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 2];
        for _ in 0..100 {
            seen[pick_weighted_with(&segments, &mut rng).unwrap().index] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_distribution_follows_weights() {
        let segments = sample_segments();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut counts = [0usize; 3];

        for _ in 0..4000 {
            counts[pick_weighted_with(&segments, &mut rng).unwrap().index] += 1;
        }

        // Expected shares 25% / 50% / 25%.
        assert!(counts[1] > 1800 && counts[1] < 2200, "{:?}", counts);
        assert!(counts[0] > 850 && counts[0] < 1150, "{:?}", counts);
        assert!(counts[2] > 850 && counts[2] < 1150, "{:?}", counts);
    }

    #[test]
    fn test_selection_odds() {
        let mut segments = sample_segments();
        assert_eq!(selection_odds(&segments), vec![0.25, 0.5, 0.25]);

        segments[1].disabled = true;
        assert_eq!(selection_odds(&segments), vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_huge_weights_keep_their_proportions() {
        let segments = vec![
            Segment::new("1", "A", "#000").with_weight(1e308),
            Segment::new("2", "B", "#000").with_weight(1e308),
            Segment::new("3", "C", "#000").with_weight(1.0),
        ];
        let mut rng = StdRng::seed_from_u64(17);
        let mut counts = [0usize; 3];

        for _ in 0..3000 {
            counts[pick_weighted_with(&segments, &mut rng).unwrap().index] += 1;
        }

        assert_eq!(counts[2], 0, "{:?}", counts);
        assert!(counts[0] > 1300 && counts[1] > 1300, "{:?}", counts);

        let odds = selection_odds(&segments);
        assert!((odds[0] - 0.5).abs() < 1e-12);
        assert!(odds[2] < 1e-300);
    }
}
