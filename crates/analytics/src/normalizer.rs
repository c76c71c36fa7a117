/// Multiplier applied to `target` when a factor has no explicit "excellent" threshold.
pub const DEFAULT_EXCELLENT_MULTIPLIER: f64 = 1.5;

/// Maps a raw metric onto the 0.0-1.0 scale.
///
/// For ordinary metrics (higher is better) the value scores 1.0 at or above
/// `excellent`, 0.0 at or below zero, and `value / target` capped at 1.0 in
/// between. Because of the cap a value can saturate at 1.0 once it reaches
/// `target`, before it gets to `excellent`.
///
/// For inverse metrics (lower is better, e.g. leverage) the value scores 1.0 at
/// or below `excellent`, 0.0 at or above twice the target, and falls linearly
/// between those two points.
///
/// `excellent` defaults to `target * 1.5`. The function never fails: a zero
/// divisor or any non-finite input scores 0.0, and the result is always
/// clamped to `[0.0, 1.0]`.
pub fn normalize(value: f64, target: f64, excellent: Option<f64>, inverse: bool) -> f64 {
    let excellent = excellent.unwrap_or(target * DEFAULT_EXCELLENT_MULTIPLIER);
    if !(value.is_finite() && target.is_finite() && excellent.is_finite()) {
        return 0.0;
    }

    let score = if inverse {
        normalize_inverse(value, target, excellent)
    } else {
        normalize_direct(value, target, excellent)
    };

    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn normalize_direct(value: f64, target: f64, excellent: f64) -> f64 {
    if value >= excellent {
        1.0
    } else if value <= 0.0 {
        0.0
    } else if target == 0.0 {
        0.0
    } else {
        (value / target).min(1.0)
    }
}

fn normalize_inverse(value: f64, target: f64, excellent: f64) -> f64 {
    let ceiling = target * 2.0;
    if value <= excellent {
        1.0
    } else if value >= ceiling {
        0.0
    } else {
        let span = ceiling - excellent;
        if span == 0.0 {
            0.0
        } else {
            (ceiling - value) / span
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn value_at_excellent_scores_one() {
        assert_eq!(normalize(2.0, 1.5, Some(2.0), false), 1.0);
        assert_eq!(normalize(0.95, 0.85, Some(0.95), false), 1.0);
    }

    #[test]
    fn zero_value_scores_zero() {
        assert_eq!(normalize(0.0, 1.5, None, false), 0.0);
        assert_eq!(normalize(-3.0, 1.5, Some(2.0), false), 0.0);
    }

    #[test]
    fn values_below_target_scale_linearly() {
        assert_eq!(normalize(0.75, 1.5, Some(2.0), false), 0.5);
        assert_eq!(normalize(1.0, 4.0, None, false), 0.25);
    }

    #[test]
    fn values_between_target_and_excellent_saturate() {
        // 1.8 is short of the 2.0 threshold but already past the 1.5 target.
        assert_eq!(normalize(1.8, 1.5, Some(2.0), false), 1.0);
    }

    #[test]
    fn excellent_defaults_to_one_and_a_half_targets() {
        assert_eq!(normalize(1.5, 1.0, None, false), 1.0);
        assert_eq!(normalize(0.5, 1.0, None, true), 1.0);
        // Inverse with target 1.0: excellent 1.5, ceiling 2.0.
        assert_eq!(normalize(1.75, 1.0, None, true), 0.5);
    }

    #[test]
    fn inverse_interpolates_between_excellent_and_twice_target() {
        assert_eq!(normalize(0.5, 1.0, Some(0.5), true), 1.0);
        assert_eq!(normalize(1.25, 1.0, Some(0.5), true), 0.5);
        assert_eq!(normalize(2.0, 1.0, Some(0.5), true), 0.0);
        assert_eq!(normalize(7.0, 1.0, Some(0.5), true), 0.0);
    }

    #[test]
    fn zero_target_fails_soft() {
        assert_eq!(normalize(0.5, 0.0, Some(1.0), false), 0.0);
        assert_eq!(normalize(0.0, 0.0, None, false), 1.0);
        assert_eq!(normalize(-1.0, 0.0, None, false), 0.0);
        assert_eq!(normalize(0.5, 0.0, Some(0.0), true), 0.0);
    }

    #[test]
    fn negative_target_is_clamped() {
        assert_eq!(normalize(0.5, -1.0, Some(1.0), false), 0.0);
    }

    #[test]
    fn non_finite_inputs_score_zero() {
        assert_eq!(normalize(f64::NAN, 1.0, None, false), 0.0);
        assert_eq!(normalize(f64::INFINITY, 1.0, None, false), 0.0);
        assert_eq!(normalize(1.0, f64::NAN, None, true), 0.0);
        assert_eq!(normalize(1.0, 1.0, Some(f64::NEG_INFINITY), false), 0.0);
    }

    proptest! {
        #[test]
        fn always_within_unit_interval(
            value in any::<f64>(),
            target in any::<f64>(),
            excellent in proptest::option::of(any::<f64>()),
            inverse in any::<bool>(),
        ) {
            let score = normalize(value, target, excellent, inverse);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn inverse_is_non_increasing_in_value(
            a in -1.0e6f64..1.0e6,
            b in -1.0e6f64..1.0e6,
            target in -1.0e3f64..1.0e3,
            excellent in proptest::option::of(-1.0e3f64..1.0e3),
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let at_low = normalize(low, target, excellent, true);
            let at_high = normalize(high, target, excellent, true);
            prop_assert!(at_low >= at_high);
        }

        #[test]
        fn positive_target_zero_value_scores_zero(target in 1.0e-6f64..1.0e6) {
            prop_assert_eq!(normalize(0.0, target, None, false), 0.0);
        }
    }
}
