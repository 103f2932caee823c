//! Property tests for the segment ladder.

use playervalue_segmentation::{classify, Segment};
use proptest::prelude::*;

proptest! {
    /// Exactly one segment's half-open interval contains every real value,
    /// and it is the one `classify` returns.
    #[test]
    fn classify_is_exclusive_and_exhaustive(value in any::<f64>().prop_filter("real values only", |v| !v.is_nan())) {
        let containing: Vec<Segment> = Segment::ALL
            .into_iter()
            .filter(|s| {
                s.lower_bound().is_none_or(|lo| value >= lo)
                    && s.upper_bound().is_none_or(|hi| value < hi)
            })
            .collect();
        prop_assert_eq!(containing.len(), 1);
        prop_assert_eq!(containing[0], classify(value));
    }

    /// Larger values never land in a lower segment.
    #[test]
    fn classify_is_monotonic(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
    }
}
