//! Property-based invariant tests for transform mapping and scroll progress.
//!
//! 1. Two-point maps are exactly `a + p * (b - a)` on [0, 1]
//! 2. Out-of-domain progress clamps to the endpoint outputs
//! 3. Monotone control points give monotone maps
//! 4. Scroll progress stays in [0, 1] and is monotone in scroll offset
//! 5. The mirrored loop is periodic and bounded by its endpoints

use std::time::Duration;

use folio_core::geometry::{Rect, Viewport};
use folio_core::scroll::{ScrollRange, scroll_progress};
use folio_core::transform::{ControlPoints, MirrorLoop, TransformValue, Unit};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn output_value() -> impl Strategy<Value = f64> {
    -10_000.0f64..10_000.0
}

fn increasing_points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..1.0, 0.0f64..100.0), 1..12).prop_map(|mut raw| {
        raw.sort_by(|a, b| a.0.total_cmp(&b.0));
        // Cumulative outputs so the map is monotone non-decreasing.
        let mut acc = 0.0;
        raw.into_iter()
            .map(|(x, dy)| {
                acc += dy;
                (x, acc)
            })
            .collect()
    })
}

fn region() -> impl Strategy<Value = Rect> {
    (0.0f64..20_000.0, 0.0f64..5_000.0).prop_map(|(y, h)| Rect::new(0.0, y, 1_280.0, h))
}

fn range() -> impl Strategy<Value = ScrollRange> {
    prop_oneof![
        Just(ScrollRange::default()),
        Just(ScrollRange::leaving_top()),
        Just(ScrollRange::gallery()),
    ]
}

proptest! {
    #[test]
    fn two_point_map_is_linear(a in output_value(), b in output_value(), p in 0.0f64..=1.0) {
        let cp = ControlPoints::new(vec![(0.0, a), (1.0, b)], Unit::Px).unwrap();
        let expected = a + p * (b - a);
        prop_assert!((cp.map_raw(p) - expected).abs() < 1e-6);
    }

    #[test]
    fn out_of_domain_clamps(a in output_value(), b in output_value(), over in 0.0f64..1e6) {
        let cp = ControlPoints::new(vec![(0.0, a), (1.0, b)], Unit::Percent).unwrap();
        prop_assert_eq!(cp.map_raw(-over - 1e-9), a);
        prop_assert_eq!(cp.map_raw(1.0 + over + 1e-9), b);
    }

    #[test]
    fn monotone_points_give_monotone_map(points in increasing_points(), p in -0.5f64..1.5, q in -0.5f64..1.5) {
        let cp = ControlPoints::new(points, Unit::None).unwrap();
        let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
        prop_assert!(cp.map_raw(lo) <= cp.map_raw(hi) + 1e-9);
    }

    #[test]
    fn mapping_is_deterministic(points in increasing_points(), p in -0.5f64..1.5) {
        let cp = ControlPoints::new(points.clone(), Unit::None).unwrap();
        let again = ControlPoints::new(points, Unit::None).unwrap();
        prop_assert_eq!(cp.map_raw(p).to_bits(), again.map_raw(p).to_bits());
    }

    #[test]
    fn scroll_progress_is_bounded_and_monotone(
        region in region(),
        range in range(),
        vh in 100.0f64..2_000.0,
        y1 in 0.0f64..30_000.0,
        y2 in 0.0f64..30_000.0,
    ) {
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        let p_lo = scroll_progress(Some(&region), &Viewport::new(lo, 1_280.0, vh), &range);
        let p_hi = scroll_progress(Some(&region), &Viewport::new(hi, 1_280.0, vh), &range);
        prop_assert!((0.0..=1.0).contains(&p_lo));
        prop_assert!((0.0..=1.0).contains(&p_hi));

        let s0 = range.start.scroll_offset(&region, &Viewport::new(0.0, 1_280.0, vh));
        let s1 = range.end.scroll_offset(&region, &Viewport::new(0.0, 1_280.0, vh));
        if s1 >= s0 {
            prop_assert!(p_lo <= p_hi + 1e-12);
        } else {
            prop_assert!(p_lo + 1e-12 >= p_hi);
        }
    }

    #[test]
    fn mirror_loop_periodic_and_bounded(ms in 0u64..200_000, cycles in 0u32..5, to in -500.0f64..0.0) {
        let slider = MirrorLoop::new(
            TransformValue::percent(0.0),
            TransformValue::percent(to),
            Duration::from_secs(20),
        );
        let t = Duration::from_millis(ms);
        let a = slider.sample(t).value;
        let b = slider.sample(t + slider.period() * cycles).value;
        prop_assert!((a - b).abs() < 1e-6);
        prop_assert!(a <= 1e-9 && a >= to - 1e-9);
    }
}
