//! Integration tests for the animation module.

use folio_core::animation::spring::SpringConfig;
use folio_core::animation::*;
use std::time::Duration;

const MS_50: Duration = Duration::from_millis(50);
const MS_100: Duration = Duration::from_millis(100);
const SEC_1: Duration = Duration::from_secs(1);

#[test]
fn fade_duration_tracking() {
    let mut fade = Fade::new(SEC_1);
    for _ in 0..1000 {
        fade.tick(Duration::from_millis(1));
    }
    assert!(fade.is_complete(), "1000x1ms should complete 1s fade");
}

#[test]
fn staggered_fades_on_a_timeline_complete_together() {
    let stagger = Stagger::each(MS_50).with_base(MS_100);
    let mut timeline = Timeline::new();
    for child in 0..3 {
        timeline.push(stagger.offset(child, 3), Box::new(Fade::new(MS_100)));
    }
    timeline.play();
    // Last child starts at 200ms and needs 100ms.
    timeline.tick(Duration::from_millis(299));
    assert!(!timeline.is_complete());
    timeline.tick(Duration::from_millis(1));
    assert!(timeline.is_complete());
}

#[test]
fn delayed_spring_on_a_timeline() {
    let spring = Spring::new(0.0, 1.0).with_config(SpringConfig::new(400.0, 40.0));
    let mut timeline = Timeline::new();
    timeline.push(Duration::ZERO, Box::new(delay(Duration::from_millis(500), spring)));
    timeline.play();
    timeline.tick(Duration::from_millis(400));
    assert_eq!(timeline.track_value_at(0), Some(0.0));
    for _ in 0..120 {
        timeline.tick(Duration::from_millis(16));
    }
    assert!(timeline.is_complete());
    assert_eq!(timeline.track_value_at(0), Some(1.0));
}

#[test]
fn easing_functions_are_monotonic() {
    for easing in [linear, ease_out, ease_in_out] {
        let mut prev = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = easing(t);
            assert!(v >= prev - 0.001, "easing should be monotonic at t={}", t);
            prev = v;
        }
    }
}
