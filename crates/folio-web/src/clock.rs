#![forbid(unsafe_code)]

//! Frame clock for `requestAnimationFrame`-driven hosts.
//!
//! Converts wall-clock instants into the `dt` steps the model advances by.
//! A single step is capped so a tab returning from the background resumes
//! animations instead of jumping to their end.

use std::time::Duration;

use web_time::Instant;

/// Longest step a single frame may advance.
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Measures the time between frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_step: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            max_step: MAX_FRAME_STEP,
        }
    }

    /// Override the step cap (builder pattern).
    #[must_use]
    pub const fn with_max_step(mut self, max_step: Duration) -> Self {
        self.max_step = max_step;
        self
    }

    /// Step since the previous call, measured against the wall clock.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Step since the previous call, at `now`. The first call returns zero.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt.min(self.max_step)
    }

    /// Forget the previous frame, e.g. after the page was hidden.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
