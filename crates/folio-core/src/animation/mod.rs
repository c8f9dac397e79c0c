#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Everything here is driven by explicit `tick(dt)` calls from the host
//! clock, so a given sequence of ticks always produces the same values.
//!
//! - [`Animation`]: the common trait (tick, value, completion, reset).
//! - Easing functions: [`linear`], [`ease_out`], [`ease_in_out`].
//! - [`Fade`]: an eased 0→1 tween over a fixed duration.
//! - [`Delayed`] / [`delay`]: hold at 0 for an offset, then run the inner animation.
//! - [`spring::Spring`]: damped harmonic oscillator.
//! - [`stagger::Stagger`]: per-child start offsets.
//! - [`timeline::Timeline`]: schedules child tracks at offsets.

pub mod spring;
pub mod stagger;
pub mod timeline;

use std::time::Duration;

pub use spring::{Spring, SpringConfig};
pub use stagger::{Stagger, StaggerDirection};
pub use timeline::Timeline;

/// An animation advanced by explicit time steps.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end state.
    fn is_complete(&self) -> bool;

    /// Current value. Normalized animations report `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// An easing curve mapping `[0, 1]` to `[0, 1]`.
pub type EasingFn = fn(f32) -> f32;

#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// An eased tween from 0.0 to 1.0 over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// A linear fade. Zero duration is clamped to 1ns.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear (un-eased) progress in `[0, 1]`.
    fn raw_progress(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Holds the inner animation at its initial value for `offset`, then runs it.
#[derive(Debug, Clone)]
pub struct Delayed<A> {
    offset: Duration,
    waited: Duration,
    inner: A,
}

/// Wrap `inner` so it starts after `offset`.
#[must_use]
pub fn delay<A: Animation>(offset: Duration, inner: A) -> Delayed<A> {
    Delayed {
        offset,
        waited: Duration::ZERO,
        inner,
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        let remaining = self.offset.saturating_sub(self.waited);
        if dt <= remaining {
            self.waited += dt;
            return;
        }
        self.waited = self.offset;
        self.inner.tick(dt - remaining);
    }

    fn is_complete(&self) -> bool {
        self.waited >= self.offset && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }

    fn reset(&mut self) {
        self.waited = Duration::ZERO;
        self.inner.reset();
    }
}
