#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Springs drive the overlay transitions (a soft, slow open and a stiff,
//! damped close) and smooth the gallery progress bar. The model is the
//! classical damped spring with unit mass:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force. Higher = faster response.
//! - **damping** (c): velocity drag. `c < 2√k` oscillates, `c ≈ 2√k` is
//!   critically damped, `c > 2√k` creeps toward the target.
//!
//! # Invariants
//!
//! 1. `value()` returns the position clamped to [0.0, 1.0]; `position()` is
//!    the raw position.
//! 2. A spring at rest does not move until `set_target()` or `reset()`.
//! 3. Stiffness is at least 0.1 and damping at least 0.0.
//! 4. `advance()` stops integrating as soon as the spring comes to rest, so
//!    a settled spring costs nothing however large `dt` is.
//!
//! # Failure Modes
//!
//! - Large dt: subdivided into 4ms steps (semi-implicit Euler).
//! - Zero damping: oscillates forever; `is_complete()` may never be true.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring may come to rest.
const REST_THRESHOLD: f64 = 0.001;

/// Velocity below which (with the position threshold) the spring rests.
const VELOCITY_THRESHOLD: f64 = 0.01;

const MIN_STIFFNESS: f64 = 0.1;

/// Stiffness and damping of a spring, without any motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringConfig {
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }
}

impl Default for SpringConfig {
    /// Stiffness 100, damping 10: the usual web-animation default.
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

/// A damped harmonic oscillator moving from an initial position to a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target` with
    /// [`SpringConfig::default`].
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let config = SpringConfig::default();
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: config.stiffness,
            damping: config.damping,
            at_rest: (initial - target).abs() < REST_THRESHOLD,
        }
    }

    /// Apply stiffness and damping from `config` (builder pattern).
    /// Stiffness is clamped to at least 0.1, damping to at least 0.0.
    #[must_use]
    pub fn with_config(mut self, config: SpringConfig) -> Self {
        self.stiffness = config.stiffness.max(MIN_STIFFNESS);
        self.damping = config.damping.max(0.0);
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Change the target, keeping position and velocity. Wakes the spring.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > REST_THRESHOLD {
            self.target = target;
            self.at_rest = false;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Semi-implicit Euler step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Snap to the target once close and slow enough.
    fn settle(&mut self) -> bool {
        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
        self.at_rest
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
            if self.settle() {
                break;
            }
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = (self.initial - self.target).abs() < REST_THRESHOLD;
    }
}
