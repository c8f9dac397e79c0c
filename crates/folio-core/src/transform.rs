#![forbid(unsafe_code)]

//! Transform mapping: progress or time to a visual transform value.
//!
//! [`ControlPoints`] is a piecewise-linear function defined by ordered
//! `(input, output)` pairs. [`MirrorLoop`] is the time-driven variant: a
//! value that runs `from -> to` and mirrors back forever.
//!
//! # Invariants
//!
//! 1. Control point inputs are non-decreasing (checked on construction).
//! 2. `map(p)` for `p` below the first input is the first output; above the
//!    last input it is the last output.
//! 3. Between bracketing points `(x0, y0)` and `(x1, y1)` with `x0 < x1`,
//!    `map(p) = y0 + (p - x0) / (x1 - x0) * (y1 - y0)`.
//! 4. `MirrorLoop::sample(t)` depends only on `t mod (2 * half_period)`.
//!
//! # Failure Modes
//!
//! - Empty point list or decreasing inputs: rejected with [`TransformError`].
//! - Mixed units across outputs: rejected.
//! - Non-finite progress: treated as the first input.
//! - Zero half-period: clamped to 1ns.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::animation::{EasingFn, ease_in_out};

/// CSS unit of a transform output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Unitless (opacity, scale).
    #[default]
    None,
    /// Pixels.
    Px,
    /// Percent of the element's own size.
    Percent,
}

impl Unit {
    const fn suffix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Px => "px",
            Self::Percent => "%",
        }
    }
}

/// A number with a unit, e.g. `500%` or `-200px`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformValue {
    pub value: f64,
    pub unit: Unit,
}

impl TransformValue {
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// Parse `"12px"`, `"-220%"`, or `"0.5"`.
    pub fn parse(s: &str) -> Result<Self, TransformError> {
        let s = s.trim();
        let (number, unit) = if let Some(n) = s.strip_suffix("px") {
            (n, Unit::Px)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Unit::Percent)
        } else {
            (s, Unit::None)
        };
        number
            .trim()
            .parse::<f64>()
            .map(|value| Self::new(value, unit))
            .map_err(|_| TransformError::BadValue(s.to_string()))
    }
}

impl fmt::Display for TransformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trim float noise so styles stay short: 12.000000001px -> 12px.
        let rounded = (self.value * 1000.0).round() / 1000.0;
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{rounded}{}", self.unit.suffix())
    }
}

/// Error building or parsing transform inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("control points must not be empty")]
    Empty,
    #[error("control point inputs must be non-decreasing (index {index}: {prev} > {next})")]
    Decreasing { index: usize, prev: f64, next: f64 },
    #[error("input and output lists differ in length ({inputs} vs {outputs})")]
    LengthMismatch { inputs: usize, outputs: usize },
    #[error("control point outputs mix units")]
    MixedUnits,
    #[error("control point value is not finite")]
    NotFinite,
    #[error("unparseable transform value {0:?}")]
    BadValue(String),
}

/// An immutable piecewise-linear mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints {
    points: Vec<(f64, f64)>,
    unit: Unit,
}

impl ControlPoints {
    /// Build from `(input, output)` pairs sharing `unit`.
    pub fn new(points: Vec<(f64, f64)>, unit: Unit) -> Result<Self, TransformError> {
        if points.is_empty() {
            return Err(TransformError::Empty);
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(TransformError::NotFinite);
        }
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].0 < pair[0].0 {
                return Err(TransformError::Decreasing {
                    index: index + 1,
                    prev: pair[0].0,
                    next: pair[1].0,
                });
            }
        }
        Ok(Self { points, unit })
    }

    /// Two-point mapping `[0, 1] -> [from, to]`.
    pub fn linear(from: TransformValue, to: TransformValue) -> Result<Self, TransformError> {
        if from.unit != to.unit {
            return Err(TransformError::MixedUnits);
        }
        Self::new(vec![(0.0, from.value), (1.0, to.value)], from.unit)
    }

    /// Build from separate input and CSS-like output lists, e.g.
    /// `[0.0, 1.0]` and `["0%", "500%"]`.
    pub fn parse(inputs: &[f64], outputs: &[&str]) -> Result<Self, TransformError> {
        if inputs.len() != outputs.len() {
            return Err(TransformError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        let values = outputs
            .iter()
            .map(|s| TransformValue::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        let unit = values.first().map(|v| v.unit).unwrap_or_default();
        if values.iter().any(|v| v.unit != unit) {
            return Err(TransformError::MixedUnits);
        }
        let points = inputs
            .iter()
            .zip(values.iter())
            .map(|(&x, v)| (x, v.value))
            .collect();
        Self::new(points, unit)
    }

    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Raw interpolated number for `progress`.
    #[must_use]
    pub fn map_raw(&self, progress: f64) -> f64 {
        let (first_x, first_y) = self.points[0];
        let (last_x, last_y) = self.points[self.points.len() - 1];
        if !progress.is_finite() || progress <= first_x {
            return first_y;
        }
        if progress >= last_x {
            return last_y;
        }
        // first_x < progress < last_x, so a segment with x0 <= p < x1 exists
        // and has non-zero width.
        let seg = self
            .points
            .windows(2)
            .find(|pair| pair[0].0 <= progress && progress < pair[1].0);
        match seg {
            Some(pair) => {
                let (x0, y0) = pair[0];
                let (x1, y1) = pair[1];
                y0 + (progress - x0) / (x1 - x0) * (y1 - y0)
            }
            None => last_y,
        }
    }

    /// Interpolated value with unit.
    #[must_use]
    pub fn map(&self, progress: f64) -> TransformValue {
        TransformValue::new(self.map_raw(progress), self.unit)
    }
}

/// A time-driven value that runs `from -> to` over `half_period` and then
/// mirrors back, forever.
#[derive(Debug, Clone, Copy)]
pub struct MirrorLoop {
    from: TransformValue,
    to: TransformValue,
    half_period: Duration,
    easing: EasingFn,
}

impl MirrorLoop {
    /// A mirrored loop with ease-in-out pacing. `to` adopts `from`'s unit.
    #[must_use]
    pub fn new(from: TransformValue, to: TransformValue, half_period: Duration) -> Self {
        Self {
            from,
            to: TransformValue::new(to.value, from.unit),
            half_period: if half_period.is_zero() {
                Duration::from_nanos(1)
            } else {
                half_period
            },
            easing: ease_in_out,
        }
    }

    /// Set the easing for each half (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Full period (there and back).
    #[must_use]
    pub fn period(&self) -> Duration {
        self.half_period.saturating_mul(2)
    }

    /// Linear phase in `[0, 1]`: 0 at `from`, 1 at `to`.
    #[must_use]
    pub fn phase(&self, elapsed: Duration) -> f64 {
        let half = self.half_period.as_nanos();
        let within = elapsed.as_nanos() % (half * 2);
        if within <= half {
            within as f64 / half as f64
        } else {
            (2 * half - within) as f64 / half as f64
        }
    }

    /// Value at `elapsed` since mount.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> TransformValue {
        let t = (self.easing)(self.phase(elapsed) as f32) as f64;
        let value = self.from.value + (self.to.value - self.from.value) * t;
        TransformValue::new(value, self.from.unit)
    }
}
