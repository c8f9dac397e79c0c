#![forbid(unsafe_code)]

//! Per-child start offsets for cascading sibling animations.
//!
//! A [`Stagger`] gives child `i` of `n` the offset
//! `base + i * each` (forward) or `base + (n - 1 - i) * each` (reverse).
//! Reverse staggering is used when a group closes, so the last item leaves
//! first.

use std::time::Duration;

/// Order in which children start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaggerDirection {
    /// First child first.
    #[default]
    Forward,
    /// Last child first.
    Reverse,
}

/// Stagger timing for a group of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stagger {
    /// Delay before the first child starts.
    pub base: Duration,
    /// Increment between successive children.
    pub each: Duration,
    pub direction: StaggerDirection,
}

impl Stagger {
    /// Forward stagger with no base delay.
    #[must_use]
    pub const fn each(each: Duration) -> Self {
        Self {
            base: Duration::ZERO,
            each,
            direction: StaggerDirection::Forward,
        }
    }

    /// Set the base delay (builder pattern).
    #[must_use]
    pub const fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Reverse the order (builder pattern).
    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.direction = StaggerDirection::Reverse;
        self
    }

    /// Start offset of child `index` in a group of `count`.
    #[must_use]
    pub fn offset(&self, index: usize, count: usize) -> Duration {
        let slot = match self.direction {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => count.saturating_sub(1).saturating_sub(index),
        };
        self.base
            .saturating_add(self.each.saturating_mul(u32::try_from(slot).unwrap_or(u32::MAX)))
    }
}
