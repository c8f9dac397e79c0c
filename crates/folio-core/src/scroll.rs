#![forbid(unsafe_code)]

//! Scroll progress of a region through the viewport.
//!
//! A [`ScrollRange`] is a pair of [`ScrollMarker`]s. Each marker names an
//! edge of the tracked region and an edge of the viewport, written the
//! CSS-like way: `"start end"` means "the region's start meets the
//! viewport's end". A marker is satisfied at exactly one scroll offset:
//!
//! ```text
//! s = region.top + target_edge(region.height) - viewport_edge(viewport.height)
//! ```
//!
//! and progress is the position of the current scroll offset between the
//! start marker's offset and the end marker's offset.
//!
//! # Invariants
//!
//! 1. [`scroll_progress`] always returns a value in `[0.0, 1.0]`.
//! 2. For a fixed region and range, progress is monotonic in `scroll_y`.
//! 3. A missing region yields `0.0`.
//! 4. A degenerate range (both markers at the same offset) is a step:
//!    `0.0` before the offset, `1.0` at or after it.

use thiserror::Error;

use crate::geometry::{Rect, Viewport};

/// One edge position along an axis of length `len`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    /// Offset 0.
    Start,
    /// Offset `len / 2`.
    Center,
    /// Offset `len`.
    End,
    /// Offset `fraction * len`.
    Fraction(f64),
    /// Absolute pixel offset.
    Px(f64),
}

impl Edge {
    /// Resolve this edge to a pixel offset along an axis of length `len`.
    #[must_use]
    pub fn resolve(self, len: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => len / 2.0,
            Self::End => len,
            Self::Fraction(f) => f * len,
            Self::Px(px) => px,
        }
    }

    fn parse(token: &str) -> Result<Self, MarkerParseError> {
        let bad = || MarkerParseError::BadEdge(token.to_string());
        match token {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            t if t.ends_with("px") => t[..t.len() - 2]
                .parse::<f64>()
                .map(Self::Px)
                .map_err(|_| bad()),
            t if t.ends_with('%') => t[..t.len() - 1]
                .parse::<f64>()
                .map(|p| Self::Fraction(p / 100.0))
                .map_err(|_| bad()),
            t => t.parse::<f64>().map(Self::Fraction).map_err(|_| bad()),
        }
    }
}

/// Error parsing a scroll marker string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerParseError {
    #[error("scroll marker must have two edges, got {0:?}")]
    Arity(String),
    #[error("unrecognized marker edge {0:?}")]
    BadEdge(String),
}

/// Where the region edge meets the viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMarker {
    pub target: Edge,
    pub viewport: Edge,
}

impl ScrollMarker {
    #[must_use]
    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }

    /// Parse `"<target edge> <viewport edge>"`.
    pub fn parse(s: &str) -> Result<Self, MarkerParseError> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(t), Some(v), None) => Ok(Self::new(Edge::parse(t)?, Edge::parse(v)?)),
            _ => Err(MarkerParseError::Arity(s.to_string())),
        }
    }

    /// The scroll offset at which this marker is satisfied.
    #[must_use]
    pub fn scroll_offset(&self, region: &Rect, viewport: &Viewport) -> f64 {
        region.top() + self.target.resolve(region.height) - self.viewport.resolve(viewport.height)
    }
}

/// The start/end marker pair for a tracked region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub start: ScrollMarker,
    pub end: ScrollMarker,
}

impl ScrollRange {
    #[must_use]
    pub const fn new(start: ScrollMarker, end: ScrollMarker) -> Self {
        Self { start, end }
    }

    /// Parse a `[start, end]` marker pair.
    pub fn parse(start: &str, end: &str) -> Result<Self, MarkerParseError> {
        Ok(Self::new(ScrollMarker::parse(start)?, ScrollMarker::parse(end)?))
    }

    /// `["start start", "end start"]`: from the region top reaching the
    /// viewport top until the region bottom leaves through it.
    #[must_use]
    pub const fn leaving_top() -> Self {
        Self::new(
            ScrollMarker::new(Edge::Start, Edge::Start),
            ScrollMarker::new(Edge::End, Edge::Start),
        )
    }

    /// `["end end", "start start"]`, used by the gallery progress bar.
    #[must_use]
    pub const fn gallery() -> Self {
        Self::new(
            ScrollMarker::new(Edge::End, Edge::End),
            ScrollMarker::new(Edge::Start, Edge::Start),
        )
    }
}

impl Default for ScrollRange {
    /// `["start end", "end end"]`: from the region entering at the bottom
    /// of the viewport until it is fully inside it.
    fn default() -> Self {
        Self::new(
            ScrollMarker::new(Edge::Start, Edge::End),
            ScrollMarker::new(Edge::End, Edge::End),
        )
    }
}

/// Progress of `region` (document space) through the viewport.
///
/// See the module docs for the formula. `None` yields `0.0`.
#[must_use]
pub fn scroll_progress(region: Option<&Rect>, viewport: &Viewport, range: &ScrollRange) -> f64 {
    let Some(region) = region else {
        return 0.0;
    };
    let s0 = range.start.scroll_offset(region, viewport);
    let s1 = range.end.scroll_offset(region, viewport);
    let span = s1 - s0;
    if !span.is_finite() || !viewport.scroll_y.is_finite() {
        return 0.0;
    }
    if span.abs() < f64::EPSILON {
        return if viewport.scroll_y >= s0 { 1.0 } else { 0.0 };
    }
    ((viewport.scroll_y - s0) / span).clamp(0.0, 1.0)
}

/// Whether `region` (document space) overlaps the viewport inflated by
/// `margin` pixels. A negative margin requires the region to be that far
/// inside the viewport before it counts.
#[must_use]
pub fn in_view(region: Option<&Rect>, viewport: &Viewport, margin: f64) -> bool {
    let Some(region) = region else {
        return false;
    };
    let root = viewport.document_rect().inflate(margin);
    !root.is_empty() && region.intersects(&root)
}
