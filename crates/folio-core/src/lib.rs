#![forbid(unsafe_code)]

//! Core: geometry, input events, scroll progress, transform mapping, and
//! animation primitives.
//!
//! # Role in folio
//! `folio-core` is the pure layer. Nothing here touches the document, a
//! clock, or a listener: every function is a deterministic mapping from
//! inputs (region geometry, viewport, elapsed time) to outputs (progress,
//! transform values, animation values).
//!
//! # Primary responsibilities
//! - **Rect / Viewport**: document-space geometry and hit testing.
//! - **Event**: canonical host events (keys, pointer, scroll, resize, tick).
//! - **scroll**: region progress through the viewport, and in-view tests.
//! - **transform**: piecewise-linear control points and the mirrored loop.
//! - **animation**: easing, fades, springs, stagger offsets, and timelines.
//!
//! # How it fits in the system
//! `folio-runtime` owns the stateful pieces (listeners, timers, overlays,
//! navigation) and calls into this crate for every computation. `folio-web`
//! adapts both to a browser document.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod scroll;
pub mod transform;

pub use event::{Event, EventKinds, KeyCode, KeyEvent, PointerEvent, PointerKind};
pub use geometry::{Point, Rect, Viewport};
pub use scroll::{Edge, ScrollMarker, ScrollRange, in_view, scroll_progress};
pub use transform::{ControlPoints, MirrorLoop, TransformError, TransformValue, Unit};
