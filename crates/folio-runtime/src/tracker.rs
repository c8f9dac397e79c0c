#![forbid(unsafe_code)]

//! Scroll-driven observers: progress through a range, first viewport entry,
//! and a spring-smoothed progress follower.
//!
//! Trackers keep their own copy of the viewport, updated from the scroll
//! and resize events on the hub, and re-read the region geometry through a
//! [`RegionSource`] on every recompute so layout changes are picked up.
//!
//! # Invariants
//!
//! 1. [`ScrollProgressTracker::progress`] is always in `[0.0, 1.0]`.
//! 2. A region source returning `None` yields progress `0.0` and
//!    "not in view"; nothing panics.
//! 3. [`InViewObserver::entered_once`] never goes back to `false`.
//! 4. Dropping a tracker or observer deregisters its listeners.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_core::animation::spring::{Spring, SpringConfig};
use folio_core::{Event, EventKinds, Rect, ScrollRange, Viewport, in_view, scroll_progress};

use crate::subscription::{EventHub, Listener};

/// Reads the current document-space bounds of a tracked region.
pub type RegionSource = Rc<dyn Fn() -> Option<Rect>>;

/// Apply a scroll or resize event to `viewport`. Returns `true` if it
/// changed.
fn apply_viewport_event(viewport: &Cell<Viewport>, event: &Event) -> bool {
    let mut next = viewport.get();
    match *event {
        Event::Scroll { y } => next.scroll_y = y,
        Event::Resize { width, height } => {
            next.width = width;
            next.height = height;
        }
        _ => return false,
    }
    viewport.set(next);
    true
}

// ---------------------------------------------------------------------------
// ScrollProgressTracker
// ---------------------------------------------------------------------------

struct TrackerShared {
    region: RegionSource,
    range: ScrollRange,
    viewport: Cell<Viewport>,
    progress: Cell<f64>,
}

impl TrackerShared {
    fn recompute(&self) -> f64 {
        let region = (self.region)();
        let progress = scroll_progress(region.as_ref(), &self.viewport.get(), &self.range);
        if progress != self.progress.get() {
            tracing::trace!(target: "folio.scroll", progress, "scroll progress updated");
        }
        self.progress.set(progress);
        progress
    }
}

/// Progress of a region through a [`ScrollRange`], kept current from hub
/// scroll and resize events.
pub struct ScrollProgressTracker {
    shared: Rc<TrackerShared>,
    _scroll: Listener,
    _resize: Listener,
}

impl fmt::Debug for ScrollProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollProgressTracker")
            .field("range", &self.shared.range)
            .field("viewport", &self.shared.viewport.get())
            .field("progress", &self.shared.progress.get())
            .finish()
    }
}

impl ScrollProgressTracker {
    /// Start tracking `region` over `range`, seeded with `viewport`.
    #[must_use]
    pub fn mount(
        hub: &EventHub,
        viewport: Viewport,
        range: ScrollRange,
        region: RegionSource,
    ) -> Self {
        let shared = Rc::new(TrackerShared {
            region,
            range,
            viewport: Cell::new(viewport),
            progress: Cell::new(0.0),
        });
        shared.recompute();
        let on_scroll = Rc::clone(&shared);
        let scroll = hub.listen(EventKinds::SCROLL, move |event| {
            if apply_viewport_event(&on_scroll.viewport, event) {
                on_scroll.recompute();
            }
        });
        let on_resize = Rc::clone(&shared);
        let resize = hub.listen(EventKinds::RESIZE, move |event| {
            if apply_viewport_event(&on_resize.viewport, event) {
                on_resize.recompute();
            }
        });
        Self {
            shared,
            _scroll: scroll,
            _resize: resize,
        }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.shared.progress.get()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport.get()
    }

    #[must_use]
    pub fn range(&self) -> ScrollRange {
        self.shared.range
    }

    /// Recompute after the region moved without a scroll or resize.
    pub fn refresh(&self) -> f64 {
        self.shared.recompute()
    }
}

// ---------------------------------------------------------------------------
// InViewObserver
// ---------------------------------------------------------------------------

struct ObserverShared {
    region: RegionSource,
    margin: f64,
    viewport: Cell<Viewport>,
    visible: Cell<bool>,
    entered: Cell<bool>,
}

impl ObserverShared {
    fn recompute(&self) -> bool {
        let region = (self.region)();
        let visible = in_view(region.as_ref(), &self.viewport.get(), self.margin);
        self.visible.set(visible);
        if visible && !self.entered.replace(true) {
            tracing::debug!(target: "folio.scroll", margin = self.margin, "region entered view");
        }
        visible
    }
}

/// Whether a region intersects the viewport grown by `margin` pixels
/// (negative shrinks), latching the first entry.
pub struct InViewObserver {
    shared: Rc<ObserverShared>,
    _listener: Listener,
}

impl fmt::Debug for InViewObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InViewObserver")
            .field("margin", &self.shared.margin)
            .field("visible", &self.shared.visible.get())
            .field("entered_once", &self.shared.entered.get())
            .finish()
    }
}

impl InViewObserver {
    #[must_use]
    pub fn mount(hub: &EventHub, viewport: Viewport, margin: f64, region: RegionSource) -> Self {
        let shared = Rc::new(ObserverShared {
            region,
            margin,
            viewport: Cell::new(viewport),
            visible: Cell::new(false),
            entered: Cell::new(false),
        });
        shared.recompute();
        let on_event = Rc::clone(&shared);
        let listener = hub.listen(EventKinds::SCROLL | EventKinds::RESIZE, move |event| {
            if apply_viewport_event(&on_event.viewport, event) {
                on_event.recompute();
            }
        });
        Self {
            shared,
            _listener: listener,
        }
    }

    #[must_use]
    pub fn is_in_view(&self) -> bool {
        self.shared.visible.get()
    }

    #[must_use]
    pub fn entered_once(&self) -> bool {
        self.shared.entered.get()
    }

    pub fn refresh(&self) -> bool {
        self.shared.recompute()
    }
}

// ---------------------------------------------------------------------------
// ProgressSpring
// ---------------------------------------------------------------------------

/// Spring-smoothed follower of a progress value.
#[derive(Debug, Clone)]
pub struct ProgressSpring {
    spring: Spring,
}

impl ProgressSpring {
    /// Stiffness 100, damping 30: the gallery progress bar.
    pub const GALLERY: SpringConfig = SpringConfig::new(100.0, 30.0);

    #[must_use]
    pub fn new(config: SpringConfig) -> Self {
        Self {
            spring: Spring::new(0.0, 0.0).with_config(config),
        }
    }

    /// Retarget to `progress` and advance by `dt`. Returns the new value.
    pub fn follow(&mut self, progress: f64, dt: Duration) -> f64 {
        self.spring.set_target(progress.clamp(0.0, 1.0));
        self.spring.advance(dt);
        self.value()
    }

    /// Smoothed progress, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.spring.position().clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spring.is_at_rest()
    }
}

impl Default for ProgressSpring {
    fn default() -> Self {
        Self::new(Self::GALLERY)
    }
}
