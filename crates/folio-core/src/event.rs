#![forbid(unsafe_code)]

//! Canonical host event types.
//!
//! The embedding host (a browser page, or a test) translates its native
//! events into [`Event`] values and pushes them into the runtime. All
//! events are plain data so tests can construct and compare them.
//!
//! # Design Notes
//!
//! - Pointer positions are client-space CSS pixels, matching
//!   `MouseEvent.clientX/clientY`.
//! - Only pointer-down is needed for outside-interaction dismissal; moves
//!   and releases exist so hosts can forward everything uniformly.
//! - `KeyEvent` carries the DOM `key` name mapped through
//!   [`KeyCode::from_dom_key`]. Only Escape has a meaning here (it closes
//!   overlays); every other key maps to [`KeyCode::Other`].

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical host event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event (`keydown`).
    Key(KeyEvent),

    /// A pointer event (`mousedown`, `mouseup`, `mousemove`).
    Pointer(PointerEvent),

    /// The document scrolled.
    Scroll {
        /// New vertical scroll offset.
        y: f64,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },

    /// Animation frame tick.
    Tick,
}

impl Event {
    /// The kind bit for listener filtering.
    #[must_use]
    pub const fn kind(&self) -> EventKinds {
        match self {
            Self::Key(_) => EventKinds::KEY,
            Self::Pointer(_) => EventKinds::POINTER,
            Self::Scroll { .. } => EventKinds::SCROLL,
            Self::Resize { .. } => EventKinds::RESIZE,
            Self::Tick => EventKinds::TICK,
        }
    }

    /// Convenience constructor for a key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Convenience constructor for a primary pointer-down at client `(x, y)`.
    #[must_use]
    pub const fn pointer_down(x: f64, y: f64) -> Self {
        Self::Pointer(PointerEvent::new(PointerKind::Down, x, y))
    }
}

bitflags! {
    /// Event kinds a listener subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        const KEY     = 0b0_0001;
        const POINTER = 0b0_0010;
        const SCROLL  = 0b0_0100;
        const RESIZE  = 0b0_1000;
        const TICK    = 0b1_0000;
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self { code }
    }

    /// Check if this is the Escape key.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
    }
}

/// Key codes the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    /// Any key this engine does not distinguish.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Moved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_escape_is_distinguished() {
        assert_eq!(KeyCode::from_dom_key("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("Esc"), KeyCode::Escape);
        for key in ["a", "Enter", "Tab", "ArrowDown", "PageUp", "F5", "escape", ""] {
            assert_eq!(KeyCode::from_dom_key(key), KeyCode::Other, "{key:?}");
        }
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Event::key(KeyCode::Escape).kind(), EventKinds::KEY);
        assert_eq!(Event::pointer_down(1.0, 2.0).kind(), EventKinds::POINTER);
        assert_eq!(Event::Scroll { y: 0.0 }.kind(), EventKinds::SCROLL);
        assert_eq!(
            Event::Resize {
                width: 1.0,
                height: 1.0
            }
            .kind(),
            EventKinds::RESIZE
        );
        assert_eq!(Event::Tick.kind(), EventKinds::TICK);
    }

    #[test]
    fn escape_detection() {
        assert!(KeyEvent::new(KeyCode::Escape).is_escape());
        assert!(!KeyEvent::new(KeyCode::Other).is_escape());
    }
}
