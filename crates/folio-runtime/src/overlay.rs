#![forbid(unsafe_code)]

//! Transient overlays: the navbar dropdown and the slide-out sidebar.
//!
//! The state machine is the pure [`transition`] function. An [`Overlay`]
//! owns one instance of that state, mounts itself on an [`EventHub`] with
//! two listener guards (outside pointer-down, Escape), and hands children an
//! [`OverlayHandle`] so they can request changes without holding the state.
//!
//! | State  | Event              | Next   |
//! |--------|--------------------|--------|
//! | Closed | ToggleRequested    | Open   |
//! | Open   | ToggleRequested    | Closed |
//! | Open   | ItemSelected       | Closed |
//! | Open   | OutsideInteraction | Closed |
//! | Open   | EscapePressed      | Closed |
//! | Closed | anything else      | Closed |
//!
//! # Invariants
//!
//! 1. The state after any event sequence equals a left fold of
//!    [`transition`] over that sequence.
//! 2. Only effective changes are recorded as [`OverlayTransition`]s.
//! 3. Dropping the overlay removes both of its listeners from the hub.
//!
//! # Failure Modes
//!
//! - Bounds unknown: pointer-downs are ignored rather than treated as
//!   outside.
//! - Handle outlives the overlay: `send` returns `false`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use folio_core::{Event, EventKinds, PointerKind, Rect};

use crate::subscription::{EventHub, Listener};

/// Open/closed state of a transient surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

impl OverlayState {
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Input to the overlay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEvent {
    /// The toggle button was pressed.
    ToggleRequested,
    /// A navigation item inside the overlay was chosen.
    ItemSelected,
    /// A pointer-down landed outside the overlay root.
    OutsideInteraction,
    /// Escape was pressed.
    EscapePressed,
}

/// The overlay transition table.
#[must_use]
pub const fn transition(state: OverlayState, event: OverlayEvent) -> OverlayState {
    match (state, event) {
        (OverlayState::Closed, OverlayEvent::ToggleRequested) => OverlayState::Open,
        (OverlayState::Closed, _) => OverlayState::Closed,
        (OverlayState::Open, _) => OverlayState::Closed,
    }
}

/// An effective state change and the event that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTransition {
    pub from: OverlayState,
    pub to: OverlayState,
    pub cause: OverlayEvent,
}

struct OverlayCore {
    name: String,
    state: Cell<OverlayState>,
    bounds: Cell<Option<Rect>>,
    transitions: RefCell<Vec<OverlayTransition>>,
}

impl OverlayCore {
    fn send(&self, event: OverlayEvent) -> bool {
        let from = self.state.get();
        let to = transition(from, event);
        if from == to {
            return false;
        }
        self.state.set(to);
        self.transitions.borrow_mut().push(OverlayTransition {
            from,
            to,
            cause: event,
        });
        tracing::debug!(
            target: "folio.overlay",
            overlay = %self.name,
            from = ?from,
            to = ?to,
            cause = ?event,
            "overlay transition"
        );
        true
    }

    fn on_pointer(&self, event: &Event) {
        let Event::Pointer(pointer) = event else {
            return;
        };
        if pointer.kind != PointerKind::Down || !self.state.get().is_open() {
            return;
        }
        match self.bounds.get() {
            Some(bounds) if !bounds.contains(pointer.position()) => {
                self.send(OverlayEvent::OutsideInteraction);
            }
            Some(_) => {}
            None => {
                tracing::trace!(
                    target: "folio.overlay",
                    overlay = %self.name,
                    "pointer-down ignored, bounds unknown"
                );
            }
        }
    }

    fn on_key(&self, event: &Event) {
        if let Event::Key(key) = event
            && key.is_escape()
        {
            self.send(OverlayEvent::EscapePressed);
        }
    }
}

/// A mounted overlay with its own outside-click and Escape listeners.
pub struct Overlay {
    core: Rc<OverlayCore>,
    _pointer: Listener,
    _escape: Listener,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("name", &self.core.name)
            .field("state", &self.core.state.get())
            .field("bounds", &self.core.bounds.get())
            .finish()
    }
}

impl Overlay {
    /// Create a closed overlay and register its listeners on `hub`.
    #[must_use]
    pub fn mount(hub: &EventHub, name: impl Into<String>) -> Self {
        let core = Rc::new(OverlayCore {
            name: name.into(),
            state: Cell::new(OverlayState::Closed),
            bounds: Cell::new(None),
            transitions: RefCell::new(Vec::new()),
        });
        let weak = Rc::downgrade(&core);
        let pointer = hub.listen(EventKinds::POINTER, move |event| {
            if let Some(core) = weak.upgrade() {
                core.on_pointer(event);
            }
        });
        let weak = Rc::downgrade(&core);
        let escape = hub.listen(EventKinds::KEY, move |event| {
            if let Some(core) = weak.upgrade() {
                core.on_key(event);
            }
        });
        Self {
            core,
            _pointer: pointer,
            _escape: escape,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.core.state.get()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Apply `event`. Returns `true` if the state changed.
    pub fn send(&self, event: OverlayEvent) -> bool {
        self.core.send(event)
    }

    pub fn toggle(&self) -> bool {
        self.send(OverlayEvent::ToggleRequested)
    }

    /// Set the root bounds (client coordinates) used for outside detection.
    pub fn set_bounds(&self, bounds: Option<Rect>) {
        self.core.bounds.set(bounds);
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.core.bounds.get()
    }

    /// A setter capability for children.
    #[must_use]
    pub fn handle(&self) -> OverlayHandle {
        OverlayHandle {
            core: Rc::downgrade(&self.core),
        }
    }

    /// Drain the transitions recorded since the last call.
    pub fn take_transitions(&self) -> Vec<OverlayTransition> {
        self.core.transitions.take()
    }
}

/// Weak setter capability for an [`Overlay`].
#[derive(Clone)]
pub struct OverlayHandle {
    core: Weak<OverlayCore>,
}

impl fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl OverlayHandle {
    /// Apply `event` to the overlay. `false` if nothing changed or the
    /// overlay is gone.
    pub fn send(&self, event: OverlayEvent) -> bool {
        self.core.upgrade().is_some_and(|core| core.send(event))
    }

    pub fn close(&self) -> bool {
        self.send(OverlayEvent::ItemSelected)
    }

    pub fn toggle(&self) -> bool {
        self.send(OverlayEvent::ToggleRequested)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.core.strong_count() > 0
    }

    /// Current state, if the overlay still exists.
    #[must_use]
    pub fn state(&self) -> Option<OverlayState> {
        self.core.upgrade().map(|core| core.state.get())
    }
}
