#![forbid(unsafe_code)]

//! Scoped listeners for global host events.
//!
//! Every page-wide subscription (scroll, resize, pointer-down, key-down)
//! goes through an [`EventHub`]. Registering returns a [`Listener`] guard;
//! the subscription lives exactly as long as the guard. There is no
//! separate "remove listener" call to forget.
//!
//! # How it works
//!
//! 1. A component calls [`EventHub::listen`] with the [`EventKinds`] it wants
//!    and a handler closure, and stores the returned guard.
//! 2. The host forwards each event to [`EventHub::dispatch`].
//! 3. Dropping the guard removes the handler from the hub.
//!
//! # Invariants
//!
//! 1. After every guard from a hub has been dropped,
//!    [`listener_count`](EventHub::listener_count) is zero.
//! 2. Handlers run in registration order.
//! 3. Handlers may register or drop listeners while an event is being
//!    dispatched. The set of handlers for that event is fixed when dispatch
//!    starts.
//!
//! # Failure Modes
//!
//! - Guard outlives its hub: dropping it is a no-op.
//! - Listener dropped mid-dispatch: it still sees the event in flight, and
//!   no later ones.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use folio_core::{Event, EventKinds};

/// A unique identifier for a registered listener.
pub type SubId = u64;

type Handler = Rc<dyn Fn(&Event)>;

struct Entry {
    id: SubId,
    kinds: EventKinds,
    handler: Handler,
}

#[derive(Default)]
struct HubInner {
    next_id: Cell<SubId>,
    entries: RefCell<Vec<Entry>>,
}

impl HubInner {
    fn remove(&self, id: SubId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }
}

/// Single-threaded registry of event handlers.
///
/// Cloning the hub yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<HubInner>,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events whose kind intersects `kinds`.
    #[must_use = "dropping the listener unsubscribes it immediately"]
    pub fn listen(&self, kinds: EventKinds, handler: impl Fn(&Event) + 'static) -> Listener {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.entries.borrow_mut().push(Entry {
            id,
            kinds,
            handler: Rc::new(handler),
        });
        tracing::trace!(target: "folio.events", sub_id = id, kinds = ?kinds, "listener registered");
        Listener {
            id,
            kinds,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every matching handler. Returns how many ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .inner
            .entries
            .borrow()
            .iter()
            .filter(|e| e.kinds.intersects(kind))
            .map(|e| Rc::clone(&e.handler))
            .collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Number of live listeners interested in any of `kinds`.
    #[must_use]
    pub fn listener_count_for(&self, kinds: EventKinds) -> usize {
        self.inner
            .entries
            .borrow()
            .iter()
            .filter(|e| e.kinds.intersects(kinds))
            .count()
    }
}

/// Guard for a registered handler. Dropping it unsubscribes.
pub struct Listener {
    id: SubId,
    kinds: EventKinds,
    hub: Weak<HubInner>,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kinds", &self.kinds)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Listener {
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn kinds(&self) -> EventKinds {
        self.kinds
    }

    /// Whether the hub still exists and holds this listener.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.hub
            .upgrade()
            .is_some_and(|hub| hub.entries.borrow().iter().any(|e| e.id == self.id))
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade()
            && hub.remove(self.id)
        {
            tracing::trace!(target: "folio.events", sub_id = self.id, "listener removed");
        }
    }
}
