#![forbid(unsafe_code)]

//! Host-driven single-shot timers.
//!
//! [`Timers`] keeps a virtual clock that only moves when the host calls
//! [`advance`](Timers::advance). Scheduling returns a [`TimerHandle`]; the
//! timer is cancelled when the handle is dropped, the same way a listener
//! guard unsubscribes. A [`DeferredSlot`] holds at most one pending timer:
//! scheduling into it cancels whatever was there before.
//!
//! # Invariants
//!
//! 1. Due timers fire in deadline order; ties fire in scheduling order.
//! 2. A timer fires at most once, and never after its handle is dropped.
//! 3. A timer scheduled by a callback during `advance` fires in the same
//!    `advance` if its deadline falls inside the step.
//! 4. A [`DeferredSlot`] never has more than one pending timer.
//!
//! # Failure Modes
//!
//! - Handle outlives its `Timers`: dropping it is a no-op.
//! - Zero delay: the timer fires on the next `advance`, even `advance(0)`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

type Callback = Box<dyn FnOnce()>;

struct Pending {
    id: u64,
    deadline: Duration,
    label: &'static str,
    callback: Callback,
}

#[derive(Default)]
struct TimersInner {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
}

impl TimersInner {
    fn cancel(&self, id: u64) -> Option<&'static str> {
        let mut pending = self.pending.borrow_mut();
        let index = pending.iter().position(|p| p.id == id)?;
        Some(pending.remove(index).label)
    }

    fn contains(&self, id: u64) -> bool {
        self.pending.borrow().iter().any(|p| p.id == id)
    }

    /// Remove the earliest timer due at or before `limit`.
    fn pop_due(&self, limit: Duration) -> Option<Pending> {
        let mut pending = self.pending.borrow_mut();
        let index = pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= limit)
            .min_by_key(|(_, p)| (p.deadline, p.id))
            .map(|(i, _)| i)?;
        Some(pending.remove(index))
    }
}

/// A virtual clock with single-shot timers.
///
/// Cloning yields another handle to the same clock.
#[derive(Clone, Default)]
pub struct Timers {
    inner: Rc<TimersInner>,
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("now", &self.now())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Run `callback` once, `delay` from now.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn schedule(
        &self,
        delay: Duration,
        label: &'static str,
        callback: impl FnOnce() + 'static,
    ) -> TimerHandle {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let deadline = self.now().saturating_add(delay);
        self.inner.pending.borrow_mut().push(Pending {
            id,
            deadline,
            label,
            callback: Box::new(callback),
        });
        tracing::trace!(
            target: "folio.timer",
            timer = label,
            id,
            deadline_ms = deadline.as_millis() as u64,
            "timer scheduled"
        );
        TimerHandle {
            id,
            label,
            timers: Rc::downgrade(&self.inner),
        }
    }

    /// Move the clock forward by `dt`, firing every timer that comes due.
    /// Returns the number of timers fired.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now().saturating_add(dt);
        let mut fired = 0;
        while let Some(due) = self.inner.pop_due(target) {
            self.inner.now.set(due.deadline.max(self.now()));
            tracing::debug!(target: "folio.timer", timer = due.label, id = due.id, "timer fired");
            (due.callback)();
            fired += 1;
        }
        self.inner.now.set(target);
        fired
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner.pending.borrow().iter().map(|p| p.deadline).min()
    }
}

/// Ownership of one scheduled timer. Dropping it cancels the timer.
pub struct TimerHandle {
    id: u64,
    label: &'static str,
    timers: Weak<TimersInner>,
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl TimerHandle {
    /// Whether the timer is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timers
            .upgrade()
            .is_some_and(|timers| timers.contains(self.id))
    }

    /// Cancel the timer. Returns `true` if it had not fired yet.
    pub fn cancel(&self) -> bool {
        let Some(timers) = self.timers.upgrade() else {
            return false;
        };
        match timers.cancel(self.id) {
            Some(label) => {
                tracing::trace!(target: "folio.timer", timer = label, id = self.id, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// DeferredSlot
// ---------------------------------------------------------------------------

/// Holds at most one pending timer; a newer schedule supersedes the older.
pub struct DeferredSlot {
    timers: Timers,
    label: &'static str,
    current: RefCell<Option<TimerHandle>>,
}

impl fmt::Debug for DeferredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredSlot")
            .field("label", &self.label)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl DeferredSlot {
    #[must_use]
    pub fn new(timers: &Timers, label: &'static str) -> Self {
        Self {
            timers: timers.clone(),
            label,
            current: RefCell::new(None),
        }
    }

    /// Schedule `callback` after `delay`, cancelling any pending one.
    /// Returns `true` if a pending timer was superseded.
    pub fn schedule(&self, delay: Duration, callback: impl FnOnce() + 'static) -> bool {
        let handle = self.timers.schedule(delay, self.label, callback);
        let previous = self.current.replace(Some(handle));
        let superseded = previous.is_some_and(|old| old.cancel());
        if superseded {
            tracing::debug!(target: "folio.timer", slot = self.label, "pending timer superseded");
        }
        superseded
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&self) -> bool {
        self.current.take().is_some_and(|handle| handle.cancel())
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(TimerHandle::is_pending)
    }
}
