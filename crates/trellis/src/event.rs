//! Single-threaded signals and slots.
//!
//! A [`Signal`] holds a list of callbacks ("slots"). [`Signal::emit`] invokes all of them in the
//! order they were connected.
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use trellis::event::Signal;
//!
//! let sum = Rc::new(Cell::new(0));
//! let resized = Signal::new();
//!
//! let s = sum.clone();
//! let conn = resized.connect(move |&(w, h): &(u32, u32)| s.set(s.get() + w * h));
//! resized.emit(&(2, 3));
//! conn.disconnect();
//! resized.emit(&(4, 5));
//!
//! assert_eq!(sum.get(), 6);
//! ```
//!
//! Slots may connect and disconnect slots (including themselves) while the signal is being
//! emitted. Disconnected slots are not called for the rest of that emission, and newly connected
//! slots are first called on the next one.

use std::{
    cell::{Cell, RefCell},
    fmt, mem,
    rc::{Rc, Weak},
};

struct Slot<A> {
    connected: Rc<Cell<bool>>,
    callback: RefCell<Box<dyn FnMut(&A)>>,
}

type SlotList<A> = RefCell<Vec<Rc<Slot<A>>>>;

/// Type-erased access to a signal's slot list, so that [`Connection`] doesn't depend on `A`.
trait Prune {
    /// Drops every disconnected slot, unless the list is currently borrowed.
    fn prune(&self);
}

impl<A> Prune for SlotList<A> {
    fn prune(&self) {
        let Ok(mut slots) = self.try_borrow_mut() else {
            return;
        };
        let (live, dead): (Vec<_>, Vec<_>) =
            slots.drain(..).partition(|slot| slot.connected.get());
        *slots = live;
        drop(slots);
        // Dropping a closure can disconnect other slots, which needs the list unborrowed.
        drop(dead);
    }
}

/// An event source that calls connected slots when emitted.
pub struct Signal<A> {
    slots: Rc<SlotList<A>>,
    blocked: Cell<bool>,
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self {
            slots: Rc::default(),
            blocked: Cell::new(false),
        }
    }

    /// Connects a slot that is called on every subsequent [`Signal::emit`].
    pub fn connect<F>(&self, slot: F) -> Connection
    where
        A: 'static,
        F: FnMut(&A) + 'static,
    {
        let connected = Rc::new(Cell::new(true));
        let slots: Rc<dyn Prune> = self.slots.clone();
        let conn = Connection {
            connected: Rc::downgrade(&connected),
            slots: Rc::downgrade(&slots),
        };
        self.slots.borrow_mut().push(Rc::new(Slot {
            connected,
            callback: RefCell::new(Box::new(slot)),
        }));
        conn
    }

    /// Calls every connected slot with `args`.
    ///
    /// Does nothing while the signal is blocked. If a slot emits the signal it is connected to,
    /// the nested emission skips that slot.
    pub fn emit(&self, args: &A) {
        if self.blocked.get() {
            return;
        }

        let slots = self.slots.borrow().clone();
        for slot in &slots {
            if !slot.connected.get() {
                continue;
            }
            match slot.callback.try_borrow_mut() {
                Ok(mut callback) => callback(args),
                Err(_) => log::warn!("skipping slot that is already running (recursive `emit`)"),
            }
        }

        self.slots.prune();
    }

    /// Disconnects every slot.
    pub fn disconnect_all(&self) {
        let slots = mem::take(&mut *self.slots.borrow_mut());
        for slot in &slots {
            slot.connected.set(false);
        }
    }

    /// Returns the number of connected slots.
    pub fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|slot| slot.connected.get())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks or unblocks the signal. [`Signal::emit`] has no effect while it is blocked.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.len())
            .field("blocked", &self.blocked.get())
            .finish()
    }
}

/// A handle to a connected slot, returned by [`Signal::connect`].
///
/// Dropping a [`Connection`] does *not* disconnect the slot. Use [`Connection::scoped`] for that.
#[derive(Clone)]
pub struct Connection {
    connected: Weak<Cell<bool>>,
    slots: Weak<dyn Prune>,
}

impl Connection {
    /// Disconnects the slot from its signal. Does nothing if it is already disconnected.
    ///
    /// The slot and everything its closure captured are released right away, or at the end of
    /// the current [`Signal::emit`] if the signal is being emitted.
    pub fn disconnect(&self) {
        if let Some(connected) = self.connected.upgrade() {
            connected.set(false);
            // Release our strong count before pruning drops the slot.
            drop(connected);
            if let Some(slots) = self.slots.upgrade() {
                slots.prune();
            }
        }
    }

    /// Returns whether the slot is still connected.
    ///
    /// This returns `false` once the signal has been dropped.
    pub fn is_connected(&self) -> bool {
        self.connected.upgrade().map_or(false, |c| c.get())
    }

    /// Turns this handle into one that disconnects the slot when dropped.
    pub fn scoped(self) -> ScopedConnection {
        ScopedConnection(self)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// A [`Connection`] that disconnects its slot when dropped.
#[derive(Debug)]
#[must_use = "`ScopedConnection` should be assigned to a variable, or it will be dropped immediately"]
pub struct ScopedConnection(Connection);

impl ScopedConnection {
    pub fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    pub fn disconnect(&self) {
        self.0.disconnect();
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.0.disconnect();
    }
}
