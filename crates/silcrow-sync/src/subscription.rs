// File: silcrow-sync/src/subscription.rs
// Purpose: Subscriber registries and the cancel handle they hand out

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Removal side of a registry, erased over the callback type
trait Detach {
    fn detach(&self, id: u64);
}

struct Entry<F: ?Sized> {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Rc<F>,
}

/// Ordered list of subscriber callbacks
///
/// Callbacks are invoked from a snapshot, so subscribing or cancelling from
/// inside a callback is allowed. A cancelled entry is skipped even when it is
/// still part of a snapshot being delivered.
pub(crate) struct Registry<F: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry<F>>>,
}

impl<F: ?Sized + 'static> Registry<F> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn add(self: &Rc<Self>, callback: Rc<F>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));

        self.entries.borrow_mut().push(Entry {
            id,
            active: Rc::clone(&active),
            callback,
        });

        let registry: Weak<dyn Detach> = Rc::downgrade(self) as Weak<dyn Detach>;
        Subscription {
            id,
            active,
            registry,
        }
    }

    /// Active callbacks in registration order, each paired with its liveness flag
    pub(crate) fn snapshot(&self) -> Vec<(Rc<Cell<bool>>, Rc<F>)> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.callback)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<F: ?Sized> Detach for Registry<F> {
    fn detach(&self, id: u64) {
        // Dropped outside the borrow: a callback may own scopes whose drop detaches again.
        let removed: Vec<Entry<F>> = {
            let mut entries = self.entries.borrow_mut();
            let (gone, kept): (Vec<_>, Vec<_>) = entries.drain(..).partition(|entry| entry.id == id);
            *entries = kept;
            gone
        };
        drop(removed);
    }
}

/// Cancel handle for one subscription
///
/// Cancelling (explicitly or by dropping the handle) permanently stops
/// notifications for that callback.
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    pub fn cancel(&self) {
        if self.active.replace(false) {
            if let Some(registry) = self.registry.upgrade() {
                registry.detach(self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
