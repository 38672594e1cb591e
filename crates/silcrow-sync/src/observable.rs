// File: silcrow-sync/src/observable.rs
// Purpose: Shared, change-notifying value cell

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::subscription::{Registry, Subscription};

struct Inner<T> {
    value: RefCell<T>,
    subscribers: Rc<Registry<dyn Fn(&T)>>,
}

/// A shared value that notifies subscribers synchronously when it changes
///
/// Clones share the same cell. Setting a value equal to the current one is a
/// no-op; otherwise every subscriber runs, in registration order, before
/// `set` returns.
///
/// # Examples
///
/// ```
/// use silcrow_sync::Observable;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let path = Observable::new(String::from("/"));
/// let seen = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&seen);
/// let _sub = path.subscribe(move |_| counter.set(counter.get() + 1));
///
/// path.set("/photos".to_string());
/// path.set("/photos".to_string());
/// assert_eq!(seen.get(), 1);
/// ```
pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: Registry::new(),
            }),
        }
    }

    /// Reads the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Registers a change callback; it is not invoked for the current value
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribers.add(Rc::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles share the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Stores `value` and notifies subscribers if it differs from the current value
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.notify();
    }

    /// Applies `f` to the value, notifying subscribers if it changed
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    fn notify(&self) {
        let value = self.get();
        for (active, callback) in self.inner.subscribers.snapshot() {
            if active.get() {
                callback(&value);
            }
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

/// Non-owning handle to an [`Observable`]
pub struct WeakObservable<T> {
    inner: Weak<Inner<T>>,
}

impl<T> WeakObservable<T> {
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}
