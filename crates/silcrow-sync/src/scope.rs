// File: silcrow-sync/src/scope.rs
// Purpose: Hierarchical ownership of subscriptions

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::subscription::Subscription;

#[derive(Default)]
struct Inner {
    cancelled: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
    children: RefCell<Vec<Scope>>,
}

/// Owner of subscriptions and nested scopes
///
/// Cancelling a scope cancels everything it owns, transitively. A scope that
/// is already cancelled cancels whatever is handed to it.
///
/// # Examples
///
/// ```
/// use silcrow_sync::{Observable, Scope};
///
/// let value = Observable::new(0);
/// let root = Scope::new();
/// let child = root.nest();
/// child.hold(value.subscribe(|_| {}));
/// assert_eq!(value.subscriber_count(), 1);
///
/// root.cancel();
/// assert!(child.is_cancelled());
/// assert_eq!(value.subscriber_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct Scope {
    inner: Rc<Inner>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child scope cancelled together with this one
    pub fn nest(&self) -> Scope {
        let child = Scope::new();
        if self.is_cancelled() {
            child.cancel();
            return child;
        }
        let mut children = self.inner.children.borrow_mut();
        children.retain(|existing| !existing.is_cancelled());
        children.push(child.clone());
        child
    }

    /// Takes ownership of a subscription
    pub fn hold(&self, subscription: Subscription) {
        if self.is_cancelled() {
            subscription.cancel();
        } else {
            self.inner.subscriptions.borrow_mut().push(subscription);
        }
    }

    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        drop(subscriptions);
        for child in children {
            child.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Number of live subscriptions held directly by this scope
    pub fn len(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("cancelled", &self.is_cancelled())
            .field("subscriptions", &self.len())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}
