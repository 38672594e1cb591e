// File: silcrow-sync/src/collection.rs
// Purpose: Shared ordered collection with content-change notification

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::subscription::{Registry, Subscription};

struct Inner<T> {
    items: RefCell<Vec<T>>,
    subscribers: Rc<Registry<dyn Fn()>>,
}

/// An ordered collection whose length/element mutations notify subscribers
///
/// Equality is identity: two handles are equal when they share the same
/// collection, regardless of contents.
pub struct ObservableList<T> {
    inner: Rc<Inner<T>>,
}

impl<T: Clone + 'static> ObservableList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(Inner {
                items: RefCell::new(items),
                subscribers: Registry::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, item: T) {
        self.inner.items.borrow_mut().push(item);
        self.notify();
    }

    /// Inserts at `index`, clamped to the current length
    pub fn insert(&self, index: usize, item: T) {
        {
            let mut items = self.inner.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, item);
        }
        self.notify();
    }

    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Replaces the element at `index`; returns false when out of range
    pub fn set(&self, index: usize, item: T) -> bool {
        let replaced = match self.inner.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        };
        if replaced {
            self.notify();
        }
        replaced
    }

    pub fn clear(&self) {
        let had_items = {
            let mut items = self.inner.items.borrow_mut();
            let had_items = !items.is_empty();
            items.clear();
            had_items
        };
        if had_items {
            self.notify();
        }
    }

    /// Replaces the whole contents with a single notification
    pub fn replace_all(&self, items: impl IntoIterator<Item = T>) {
        *self.inner.items.borrow_mut() = items.into_iter().collect();
        self.notify();
    }

    /// Registers a content-change callback
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.subscribers.add(Rc::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn notify(&self) {
        for (active, callback) in self.inner.subscribers.snapshot() {
            if active.get() {
                callback();
            }
        }
    }
}

impl<T: Clone + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for ObservableList<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for ObservableList<T> {}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn watched(list: &ObservableList<i32>) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        let sub = list.subscribe(move || handle.set(handle.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_every_mutation_notifies_once() {
        let list = ObservableList::from_vec(vec![1, 2]);
        let (count, _sub) = watched(&list);

        list.push(3);
        list.insert(0, 0);
        list.set(1, 10);
        list.remove(0);
        list.replace_all([7, 8]);
        list.clear();

        assert_eq!(count.get(), 6);
        assert!(list.is_empty());
    }

    #[test]
    fn test_out_of_range_mutations_are_silent() {
        let list = ObservableList::from_vec(vec![1]);
        let (count, _sub) = watched(&list);

        assert_eq!(list.remove(5), None);
        assert!(!list.set(5, 1));
        ObservableList::<i32>::new().clear();

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_identity_equality() {
        let a = ObservableList::from_vec(vec![1]);
        let b = ObservableList::from_vec(vec![1]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
