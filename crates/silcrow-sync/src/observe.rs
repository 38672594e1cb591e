// File: silcrow-sync/src/observe.rs
// Purpose: Observation capabilities the synchronization engine depends on

use std::rc::Rc;

use crate::collection::ObservableList;
use crate::observable::Observable;
use crate::scope::Scope;

/// Observe a scalar property
///
/// The callback runs once immediately with the current value and again on
/// every change. The subscription is owned by `scope`.
pub trait ObserveProperty<T> {
    fn observe_property(&self, scope: &Scope, callback: impl Fn(&T) + 'static);
}

/// Observe the contents of an ordered collection
///
/// The callback runs on every length or element mutation. The subscription
/// is owned by `scope`.
pub trait ObserveContent {
    fn observe_content(&self, scope: &Scope, callback: impl Fn() + 'static);
}

impl<T: Clone + PartialEq + 'static> ObserveProperty<T> for Observable<T> {
    fn observe_property(&self, scope: &Scope, callback: impl Fn(&T) + 'static) {
        if scope.is_cancelled() {
            return;
        }
        let callback = Rc::new(callback);
        let on_change = Rc::clone(&callback);
        scope.hold(self.subscribe(move |value| on_change(value)));
        callback(&self.get());
    }
}

impl<T: Clone + 'static> ObserveContent for ObservableList<T> {
    fn observe_content(&self, scope: &Scope, callback: impl Fn() + 'static) {
        scope.hold(self.subscribe(callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_property_called_immediately_then_on_change() {
        let value = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let scope = Scope::new();

        value.observe_property(&scope, move |v| sink.borrow_mut().push(*v));
        value.set(2);
        scope.cancel();
        value.set(3);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_content_not_called_immediately() {
        let list = ObservableList::from_vec(vec![1]);
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let scope = Scope::new();

        list.observe_content(&scope, move || *sink.borrow_mut() += 1);
        assert_eq!(*calls.borrow(), 0);
        list.push(2);
        assert_eq!(*calls.borrow(), 1);
    }
}
