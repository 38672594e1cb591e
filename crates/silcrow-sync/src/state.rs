// File: silcrow-sync/src/state.rs
// Purpose: Live, observable navigation state

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use silcrow_router::{Navigation, ParamValue, Parameters, Scalar};

use crate::collection::ObservableList;
use crate::observable::{Observable, WeakObservable};

/// A parameter value inside live state
///
/// Lists are shared collections, so they can be mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveValue {
    Value(Scalar),
    List(ObservableList<Scalar>),
}

impl LiveValue {
    pub fn to_param(&self) -> ParamValue {
        match self {
            LiveValue::Value(value) => ParamValue::Single(value.clone()),
            LiveValue::List(list) => ParamValue::List(list.snapshot()),
        }
    }
}

impl From<ParamValue> for LiveValue {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Single(value) => LiveValue::Value(value),
            ParamValue::List(items) => LiveValue::List(ObservableList::from_vec(items)),
        }
    }
}

impl From<Scalar> for LiveValue {
    fn from(value: Scalar) -> Self {
        LiveValue::Value(value)
    }
}

impl From<ObservableList<Scalar>> for LiveValue {
    fn from(list: ObservableList<Scalar>) -> Self {
        LiveValue::List(list)
    }
}

/// Parameter object with one observable cell per key
///
/// Cells are created on first access, so a key can be observed before it is
/// ever assigned. Equality is identity.
#[derive(Clone, Default)]
pub struct LiveParameters {
    cells: Rc<RefCell<BTreeMap<String, Observable<Option<LiveValue>>>>>,
}

impl LiveParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(parameters: &Parameters) -> Self {
        let live = Self::new();
        for (key, value) in parameters {
            live.set(key.as_str(), LiveValue::from(value.clone()));
        }
        live
    }

    /// The observable cell for `key`
    pub fn property(&self, key: &str) -> Observable<Option<LiveValue>> {
        self.cells
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| Observable::new(None))
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<LiveValue> {
        let cell = self.cells.borrow().get(key).cloned();
        cell.and_then(|cell| cell.get())
    }

    pub fn set(&self, key: &str, value: impl Into<LiveValue>) {
        self.property(key).set(Some(value.into()));
    }

    /// Clears a key; observers see `None`
    pub fn remove(&self, key: &str) {
        self.property(key).set(None);
    }

    /// The list bound to `key`, if it currently holds one
    pub fn list(&self, key: &str) -> Option<ObservableList<Scalar>> {
        match self.get(key) {
            Some(LiveValue::List(list)) => Some(list),
            _ => None,
        }
    }

    /// Plain parameters for generation; cleared keys are left out
    pub fn snapshot(&self) -> Parameters {
        let cells: Vec<(String, Observable<Option<LiveValue>>)> = self
            .cells
            .borrow()
            .iter()
            .map(|(key, cell)| (key.clone(), cell.clone()))
            .collect();

        cells
            .into_iter()
            .filter_map(|(key, cell)| cell.get().map(|value| (key, value.to_param())))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }
}

impl PartialEq for LiveParameters {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for LiveParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

/// Open batches and the counter bumped when the outermost one closes
#[derive(Debug, Default)]
struct Batch {
    depth: Cell<usize>,
    commits: Observable<u64>,
}

/// Live navigation state observed by the synchronization engine
///
/// Owned and mutated by the embedding application. Clones share the same
/// cells.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub destination: Observable<Option<String>>,
    pub parameters: Observable<LiveParameters>,
    pub remaining_path: Observable<Option<String>>,
    batch: Rc<Batch>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_navigation(navigation: &Navigation) -> Self {
        let state = Self::new();
        state.assign(navigation);
        state
    }

    /// Replaces destination, parameters and remaining path
    ///
    /// Parameters always get a fresh [`LiveParameters`] object.
    /// Runs as one batch, so a link regenerates the path once.
    pub fn assign(&self, navigation: &Navigation) {
        self.batch(|| {
            self.parameters
                .set(LiveParameters::from_parameters(&navigation.parameters));
            self.remaining_path.set(navigation.remaining_path.clone());
            self.destination.set(Some(navigation.destination.clone()));
        });
    }

    /// Resets to "nowhere": no destination, no parameters, no remaining path
    pub fn clear(&self) {
        self.batch(|| {
            self.parameters.set(LiveParameters::new());
            self.remaining_path.set(None);
            self.destination.set(None);
        });
    }

    /// Groups several field writes into one change
    ///
    /// Field observers still fire as each write happens. Batch-aware
    /// observers (such as a link) wait for [`NavigationState::commits`],
    /// bumped once when the outermost batch closes.
    ///
    /// # Examples
    ///
    /// ```
    /// use silcrow_sync::NavigationState;
    ///
    /// let state = NavigationState::new();
    /// state.batch(|| {
    ///     assert!(state.is_batching());
    ///     state.destination.set(Some("notes".to_string()));
    ///     state.remaining_path.set(Some("/x".to_string()));
    /// });
    /// assert!(!state.is_batching());
    /// assert_eq!(state.commits().get(), 1);
    /// ```
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let depth = &self.batch.depth;
        depth.set(depth.get() + 1);
        let result = f();
        depth.set(depth.get() - 1);
        if depth.get() == 0 {
            self.batch.commits.update(|n| *n = n.wrapping_add(1));
        }
        result
    }

    pub fn is_batching(&self) -> bool {
        self.batch.depth.get() > 0
    }

    /// Number of closed batches; changes once per outermost batch
    pub fn commits(&self) -> &Observable<u64> {
        &self.batch.commits
    }

    /// Plain navigation; `None` while no destination is set
    pub fn snapshot(&self) -> Option<Navigation> {
        let destination = self.destination.get()?;
        Some(Navigation {
            destination,
            parameters: self.parameters.get().snapshot(),
            remaining_path: self.remaining_path.get(),
        })
    }

    pub fn downgrade(&self) -> WeakNavigationState {
        WeakNavigationState {
            destination: self.destination.downgrade(),
            parameters: self.parameters.downgrade(),
            remaining_path: self.remaining_path.downgrade(),
            batch: Rc::downgrade(&self.batch),
        }
    }
}

/// Non-owning handle to a [`NavigationState`]
#[derive(Clone)]
pub struct WeakNavigationState {
    destination: WeakObservable<Option<String>>,
    parameters: WeakObservable<LiveParameters>,
    remaining_path: WeakObservable<Option<String>>,
    batch: Weak<Batch>,
}

impl WeakNavigationState {
    pub fn upgrade(&self) -> Option<NavigationState> {
        Some(NavigationState {
            destination: self.destination.upgrade()?,
            parameters: self.parameters.upgrade()?,
            remaining_path: self.remaining_path.upgrade()?,
            batch: self.batch.upgrade()?,
        })
    }
}
