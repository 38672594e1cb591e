// File: silcrow-sync/src/engine.rs
// Purpose: Two-way synchronization between a path slot and a navigation state

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use silcrow_router::{RouteTable, RouterError};
use tracing::{debug, warn};

use crate::observable::{Observable, WeakObservable};
use crate::observe::{ObserveContent, ObserveProperty};
use crate::scope::Scope;
use crate::state::{LiveParameters, LiveValue, NavigationState, WeakNavigationState};

/// Which direction a link is currently propagating
///
/// Any change observed while not [`Phase::Idle`] is feedback from the link's
/// own write and does not start the opposite propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Re-parsing the path into the state
    FromPath,
    /// Re-stringifying the state into the path
    FromState,
}

struct LinkCore {
    table: Arc<RouteTable>,
    path: WeakObservable<Option<String>>,
    state: WeakNavigationState,
    phase: Cell<Phase>,
    /// Set while `rebuild_watch` registers observers; their immediate calls do not regenerate
    rebuilding: Cell<bool>,
    recomputations: Cell<u64>,
    root: Scope,
    /// Per-parameter subscriptions for the current destination and parameters object
    watch: RefCell<Scope>,
}

impl LinkCore {
    fn on_path_changed(&self, path: Option<&str>) {
        if self.phase.get() != Phase::Idle {
            return;
        }
        self.phase.set(Phase::FromPath);
        self.apply_path(path);
        self.phase.set(Phase::Idle);
    }

    /// Parses `path` into the state; an unroutable or absent path clears it.
    fn apply_path(&self, path: Option<&str>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        match path.and_then(|path| self.table.parse(path)) {
            Some(navigation) => state.assign(&navigation),
            None => {
                debug!(path = ?path, "unroutable path, clearing navigation state");
                state.clear();
            }
        }
    }

    fn restringify(&self) {
        if self.phase.get() != Phase::Idle || self.rebuilding.get() {
            return;
        }
        let (Some(path), Some(state)) = (self.path.upgrade(), self.state.upgrade()) else {
            return;
        };
        if state.is_batching() {
            return;
        }
        self.recomputations.set(self.recomputations.get() + 1);
        self.phase.set(Phase::FromState);
        path.set(self.generate(&state));
        self.phase.set(Phase::Idle);
    }

    /// Never fails: an unknown destination yields an absent path.
    fn generate(&self, state: &NavigationState) -> Option<String> {
        let navigation = state.snapshot()?;
        match self.table.stringify(&navigation) {
            Ok(path) => Some(path),
            Err(RouterError::UnknownDestination(destination)) => {
                warn!(%destination, "no route for destination, path cleared");
                None
            }
            Err(err) => {
                warn!(error = %err, "path generation failed, path cleared");
                None
            }
        }
    }

    /// A destination or parameters object changed: re-subscribe, then regenerate once.
    ///
    /// Deferred while the state is inside a batch; the batch commit lands here.
    fn reshape(self: &Rc<Self>) {
        let batching = self.state.upgrade().is_some_and(|state| state.is_batching());
        if batching {
            return;
        }
        self.rebuilding.set(true);
        self.rebuild_watch();
        self.rebuilding.set(false);
        self.restringify();
    }

    /// Re-subscribes to the parameters relevant to the current destination
    fn rebuild_watch(self: &Rc<Self>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let scope = self.root.nest();
        let previous = self.watch.replace(scope.clone());
        previous.cancel();

        let Some(destination) = state.destination.get() else {
            return;
        };
        let parameters = state.parameters.get();
        let variables = self.table.variables_for(&destination);
        debug!(%destination, watched = variables.len(), "rebuilding parameter subscriptions");

        for variable in variables {
            let property = parameters.property(&variable.key);
            let core = Rc::downgrade(self);

            if variable.is_plural() {
                let parent = scope.clone();
                let contents = RefCell::new(scope.nest());
                property.observe_property(&scope, move |value: &Option<LiveValue>| {
                    let Some(core) = core.upgrade() else {
                        return;
                    };
                    let next = parent.nest();
                    contents.replace(next.clone()).cancel();
                    if let Some(LiveValue::List(list)) = value {
                        let on_content = Rc::downgrade(&core);
                        list.observe_content(&next, move || with_core(&on_content, LinkCore::restringify));
                    }
                    core.restringify();
                });
            } else {
                property.observe_property(&scope, move |_: &Option<LiveValue>| {
                    with_core(&core, LinkCore::restringify)
                });
            }
        }
    }
}

fn with_core(core: &Weak<LinkCore>, f: impl FnOnce(&LinkCore)) {
    if let Some(core) = core.upgrade() {
        f(&core);
    }
}

/// Cancel handle for a two-way link
///
/// Releasing (or dropping) the link cancels every nested subscription; no
/// further propagation happens in either direction.
#[must_use = "dropping a Link releases it immediately"]
pub struct Link {
    core: Rc<LinkCore>,
}

impl Link {
    pub fn release(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.core.root.is_cancelled()
    }

    pub fn phase(&self) -> Phase {
        self.core.phase.get()
    }

    /// How many times the link has regenerated the path from the state
    pub fn recomputations(&self) -> u64 {
        self.core.recomputations.get()
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        if self.is_active() {
            debug!("releasing navigation link");
            self.core.root.cancel();
        }
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("active", &self.is_active())
            .field("phase", &self.phase())
            .finish()
    }
}

/// Installs a two-way link between `path` and `state`
///
/// Path changes are parsed into the state; changes to the destination, the
/// parameters object, any parameter the destination's routes declare (and
/// the contents of plural parameters) or the remaining path are stringified
/// into the path. Writes made inside [`NavigationState::batch`] (including
/// `assign` and `clear`) produce a single path.
///
/// While linking, a present path wins and is parsed into the state. An
/// absent path is seeded from the state once the link is established.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use silcrow_router::{compile, Scalar};
/// use silcrow_sync::{link_two_way, NavigationState, Observable, Scope};
///
/// let table = Arc::new(compile("/", [("photos/+photoIds&", "photos")], false).unwrap());
/// let path = Observable::new(Some("/photos/1".to_string()));
/// let state = NavigationState::new();
/// let link = link_two_way(&table, &path, &state, &Scope::new());
///
/// assert_eq!(state.destination.get().as_deref(), Some("photos"));
///
/// state.parameters.get().list("photoIds").unwrap().push(Scalar::Int(2));
/// assert_eq!(path.get().as_deref(), Some("/photos/1&2"));
///
/// link.release();
/// ```
pub fn link_two_way(
    table: &Arc<RouteTable>,
    path: &Observable<Option<String>>,
    state: &NavigationState,
    scope: &Scope,
) -> Link {
    let root = scope.nest();
    let core = Rc::new(LinkCore {
        table: Arc::clone(table),
        path: path.downgrade(),
        state: state.downgrade(),
        phase: Cell::new(Phase::FromPath),
        rebuilding: Cell::new(false),
        recomputations: Cell::new(0),
        watch: RefCell::new(root.nest()),
        root,
    });
    debug!(path = ?path.get(), "linking path and navigation state");

    // Everything below runs as a path-originated propagation.
    let weak = Rc::downgrade(&core);
    state
        .parameters
        .observe_property(&core.root, move |_: &LiveParameters| {
            if let Some(core) = weak.upgrade() {
                core.reshape();
            }
        });

    let weak = Rc::downgrade(&core);
    state.destination.observe_property(&core.root, move |_: &Option<String>| {
        if let Some(core) = weak.upgrade() {
            core.reshape();
        }
    });

    let weak = Rc::downgrade(&core);
    state.remaining_path.observe_property(&core.root, move |_: &Option<String>| {
        with_core(&weak, LinkCore::restringify)
    });

    // Batched writes (`assign`, `clear`, `batch`) settle here, once.
    let weak = Rc::downgrade(&core);
    state.commits().observe_property(&core.root, move |_: &u64| {
        if let Some(core) = weak.upgrade() {
            core.reshape();
        }
    });

    let weak = Rc::downgrade(&core);
    path.observe_property(&core.root, move |value: &Option<String>| {
        with_core(&weak, |core| core.on_path_changed(value.as_deref()))
    });

    let initial = path.get();
    if initial.is_some() {
        core.apply_path(initial.as_deref());
    }
    core.phase.set(Phase::Idle);
    if initial.is_none() {
        core.restringify();
    }

    Link { core }
}

/// Method form of [`link_two_way`] on a shared route table
pub trait LinkTwoWay {
    fn link_two_way(
        &self,
        path: &Observable<Option<String>>,
        state: &NavigationState,
        scope: &Scope,
    ) -> Link;
}

impl LinkTwoWay for Arc<RouteTable> {
    fn link_two_way(
        &self,
        path: &Observable<Option<String>>,
        state: &NavigationState,
        scope: &Scope,
    ) -> Link {
        link_two_way(self, path, state, scope)
    }
}
