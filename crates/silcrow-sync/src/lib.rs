//! # Silcrow Sync
//!
//! Keeps a path slot and a live navigation state in agreement through a
//! [`silcrow_router::RouteTable`].
//!
//! - Observable cells ([`Observable`]) and collections ([`ObservableList`])
//!   notify synchronously on change
//! - [`Scope`] owns subscriptions; cancelling a scope cancels its children
//! - [`NavigationState`] is the live destination, parameters and remaining
//!   path the application reads and writes
//! - [`link_two_way`] wires a path to a state: path changes are parsed into
//!   the state, state changes are stringified into the path
//!
//! Everything here is single-threaded (`Rc`-based). Share the route table
//! across links with an `Arc`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use silcrow_router::compile;
//! use silcrow_sync::{LinkTwoWay, NavigationState, Observable, Scope};
//!
//! let table = Arc::new(compile("/", [("notes/:noteId?", "notes")], false).unwrap());
//! let path = Observable::new(None);
//! let state = NavigationState::new();
//! let scope = Scope::new();
//! let _link = table.link_two_way(&path, &state, &scope);
//!
//! state.destination.set(Some("notes".to_string()));
//! assert_eq!(path.get().as_deref(), Some("/notes"));
//!
//! path.set(Some("/notes/7".to_string()));
//! assert_eq!(
//!     state.snapshot().unwrap().param("noteId").map(|v| v.to_segment()),
//!     Some("7".to_string())
//! );
//! ```

mod collection;
mod engine;
mod observable;
mod observe;
mod scope;
mod state;
mod subscription;

pub use collection::ObservableList;
pub use engine::{link_two_way, Link, LinkTwoWay, Phase};
pub use observable::{Observable, WeakObservable};
pub use observe::{ObserveContent, ObserveProperty};
pub use scope::Scope;
pub use state::{LiveParameters, LiveValue, NavigationState, WeakNavigationState};
pub use subscription::Subscription;
