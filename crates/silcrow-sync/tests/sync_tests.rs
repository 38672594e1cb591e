//! Integration tests for silcrow-sync
//!
//! Covers linking in both directions, fine-grained parameter subscriptions,
//! in-place list mutation, release and reentrancy.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use silcrow_router::{compile, Navigation, ParamValue, RouteTable, Scalar};
use silcrow_sync::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn app_table() -> Arc<RouteTable> {
    init_tracing();
    Arc::new(
        compile(
            "/",
            [
                ("photos/+photoIds&", "photos"),
                ("notes/:noteId?", "notes"),
                ("docs/...", "docs"),
                ("albums/:albumId/+photoIds&", "album"),
            ],
            false,
        )
        .unwrap(),
    )
}

fn path_of(value: &str) -> Observable<Option<String>> {
    Observable::new(Some(value.to_string()))
}

/// Counts path notifications from the moment it is called
fn count_changes(path: &Observable<Option<String>>) -> (Rc<Cell<usize>>, Subscription) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let subscription = path.subscribe(move |_| seen.set(seen.get() + 1));
    (count, subscription)
}

fn ints(values: &[i64]) -> ParamValue {
    ParamValue::List(values.iter().copied().map(Scalar::Int).collect())
}

// ============================================================================
// Path to state
// ============================================================================

#[test]
fn test_link_parses_present_path() {
    let path = path_of("/photos/1&2");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    let nav = state.snapshot().unwrap();
    assert_eq!(nav.destination, "photos");
    assert_eq!(nav.param("photoIds"), Some(&ints(&[1, 2])));
    assert_eq!(path.get().as_deref(), Some("/photos/1&2"));
}

#[test]
fn test_present_path_wins_over_state() {
    let path = path_of("/notes/5");
    let state = NavigationState::from_navigation(&Navigation::new("photos").with_list("photoIds", [9]));
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    assert_eq!(state.destination.get().as_deref(), Some("notes"));
    assert_eq!(path.get().as_deref(), Some("/notes/5"));
}

#[test]
fn test_absent_path_is_seeded_from_state() {
    let path = Observable::new(None);
    let state = NavigationState::from_navigation(&Navigation::new("notes").with_param("noteId", 3));
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    assert_eq!(path.get().as_deref(), Some("/notes/3"));
}

#[test]
fn test_path_change_updates_state() {
    let path = path_of("/notes");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    path.set(Some("/photos/4".to_string()));
    assert_eq!(
        state.snapshot(),
        Some(Navigation::new("photos").with_list("photoIds", [4]))
    );
}

#[test]
fn test_unroutable_path_clears_state() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    path.set(Some("/nowhere/at/all".to_string()));
    assert_eq!(state.destination.get(), None);
    assert_eq!(state.snapshot(), None);
    // Not echoed back into the path.
    assert_eq!(path.get().as_deref(), Some("/nowhere/at/all"));
}

#[test]
fn test_absent_path_clears_state() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    path.set(None);
    assert_eq!(state.snapshot(), None);
    assert_eq!(path.get(), None);
}

#[rstest]
#[case("/photos", "photos")]
#[case("/notes", "notes")]
#[case("/docs", "docs")]
fn test_path_is_not_rewritten_to_canonical_form(#[case] raw: &str, #[case] destination: &str) {
    let path = path_of(raw);
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    assert_eq!(state.destination.get().as_deref(), Some(destination));
    assert_eq!(path.get().as_deref(), Some(raw));
}

// ============================================================================
// State to path
// ============================================================================

#[test]
fn test_in_place_push_recomputes_path_once() {
    let path = path_of("/photos/1&2");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let (changes, _subscription) = count_changes(&path);

    state.parameters.get().list("photoIds").unwrap().push(Scalar::Int(3));

    assert_eq!(changes.get(), 1);
    assert_eq!(path.get().as_deref(), Some("/photos/1&2&3"));
}

#[test]
fn test_in_place_removal_and_clear() {
    let path = path_of("/photos/1&2");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let ids = state.parameters.get().list("photoIds").unwrap();

    ids.remove(0);
    assert_eq!(path.get().as_deref(), Some("/photos/2"));

    ids.clear();
    assert_eq!(path.get().as_deref(), Some("/photos/"));
}

#[test]
fn test_unknown_destination_clears_path() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    state.destination.set(Some("nowhere".to_string()));
    assert_eq!(path.get(), None);
}

#[test]
fn test_removed_plural_stringifies_as_empty() {
    let path = path_of("/photos/1&2");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    state.parameters.get().remove("photoIds");
    assert_eq!(path.get().as_deref(), Some("/photos/"));
}

#[test]
fn test_reassigned_list_is_resubscribed() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let params = state.parameters.get();
    let old = params.list("photoIds").unwrap();

    let fresh: ObservableList<Scalar> = [Scalar::Int(5)].into_iter().collect();
    params.set("photoIds", fresh.clone());
    assert_eq!(path.get().as_deref(), Some("/photos/5"));

    old.push(Scalar::Int(9));
    assert_eq!(path.get().as_deref(), Some("/photos/5"));

    fresh.push(Scalar::Int(6));
    assert_eq!(path.get().as_deref(), Some("/photos/5&6"));
}

#[test]
fn test_singular_parameter_change() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let params = state.parameters.get();

    params.set("noteId", Scalar::from("abc"));
    assert_eq!(path.get().as_deref(), Some("/notes/abc"));

    params.remove("noteId");
    assert_eq!(path.get().as_deref(), Some("/notes"));
}

#[test]
fn test_replacing_parameters_object() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let stale = state.parameters.get();

    let fresh = LiveParameters::new();
    fresh.set("noteId", Scalar::Int(8));
    state.parameters.set(fresh.clone());
    assert_eq!(path.get().as_deref(), Some("/notes/8"));

    stale.set("noteId", Scalar::Int(99));
    assert_eq!(path.get().as_deref(), Some("/notes/8"));

    fresh.set("noteId", Scalar::Int(10));
    assert_eq!(path.get().as_deref(), Some("/notes/10"));
}

#[test]
fn test_destination_change_rebuilds_subscriptions() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let params = state.parameters.get();
    let photos = params.list("photoIds").unwrap();

    state.destination.set(Some("notes".to_string()));
    assert_eq!(path.get().as_deref(), Some("/notes"));

    let (changes, _subscription) = count_changes(&path);
    photos.push(Scalar::Int(2));
    assert_eq!(changes.get(), 0);

    params.set("noteId", Scalar::Int(4));
    assert_eq!(path.get().as_deref(), Some("/notes/4"));
}

#[test]
fn test_remaining_path_change() {
    let path = path_of("/docs/guide");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    assert_eq!(state.remaining_path.get().as_deref(), Some("/guide"));

    state.remaining_path.set(Some("/api/intro".to_string()));
    assert_eq!(path.get().as_deref(), Some("/docs/api/intro"));
}

#[test]
fn test_empty_singular_survives_path_events() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    state.parameters.get().set("noteId", Scalar::from(""));
    assert_eq!(path.get().as_deref(), Some("/notes/"));

    path.set(Some("/notes/2".to_string()));
    path.set(Some("/notes/".to_string()));
    assert_eq!(
        state.snapshot(),
        Some(Navigation::new("notes").with_param("noteId", ""))
    );
}

// ============================================================================
// Batched state writes
// ============================================================================

fn record_history(path: &Observable<Option<String>>) -> (Rc<RefCell<Vec<Option<String>>>>, Subscription) {
    let history = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&history);
    let subscription = path.subscribe(move |value: &Option<String>| log.borrow_mut().push(value.clone()));
    (history, subscription)
}

#[test]
fn test_assign_writes_path_once() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let before = link.recomputations();
    let (history, _subscription) = record_history(&path);

    state.assign(&Navigation::new("notes").with_param("noteId", 3));

    assert_eq!(*history.borrow(), vec![Some("/notes/3".to_string())]);
    assert_eq!(link.recomputations(), before + 1);

    state.parameters.get().set("noteId", Scalar::Int(4));
    assert_eq!(path.get().as_deref(), Some("/notes/4"));
}

#[test]
fn test_clear_writes_path_once() {
    let path = path_of("/docs/a/b");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let (history, _subscription) = record_history(&path);

    state.clear();
    assert_eq!(*history.borrow(), vec![None]);
}

#[test]
fn test_explicit_batch_regenerates_at_commit() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let (history, _subscription) = record_history(&path);

    state.batch(|| {
        let params = state.parameters.get();
        params.list("photoIds").unwrap().push(Scalar::Int(2));
        params.set("albumId", Scalar::from("trip"));
        state.destination.set(Some("album".to_string()));
        assert!(history.borrow().is_empty());
    });

    assert_eq!(*history.borrow(), vec![Some("/albums/trip/1&2".to_string())]);
}

#[test]
fn test_destination_change_regenerates_once() {
    let path = path_of("/albums/trip/1");
    let state = NavigationState::new();
    let link = link_two_way(&app_table(), &path, &state, &Scope::new());
    let before = link.recomputations();

    state.destination.set(Some("photos".to_string()));
    assert_eq!(path.get().as_deref(), Some("/photos/1"));
    assert_eq!(link.recomputations(), before + 1);

    state.destination.set(Some("album".to_string()));
    assert_eq!(path.get().as_deref(), Some("/albums/trip/1"));
    assert_eq!(link.recomputations(), before + 2);
}

// ============================================================================
// Lifetime and reentrancy
// ============================================================================

#[test]
fn test_release_stops_propagation() {
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let link = link_two_way(&app_table(), &path, &state, &Scope::new());
    assert!(link.is_active());
    link.release();

    path.set(Some("/photos/2".to_string()));
    assert_eq!(state.destination.get().as_deref(), Some("notes"));

    state.parameters.get().set("noteId", Scalar::Int(7));
    assert_eq!(path.get().as_deref(), Some("/photos/2"));
}

#[test]
fn test_cancelling_outer_scope_releases_link() {
    let scope = Scope::new();
    let path = path_of("/notes/1");
    let state = NavigationState::new();
    let link = app_table().link_two_way(&path, &state, &scope);

    scope.cancel();
    assert!(!link.is_active());

    path.set(Some("/notes/2".to_string()));
    assert_eq!(
        state.snapshot().unwrap().param("noteId"),
        Some(&ParamValue::from("1"))
    );
}

#[test]
fn test_link_is_idle_between_changes() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let link = link_two_way(&app_table(), &path, &state, &Scope::new());
    assert_eq!(link.phase(), Phase::Idle);

    state.parameters.get().list("photoIds").unwrap().push(Scalar::Int(2));
    assert_eq!(link.phase(), Phase::Idle);
}

#[test]
fn test_no_feedback_from_own_writes() {
    let path = path_of("/photos/1");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    let assignments = Rc::new(Cell::new(0));
    let seen = Rc::clone(&assignments);
    let _watch = state.parameters.subscribe(move |_| seen.set(seen.get() + 1));

    state.parameters.get().list("photoIds").unwrap().push(Scalar::Int(2));
    // The path write is not parsed back into a fresh parameters object.
    assert_eq!(assignments.get(), 0);
    assert_eq!(path.get().as_deref(), Some("/photos/1&2"));
}

#[test]
fn test_two_links_share_one_table() {
    let table = app_table();
    let first = (path_of("/notes/1"), NavigationState::new());
    let second = (path_of("/photos/3"), NavigationState::new());
    let _a = link_two_way(&table, &first.0, &first.1, &Scope::new());
    let _b = link_two_way(&table, &second.0, &second.1, &Scope::new());

    first.1.parameters.get().set("noteId", Scalar::Int(2));
    assert_eq!(first.0.get().as_deref(), Some("/notes/2"));
    assert_eq!(second.0.get().as_deref(), Some("/photos/3"));
    assert_eq!(Arc::strong_count(&table), 3);
}

#[test]
fn test_path_history_in_order() {
    let path = path_of("/photos/");
    let state = NavigationState::new();
    let _link = link_two_way(&app_table(), &path, &state, &Scope::new());

    let history = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&history);
    let _watch = path.subscribe(move |value: &Option<String>| log.borrow_mut().push(value.clone()));

    let ids = state.parameters.get().list("photoIds").unwrap();
    ids.push(Scalar::Int(1));
    ids.push(Scalar::Int(2));

    assert_eq!(
        *history.borrow(),
        vec![Some("/photos/1".to_string()), Some("/photos/1&2".to_string())]
    );
}
