//! Path creation and resolution

use arbor_foundation::{DataType, ErrorKind};
use arbor_store::DataStore;

#[test]
fn create_view_builds_intermediate_groups() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store.create_view(root, "a/b/c").unwrap();
    let sibling = store.create_view(root, "a/b/d").unwrap();

    let b = store.get_group(root, "a/b").unwrap();
    assert_eq!(store.group(b).unwrap().num_views(), 2);
    assert_eq!(store.get_view(b, "d").unwrap(), sibling);
    assert_eq!(store.view(view).unwrap().owner(), b);
    assert_eq!(store.group_count(), 3);
}

#[test]
fn lookup_through_missing_group_names_the_gap() {
    let mut store = DataStore::new();
    let root = store.root();
    store.create_view(root, "a/b/c").unwrap();

    let err = store.get_view(root, "a/x/c").unwrap_err();
    match err.kind {
        ErrorKind::PathNotFound { group, segment } => {
            assert_eq!(group, "a");
            assert_eq!(segment, "x");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!store.has_group(root, "a/x"));
}

#[test]
fn empty_segments_are_rejected() {
    let mut store = DataStore::new();
    let root = store.root();
    for path in ["", "/a", "a//b", "a/"] {
        let err = store.create_view(root, path).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)), "{path}");
    }
    assert_eq!(store.group_count(), 1);
}

#[test]
fn collision_on_final_name_is_refused() {
    let mut store = DataStore::new();
    let root = store.root();
    store.create_view(root, "mesh/coords").unwrap();

    let err = store
        .create_view_with_type(root, "mesh/coords", DataType::int32(2))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameCollision { .. }));
    assert_eq!(store.view_count(), 1);
}

#[test]
fn views_and_groups_have_separate_names() {
    let mut store = DataStore::new();
    let root = store.root();
    store.create_view(root, "shared").unwrap();
    store.create_group(root, "shared").unwrap();

    assert!(store.has_view(root, "shared"));
    assert!(store.has_group(root, "shared"));
}

#[test]
fn index_and_name_lookups_agree() {
    let mut store = DataStore::new();
    let root = store.root();
    for name in ["x", "y", "z"] {
        store.create_view(root, name).unwrap();
    }

    let g = store.group(root).unwrap();
    let idx = g.view_index("y").unwrap();
    assert_eq!(g.view_name(idx), Some("y"));
    assert_eq!(store.view_at(root, idx), g.child_view("y"));

    let mut seen = Vec::new();
    let mut next = g.first_valid_view_index();
    while let Some(idx) = next {
        seen.push(g.view_name(idx).unwrap().to_owned());
        next = g.next_valid_view_index(idx);
    }
    assert_eq!(seen, vec!["x", "y", "z"]);
}
