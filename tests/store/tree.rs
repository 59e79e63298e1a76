//! Moving, copying, destroying, and comparing subtrees

use arbor_foundation::{CollectionKind, DataType, ErrorKind};
use arbor_store::{DataStore, StoreConfig};

fn sample() -> DataStore {
    let mut store = DataStore::new();
    let root = store.root();
    store
        .create_view_and_allocate(root, "a/b/values", DataType::int32(4))
        .unwrap();
    store.create_view_string(root, "a/label", "first").unwrap();
    store.create_group(root, "c").unwrap();
    store
}

#[test]
fn move_view_changes_owner() {
    let mut store = sample();
    let root = store.root();
    let view = store.get_view(root, "a/label").unwrap();
    let c = store.get_group(root, "c").unwrap();

    store.move_view(c, view).unwrap();
    assert!(!store.has_view(root, "a/label"));
    assert_eq!(store.get_view(root, "c/label").unwrap(), view);
    assert_eq!(store.view(view).unwrap().owner(), c);
}

#[test]
fn move_view_into_collision_is_refused() {
    let mut store = sample();
    let root = store.root();
    let c = store.get_group(root, "c").unwrap();
    store.create_view(c, "label").unwrap();
    let view = store.get_view(root, "a/label").unwrap();

    let err = store.move_view(c, view).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameCollision { .. }));
    assert_eq!(store.get_view(root, "a/label").unwrap(), view);
}

#[test]
fn group_cannot_move_into_itself() {
    let mut store = sample();
    let root = store.root();
    let a = store.get_group(root, "a").unwrap();
    let b = store.get_group(root, "a/b").unwrap();

    assert!(matches!(
        store.move_group(b, a).unwrap_err().kind,
        ErrorKind::IllegalState(_)
    ));
    assert!(matches!(
        store.move_group(a, a).unwrap_err().kind,
        ErrorKind::IllegalState(_)
    ));
    store.move_group(root, a).unwrap();
    assert_eq!(store.group(a).unwrap().parent(), Some(root));
    assert!(store.has_view(root, "a/b/values"));
}

#[test]
fn root_cannot_move() {
    let mut store = sample();
    let root = store.root();
    let c = store.get_group(root, "c").unwrap();
    assert!(store.move_group(c, root).is_err());
}

#[test]
fn move_group_carries_subtree() {
    let mut store = sample();
    let root = store.root();
    let a = store.get_group(root, "a").unwrap();
    let c = store.get_group(root, "c").unwrap();

    store.move_group(c, a).unwrap();
    assert!(store.has_view(root, "c/a/b/values"));
    assert!(!store.has_group(root, "a"));
    assert_eq!(store.group(a).unwrap().parent(), Some(c));
}

#[test]
fn copy_group_shares_buffers() {
    let mut store = sample();
    let root = store.root();
    let a = store.get_group(root, "a").unwrap();
    let c = store.get_group(root, "c").unwrap();

    let copy = store.copy_group(c, a).unwrap();
    assert!(store.groups_equivalent(a, &store, copy));

    let original = store.get_view(root, "a/b/values").unwrap();
    let copied = store.get_view(root, "c/a/b/values").unwrap();
    let idx = store.view(original).unwrap().buffer_index().unwrap();
    assert_eq!(store.view(copied).unwrap().buffer_index(), Some(idx));
    assert_eq!(store.buffer(idx).unwrap().num_views(), 2);

    store.set_view_data(copied, &[1, 2, 3, 4]).unwrap();
    assert_eq!(store.view_data::<i32>(original).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn copy_into_own_subtree_is_refused() {
    let mut store = sample();
    let root = store.root();
    let a = store.get_group(root, "a").unwrap();
    let b = store.get_group(root, "a/b").unwrap();
    let groups = store.group_count();

    assert!(store.copy_group(b, a).is_err());
    assert_eq!(store.group_count(), groups);
}

#[test]
fn destroy_group_releases_subtree() {
    let mut store = sample();
    let root = store.root();
    let b = store.get_group(root, "a/b").unwrap();
    let values = store.get_view(root, "a/b/values").unwrap();

    store.destroy_group(root, "a").unwrap();
    assert!(store.group(b).is_none());
    assert!(store.view(values).is_none());
    assert_eq!(store.group_count(), 2);
    assert_eq!(store.view_count(), 0);
    assert_eq!(store.num_buffers(), 1);
}

#[test]
fn equivalence_ignores_collection_strategy() {
    let mut left = sample();
    let mut right = DataStore::with_config(StoreConfig::new().with_collections(CollectionKind::List));
    let root = right.root();
    right
        .create_view_and_allocate(root, "a/b/values", DataType::int32(4))
        .unwrap();
    right.create_view_string(root, "a/label", "other").unwrap();
    right.create_group(root, "c").unwrap();

    assert!(left.groups_equivalent(left.root(), &right, right.root()));

    let root = left.root();
    left.create_view(root, "c/extra").unwrap();
    assert!(!left.groups_equivalent(left.root(), &right, right.root()));
}

#[test]
fn render_tree_indents_by_depth() {
    let store = sample();
    let a = store.get_group(store.root(), "a").unwrap();
    assert_eq!(
        store.render_tree(a).unwrap(),
        "Group a\n    View label\n    Group b\n        View values\n"
    );
}
