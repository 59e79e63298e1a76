//! Buffer registry, sharing, and the last-view rule

use arbor_foundation::{DataType, ErrorKind, TypeId};
use arbor_store::DataStore;

#[test]
fn views_share_one_buffer() {
    let mut store = DataStore::new();
    let root = store.root();
    let idx = store.create_buffer_with(TypeId::Int32, 6).unwrap();
    store.buffer_mut(idx).unwrap().allocate().unwrap();

    let evens = store
        .create_view_with_buffer(root, "evens", Some(DataType::int32(3).with_stride(2)), idx)
        .unwrap();
    let odds = store
        .create_view_with_buffer(
            root,
            "odds",
            Some(DataType::int32(3).with_offset(1).with_stride(2)),
            idx,
        )
        .unwrap();
    store.set_view_data(evens, &[0, 2, 4]).unwrap();
    store.set_view_data(odds, &[1, 3, 5]).unwrap();

    assert_eq!(store.buffer(idx).unwrap().read::<i32>().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(store.buffer(idx).unwrap().num_views(), 2);
}

#[test]
fn destroying_last_view_with_data_frees_buffer() {
    let mut store = DataStore::new();
    let root = store.root();
    let a = store
        .create_view_and_allocate(root, "a", DataType::float64(4))
        .unwrap();
    let idx = store.view(a).unwrap().buffer_index().unwrap();
    store
        .create_view_with_buffer(root, "b", None, idx)
        .unwrap();

    store.destroy_view_and_data(root, "a").unwrap();
    assert!(store.has_buffer(idx));
    assert_eq!(store.buffer(idx).unwrap().num_views(), 1);

    store.destroy_view_and_data(root, "b").unwrap();
    assert!(!store.has_buffer(idx));
}

#[test]
fn plain_destroy_leaves_buffer_registered() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "a", DataType::int64(2))
        .unwrap();
    let idx = store.view(view).unwrap().buffer_index().unwrap();

    store.destroy_view(root, "a").unwrap();
    assert!(store.has_buffer(idx));
    assert_eq!(store.buffer(idx).unwrap().num_views(), 0);
    store.destroy_buffer(idx).unwrap();
    assert_eq!(store.num_buffers(), 0);
}

#[test]
fn buffers_in_use_cannot_be_destroyed() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "a", DataType::int32(1))
        .unwrap();
    let idx = store.view(view).unwrap().buffer_index().unwrap();

    let err = store.destroy_buffer(idx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::BufferInUse { views: 1, .. }));
    assert!(matches!(
        store.destroy_buffer(99).unwrap_err().kind,
        ErrorKind::BufferNotFound(99)
    ));
}

#[test]
fn destroy_all_buffers_unbinds_views() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "a", DataType::int32(3))
        .unwrap();
    store.create_buffer().unwrap();

    store.destroy_all_buffers();
    assert_eq!(store.num_buffers(), 0);
    let v = store.view(view).unwrap();
    assert!(!v.has_buffer());
    assert!(v.is_described());
}

#[test]
fn freed_buffer_indices_are_reused() {
    let mut store = DataStore::new();
    let first = store.create_buffer().unwrap();
    let second = store.create_buffer().unwrap();
    store.destroy_buffer(first).unwrap();

    assert_eq!(store.create_buffer().unwrap(), first);
    let indices: Vec<_> = store.buffers().map(|(idx, _)| idx).collect();
    assert_eq!(indices, vec![first, second]);
}

#[test]
fn sole_view_reallocates_and_keeps_prefix() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "grow", DataType::int32(3))
        .unwrap();
    store.set_view_data(view, &[7, 8, 9]).unwrap();

    store.reallocate_view(view, 5).unwrap();
    assert_eq!(store.view_data::<i32>(view).unwrap(), vec![7, 8, 9, 0, 0]);
    store.reallocate_view(view, 2).unwrap();
    assert_eq!(store.view_data::<i32>(view).unwrap(), vec![7, 8]);
}

#[test]
fn shared_buffer_refuses_reallocation() {
    let mut store = DataStore::new();
    let root = store.root();
    let a = store
        .create_view_and_allocate(root, "a", DataType::int32(3))
        .unwrap();
    let idx = store.view(a).unwrap().buffer_index().unwrap();
    store.create_view_with_buffer(root, "b", None, idx).unwrap();

    let err = store.reallocate_view(a, 10).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalState(_)));
    assert_eq!(store.buffer(idx).unwrap().num_elements(), 3);
}
