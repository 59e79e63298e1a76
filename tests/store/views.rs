//! View states and data access

use std::sync::Arc;

use arbor_foundation::{DataType, ErrorKind, TypeId};
use arbor_store::{DataStore, MemoryPersistentStore, PersistentStore, SharedBlock, ViewState};

#[test]
fn state_follows_the_binding() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store.create_view(root, "v").unwrap();
    assert_eq!(store.view(view).unwrap().state(), ViewState::Empty);

    store.describe_view(view, DataType::float32(4)).unwrap();
    assert_eq!(store.view(view).unwrap().state(), ViewState::Described);
    assert!(!store.is_allocated(view));

    store.allocate_view(view).unwrap();
    assert_eq!(store.view(view).unwrap().state(), ViewState::Buffer);
    assert!(store.is_applied(view));

    store.detach_buffer(view).unwrap();
    assert_eq!(store.view(view).unwrap().state(), ViewState::Described);
}

#[test]
fn bound_views_refuse_new_descriptions() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "v", DataType::int32(2))
        .unwrap();

    let err = store.describe_view(view, DataType::int32(4)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalState(_)));
    assert_eq!(store.view(view).unwrap().num_elements(), 2);
}

#[test]
fn external_memory_is_shared_with_the_caller() {
    let mut store = DataStore::new();
    let root = store.root();
    let block = SharedBlock::zeroed(16);
    let view = store
        .create_view_with_external(root, "ext", Some(DataType::int32(4)), block.clone())
        .unwrap();

    store.set_view_data(view, &[1, 2, 3, 4]).unwrap();
    assert_eq!(&block.to_vec()[..4], &1i32.to_ne_bytes());
    assert_eq!(store.view(view).unwrap().state(), ViewState::External);

    store.destroy_view_and_data(root, "ext").unwrap();
    assert_eq!(block.len(), 16);
}

#[test]
fn strings_and_scalars_own_their_values() {
    let mut store = DataStore::new();
    let root = store.root();
    let name = store.create_view_string(root, "name", "arbor").unwrap();
    let count = store.create_view_scalar(root, "count", 12u64).unwrap();

    assert_eq!(store.view_string(name).unwrap(), "arbor");
    assert_eq!(store.view_data::<u8>(name).unwrap(), b"arbor".to_vec());
    assert_eq!(store.view_scalar::<u64>(count).unwrap(), 12);
    assert!(matches!(
        store.view_scalar::<i32>(count).unwrap_err().kind,
        ErrorKind::TypeMismatch { .. }
    ));

    store.set_scalar(count, 13u64).unwrap();
    assert_eq!(store.view_scalar::<u64>(count).unwrap(), 13);
    store.clear_binding(count).unwrap();
    assert_eq!(store.view(count).unwrap().state(), ViewState::Empty);
}

#[test]
fn persistent_regions_outlive_views() {
    let persistent = Arc::new(MemoryPersistentStore::new());
    let mut store = DataStore::new();
    store.set_persistent_store(persistent.clone());
    let root = store.root();

    let view = store
        .create_view_with_type(root, "state", DataType::float64(2))
        .unwrap();
    store.bind_persistent(view, "sim/state").unwrap();
    store.set_view_data(view, &[0.25, 0.75]).unwrap();
    store.destroy_view(root, "state").unwrap();
    assert_eq!(persistent.size("sim/state"), Some(16));

    let again = store
        .create_view_with_type(root, "again", DataType::float64(2))
        .unwrap();
    store.bind_persistent(again, "sim/state").unwrap();
    assert_eq!(store.view_data::<f64>(again).unwrap(), vec![0.25, 0.75]);

    store.destroy_view_and_data(root, "again").unwrap();
    assert!(!persistent.contains("sim/state"));
}

#[test]
fn persistent_binding_needs_a_store() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_with_type(root, "p", DataType::new(TypeId::Int8, 1))
        .unwrap();
    assert!(store.bind_persistent(view, "key").is_err());
    assert_eq!(store.view(view).unwrap().state(), ViewState::Described);
}

#[test]
fn data_length_must_match_description() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store
        .create_view_and_allocate(root, "v", DataType::int32(3))
        .unwrap();

    let err = store.set_view_data(view, &[1, 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert_eq!(store.view_bytes(view).unwrap().len(), 12);
}

#[test]
fn stale_view_ids_are_refused() {
    let mut store = DataStore::new();
    let root = store.root();
    let view = store.create_view(root, "gone").unwrap();
    store.destroy_view(root, "gone").unwrap();

    assert!(store.view(view).is_none());
    assert!(matches!(
        store.describe_view(view, DataType::int32(1)).unwrap_err().kind,
        ErrorKind::StaleHandle(_)
    ));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reallocate_keeps_leading_values(
            values in prop::collection::vec(any::<i64>(), 1..24),
            offset in 0usize..4,
            stride in 1usize..4,
            new_len in 1usize..32,
        ) {
            let mut store = DataStore::new();
            let root = store.root();
            let dtype = DataType::int64(values.len()).with_offset(offset).with_stride(stride);
            let view = store.create_view_and_allocate(root, "v", dtype).unwrap();
            store.set_view_data(view, &values).unwrap();

            store.reallocate_view(view, new_len).unwrap();
            let kept = values.len().min(new_len);
            let data = store.view_data::<i64>(view).unwrap();
            prop_assert_eq!(data.len(), new_len);
            prop_assert_eq!(&data[..kept], &values[..kept]);
            prop_assert!(data[kept..].iter().all(|&v| v == 0));
        }
    }
}
