//! Integration tests for Layer 2: IO
//!
//! Saving stores to MessagePack files and loading them back.

use arbor_foundation::{DataType, ErrorKind};
use arbor_io::{from_bytes, load_from_file, load_into, save_to_file, to_bytes};
use arbor_store::DataStore;

fn sample() -> DataStore {
    let mut store = DataStore::new();
    let root = store.root();
    let grid = store
        .create_view_and_allocate(root, "grid/cells", DataType::int32(4))
        .unwrap();
    store.set_view_data(grid, &[4, 3, 2, 1]).unwrap();
    store.create_view_string(root, "grid/name", "coarse").unwrap();
    store.create_group(root, "empty").unwrap();
    store
}

#[test]
fn bytes_round_trip() {
    let store = sample();
    let restored = from_bytes(&to_bytes(&store).unwrap()).unwrap();

    assert!(store.groups_equivalent(store.root(), &restored, restored.root()));
    let cells = restored.get_view(restored.root(), "grid/cells").unwrap();
    assert_eq!(restored.view_data::<i32>(cells).unwrap(), vec![4, 3, 2, 1]);
    assert!(restored.has_group(restored.root(), "empty"));
}

#[test]
fn file_round_trip() {
    let store = sample();
    let path = std::env::temp_dir().join("arbor_integration_store.msgpack");

    save_to_file(&store, &path).unwrap();
    let restored = load_from_file(&path).unwrap();
    assert!(store.groups_equivalent(store.root(), &restored, restored.root()));

    let mut merged = DataStore::new();
    let root = merged.root();
    let dst = merged.create_group(root, "copy").unwrap();
    load_into(&mut merged, dst, &path).unwrap();
    assert!(merged.has_view(root, "copy/grid/cells"));
    let buffers = merged.num_buffers();
    assert_eq!(buffers, 1);

    let err = load_into(&mut merged, dst, &path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameCollision { .. }));
    assert_eq!(merged.num_buffers(), buffers);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn truncated_bytes_fail() {
    let bytes = to_bytes(&sample()).unwrap();
    let err = from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}
