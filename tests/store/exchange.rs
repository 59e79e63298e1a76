//! Export to and import from documents

use std::collections::{BTreeSet, HashMap};

use arbor_foundation::{CollectionKind, DataType, Node, TypeId};
use arbor_store::{DataStore, StoreConfig, ViewState};

fn populated() -> DataStore {
    let mut store = DataStore::new();
    let root = store.root();
    let temps = store
        .create_view_and_allocate(root, "fields/temperature", DataType::float32(3))
        .unwrap();
    store.set_view_data(temps, &[280.0f32, 290.0, 300.0]).unwrap();
    let idx = store.view(temps).unwrap().buffer_index().unwrap();
    store
        .create_view_with_buffer(root, "fields/last", Some(DataType::float32(1).with_offset(2)), idx)
        .unwrap();
    store.create_view_string(root, "meta/units", "kelvin").unwrap();
    store.create_view_scalar(root, "meta/step", 42i64).unwrap();
    store
        .create_view_with_type(root, "pending", DataType::with_shape(TypeId::Int16, &[2, 3]))
        .unwrap();
    store
}

#[test]
fn round_trip_is_equivalent() {
    let store = populated();
    let restored = DataStore::import(&store.export().unwrap()).unwrap();

    assert!(store.groups_equivalent(store.root(), &restored, restored.root()));
    let last = restored.get_view(restored.root(), "fields/last").unwrap();
    assert_eq!(restored.view_scalar::<f32>(last).unwrap(), 300.0);
    let pending = restored.get_view(restored.root(), "pending").unwrap();
    assert_eq!(restored.view(pending).unwrap().state(), ViewState::Described);
    assert_eq!(restored.view(pending).unwrap().data_type().unwrap().shape(), &[2, 3]);
}

#[test]
fn shared_buffer_is_written_once() {
    let store = populated();
    let doc = store.export().unwrap();
    assert_eq!(doc.get("buffers").unwrap().number_of_children(), 1);

    let restored = DataStore::import(&doc).unwrap();
    assert_eq!(restored.num_buffers(), 1);
    let (_, buffer) = restored.buffers().next().unwrap();
    assert_eq!(buffer.num_views(), 2);
}

#[test]
fn import_into_another_strategy() {
    let store = populated();
    let config = StoreConfig::new().with_collections(CollectionKind::List);
    let restored = DataStore::import_with_config(&store.export().unwrap(), config).unwrap();

    let root = restored.group(restored.root()).unwrap();
    assert_eq!(root.view_collection_kind(), CollectionKind::List);
    assert!(store.groups_equivalent(store.root(), &restored, restored.root()));
}

#[test]
fn group_level_export_collects_buffer_indices() {
    let store = populated();
    let fields = store.get_group(store.root(), "fields").unwrap();
    let mut node = Node::new();
    let mut buffers = BTreeSet::new();
    store.export_group(fields, &mut node, &mut buffers).unwrap();

    assert_eq!(buffers.len(), 1);
    assert_eq!(node.number_of_children(), 1);
    assert_eq!(node.get("views/last/state").unwrap().as_str(), Some("BUFFER"));

    let mut target = DataStore::new();
    let idx = target.create_buffer_with(TypeId::Float32, 3).unwrap();
    let mapping: HashMap<_, _> = buffers.into_iter().map(|old| (old, idx)).collect();
    let root = target.root();
    let dst = target.create_group(root, "fields").unwrap();
    target.import_group(dst, &node, &mapping).unwrap();
    assert_eq!(target.buffer(idx).unwrap().num_views(), 2);
}

#[test]
fn info_reports_names_and_sizes() {
    let store = populated();
    let info = store.group_info(store.root()).unwrap();
    let units = info.get("groups/meta/views/units").unwrap();

    assert_eq!(units.get("name").unwrap().as_str(), Some("units"));
    assert_eq!(units.get("state").unwrap().as_str(), Some("STRING"));
    assert_eq!(units.get("num_elements").unwrap().as_usize(), Some(6));
}
