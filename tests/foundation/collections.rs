//! Integration tests for item collections
//!
//! The three strategies share one contract but differ in index reuse,
//! name checking and iteration order.

use arbor_foundation::{
    CollectionKind, CollectionStore, IndexedCollection, ItemCollection, ListCollection,
    MapCollection,
};

fn names<C: CollectionStore<u32>>(coll: &C) -> Vec<String> {
    coll.iter()
        .map(|(idx, _)| coll.name_of(idx).unwrap_or_default().to_owned())
        .collect()
}

// =============================================================================
// Shared contract
// =============================================================================

#[test]
fn every_kind_finds_items_by_name() {
    for kind in [CollectionKind::Indexed, CollectionKind::Map, CollectionKind::List] {
        let mut coll = ItemCollection::new(kind);
        let a = coll.insert(1u32, "a").unwrap();
        let b = coll.insert(2u32, "b").unwrap();

        assert_eq!(coll.kind(), kind);
        assert_eq!(coll.count(), 2);
        assert_eq!(coll.get_by_name("b"), Some(&2));
        assert_eq!(coll.index_of("a"), Some(a));
        assert_eq!(coll.name_of(b), Some("b"));
        assert!(!coll.has_name("c"));
    }
}

#[test]
fn every_kind_treats_stale_indices_as_misses() {
    for kind in [CollectionKind::Indexed, CollectionKind::Map, CollectionKind::List] {
        let mut coll = ItemCollection::new(kind);
        let idx = coll.insert(7u32, "seven").unwrap();
        assert_eq!(coll.remove(idx), Some(7));

        assert!(!coll.has(idx));
        assert_eq!(coll.get(idx), None);
        assert_eq!(coll.remove(idx), None);
        assert_eq!(coll.get(999), None);
        assert_eq!(coll.first_valid_index(), None);
    }
}

#[test]
fn remove_all_empties_and_returns_in_order() {
    for kind in [CollectionKind::Indexed, CollectionKind::Map, CollectionKind::List] {
        let mut coll = ItemCollection::new(kind);
        for (i, name) in ["x", "y", "z"].into_iter().enumerate() {
            coll.insert(u32::try_from(i).unwrap(), name).unwrap();
        }
        assert_eq!(coll.remove_all(), vec![0, 1, 2]);
        assert!(coll.is_empty());
    }
}

// =============================================================================
// Strategy differences
// =============================================================================

#[test]
fn map_refuses_duplicate_names() {
    let mut coll = MapCollection::new();
    coll.insert(1u32, "dup").unwrap();
    assert_eq!(coll.insert(2u32, "dup"), Err(2));
    assert_eq!(coll.count(), 1);
}

#[test]
fn indexed_reuses_freed_indices() {
    let mut coll = IndexedCollection::new();
    for i in 0..4u32 {
        coll.insert(i, &format!("i{i}")).unwrap();
    }
    coll.remove(2);
    assert_eq!(coll.insert(9, "again"), Ok(2));
    assert_eq!(names(&coll), vec!["i0", "i1", "again", "i3"]);
}

#[test]
fn list_never_reuses_indices() {
    let mut coll = ListCollection::new();
    for i in 0..4u32 {
        coll.insert(i, &format!("i{i}")).unwrap();
    }
    coll.remove(2);
    assert_eq!(coll.insert(9, "again"), Ok(4));
    assert_eq!(names(&coll), vec!["i0", "i1", "i3", "again"]);
}

#[test]
fn next_valid_index_skips_holes() {
    let mut coll = IndexedCollection::new();
    for i in 0..6u32 {
        coll.insert(i, "").unwrap();
    }
    coll.remove(1);
    coll.remove(2);

    assert_eq!(coll.first_valid_index(), Some(0));
    assert_eq!(coll.next_valid_index(0), Some(3));
    assert_eq!(coll.next_valid_index(1), Some(3));
    assert_eq!(coll.next_valid_index(5), None);
}
