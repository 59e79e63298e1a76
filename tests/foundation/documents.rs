//! Integration tests for key/value documents

use arbor_foundation::{ErrorKind, Node};

#[test]
fn fetch_creates_nested_objects() {
    let mut doc = Node::new();
    doc.fetch("a/b/c").set(3u64);

    assert!(doc.is_object());
    assert!(doc.get("a/b").unwrap().is_object());
    assert_eq!(doc.get("a/b/c").unwrap().as_u64(), Some(3));
    assert!(doc.has_path("a/b/c"));
    assert!(!doc.has_path("a/x"));
}

#[test]
fn children_keep_insertion_order() {
    let mut doc = Node::object();
    for key in ["zeta", "alpha", "mid"] {
        doc.fetch(key).set(key);
    }
    let keys: Vec<_> = doc.children().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    assert_eq!(doc.number_of_children(), 3);
}

#[test]
fn scalar_nodes_have_no_children() {
    let doc = Node::from("text");
    assert_eq!(doc.children().count(), 0);
    assert_eq!(doc.get("anything"), None);
    assert_eq!(doc.as_str(), Some("text"));
}

#[test]
fn require_reports_missing_path() {
    let doc = Node::object();
    let err = doc.require("views/x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Document(_)));
    assert!(err.to_string().contains("views/x"));
}

#[test]
fn value_conversions() {
    assert_eq!(Node::from(5usize).as_usize(), Some(5));
    assert_eq!(Node::from(-2i64).as_i64(), Some(-2));
    assert_eq!(Node::from(0.5f64).as_f64(), Some(0.5));
    assert_eq!(Node::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    let list = Node::from(vec![Node::from(1u64), Node::from(2u64)]);
    assert_eq!(list.as_list().map(<[Node]>::len), Some(2));
    assert_eq!(list.number_of_children(), 2);
}
