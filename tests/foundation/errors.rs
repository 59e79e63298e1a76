//! Integration tests for error reporting

use arbor_foundation::{Error, ErrorContext, ErrorKind, TypeId};

#[test]
fn messages_name_the_problem() {
    assert_eq!(
        Error::name_collision("mesh", "coords").to_string(),
        "name collision: group 'mesh' already has an item named 'coords'"
    );
    assert_eq!(
        Error::path_not_found("a", "x").to_string(),
        "path not found: group 'a' has no child 'x'"
    );
    assert_eq!(
        Error::buffer_in_use(3, 2).to_string(),
        "buffer 3 still has 2 attached view(s)"
    );
    assert_eq!(
        Error::type_mismatch(TypeId::Float64, TypeId::Int32).to_string(),
        "type mismatch: expected float64, got int32"
    );
}

#[test]
fn kinds_can_be_matched() {
    let err = Error::out_of_bounds(16, 8);
    assert!(matches!(
        err.kind,
        ErrorKind::OutOfBounds {
            needed: 16,
            available: 8
        }
    ));
    assert!(matches!(Error::buffer_not_found(4).kind, ErrorKind::BufferNotFound(4)));
}

#[test]
fn context_is_attached() {
    let err = Error::illegal_state("view is bound").with_context(
        ErrorContext::new().with_group("root").with_path("a/b"),
    );
    let context = err.context.unwrap();
    assert_eq!(context.group.as_deref(), Some("root"));
    assert_eq!(context.path.as_deref(), Some("a/b"));
}
