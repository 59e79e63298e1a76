//! Error types for the Arbor data store.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every refused store operation returns one of these; nothing in the
//! store panics on bad input.

use std::fmt;

use thiserror::Error;

use crate::types::TypeId;

/// The main error type for Arbor operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a name collision error.
    #[must_use]
    pub fn name_collision(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameCollision {
            group: group.into(),
            name: name.into(),
        })
    }

    /// Creates an illegal state transition error.
    #[must_use]
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState(message.into()))
    }

    /// Creates a path resolution error.
    #[must_use]
    pub fn path_not_found(group: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathNotFound {
            group: group.into(),
            segment: segment.into(),
        })
    }

    /// Creates a stale handle error.
    #[must_use]
    pub fn stale_handle(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::StaleHandle(what.into()))
    }

    /// Creates a buffer-not-found error.
    #[must_use]
    pub fn buffer_not_found(index: usize) -> Self {
        Self::new(ErrorKind::BufferNotFound(index))
    }

    /// Creates a buffer-in-use error.
    #[must_use]
    pub fn buffer_in_use(index: usize, views: usize) -> Self {
        Self::new(ErrorKind::BufferInUse { index, views })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: TypeId, actual: TypeId) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an out-of-bounds error.
    #[must_use]
    pub fn out_of_bounds(needed: usize, available: usize) -> Self {
        Self::new(ErrorKind::OutOfBounds { needed, available })
    }

    /// Creates a document structure error.
    #[must_use]
    pub fn document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Document(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A null target, negative count, unknown type or empty name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The destination already holds an item with this name.
    #[error("name collision: group '{group}' already has an item named '{name}'")]
    NameCollision {
        /// Name of the group that refused the item.
        group: String,
        /// The colliding item name.
        name: String,
    },

    /// The operation is not legal in the object's current state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A read path named an intermediate group that does not exist.
    #[error("path not found: group '{group}' has no child '{segment}'")]
    PathNotFound {
        /// Name of the group where resolution stopped.
        group: String,
        /// The missing segment.
        segment: String,
    },

    /// A group or view handle refers to a destroyed item.
    #[error("stale handle: {0}")]
    StaleHandle(String),

    /// No buffer is registered at this index.
    #[error("buffer not found: {0}")]
    BufferNotFound(usize),

    /// The buffer still has attached views.
    #[error("buffer {index} still has {views} attached view(s)")]
    BufferInUse {
        /// Registry index of the buffer.
        index: usize,
        /// Number of views still attached.
        views: usize,
    },

    /// Element type does not match the described type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The described type.
        expected: TypeId,
        /// The requested type.
        actual: TypeId,
    },

    /// A data access would run past the end of the backing memory.
    #[error("out of bounds: need {needed} bytes, {available} available")]
    OutOfBounds {
        /// Bytes required by the access.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The allocator refused a request.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// The persistent store refused a request.
    #[error("persistent store error: {0}")]
    Persistent(String),

    /// A serialization document is missing a field or has the wrong shape.
    #[error("malformed document: {0}")]
    Document(String),

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the group the operation ran against.
    pub group: Option<String>,
    /// Path or item name the caller supplied.
    pub path: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group name.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = &self.group {
            write!(f, "in group '{group}'")?;
        }
        if let Some(path) = &self.path {
            if self.group.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at '{path}'")?;
        }
        Ok(())
    }
}

/// Result type alias using the Arbor error.
pub type Result<T> = std::result::Result<T, Error>;
