//! Self-describing key/value document tree.
//!
//! `Node` is the exchange format for store export and import. Objects keep
//! their keys in insertion order, so a tree written and read back visits
//! children in the same sequence.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Path separator used by [`Node::fetch`], [`Node::get`] and
/// [`Node::has_path`].
pub const DOCUMENT_PATH_DELIMITER: char = '/';

/// A document node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// No value.
    #[default]
    Empty,
    /// Ordered map of named children.
    Object(IndexMap<String, Node>),
    /// Ordered sequence of children.
    List(Vec<Node>),
    /// UTF-8 string leaf.
    String(String),
    /// Signed integer leaf.
    Int(i64),
    /// Unsigned integer leaf.
    UInt(u64),
    /// Floating point leaf.
    Float(f64),
    /// Raw byte span leaf.
    Bytes(Vec<u8>),
}

impl Node {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::Empty
    }

    /// Creates an object node with no children.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Returns the node at `path`, creating it and any missing parents.
    ///
    /// Any non-object node met along the way is replaced by an object.
    pub fn fetch(&mut self, path: &str) -> &mut Node {
        path.split(DOCUMENT_PATH_DELIMITER)
            .filter(|segment| !segment.is_empty())
            .fold(self, |node, segment| {
                if !node.is_object() {
                    *node = Node::object();
                }
                match node {
                    Node::Object(children) => children.entry(segment.to_owned()).or_default(),
                    _ => unreachable!("node was just made an object"),
                }
            })
    }

    /// Returns the node at `path`, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Node> {
        path.split(DOCUMENT_PATH_DELIMITER)
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                Node::Object(children) => children.get(segment),
                _ => None,
            })
    }

    /// Returns the node at `path`, or a document error naming it.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored at `path`.
    pub fn require(&self, path: &str) -> Result<&Node> {
        self.get(path)
            .ok_or_else(|| Error::document(format!("missing field '{path}'")))
    }

    /// Returns true if a node exists at `path`.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Replaces this node with a value.
    pub fn set(&mut self, value: impl Into<Node>) {
        *self = value.into();
    }

    /// Returns true for object nodes.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true for the empty node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Iterates `(key, child)` pairs of an object in insertion order.
    ///
    /// Non-object nodes have no children.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> + '_ {
        let children = match self {
            Self::Object(children) => Some(children),
            _ => None,
        };
        children
            .into_iter()
            .flat_map(|children| children.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Number of children of an object node.
    #[must_use]
    pub fn number_of_children(&self) -> usize {
        match self {
            Self::Object(children) => children.len(),
            Self::List(items) => items.len(),
            _ => 0,
        }
    }

    /// String value of a leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Signed integer value of a leaf.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Unsigned integer value of a leaf.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            Self::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Unsigned integer value of a leaf, as a `usize`.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        self.as_u64().and_then(|v| usize::try_from(v).ok())
    }

    /// Floating point value of a leaf.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Byte span of a leaf.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Items of a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    fn write_json(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "null"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bytes(bytes) => write!(f, "{bytes:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.write_json(f, indent)?;
                }
                write!(f, "]")
            }
            Self::Object(children) => {
                if children.is_empty() {
                    return write!(f, "{{}}");
                }
                writeln!(f, "{{")?;
                for (i, (key, child)) in children.iter().enumerate() {
                    write!(f, "{:width$}{key:?}: ", "", width = indent + 2)?;
                    child.write_json(f, indent + 2)?;
                    if i + 1 < children.len() {
                        write!(f, ",")?;
                    }
                    writeln!(f)?;
                }
                write!(f, "{:width$}}}", "", width = indent)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_json(f, 0)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for Node {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<u8>> for Node {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::List(value)
    }
}
