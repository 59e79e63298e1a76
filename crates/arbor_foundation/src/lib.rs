//! Core types, collections, and documents for Arbor.
//!
//! This crate provides:
//! - [`CollectionStore`] - The indexed / map / list item collections
//! - [`Slots`] and [`Handle`] - Generational arena storage
//! - [`TypeId`] and [`DataType`] - Element type tags and data descriptions
//! - [`Node`] - The key/value document used for export and import
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod document;
pub mod error;
pub mod handle;
pub mod slots;
pub mod types;

pub use collections::{
    CollectionKind, CollectionStore, IndexedCollection, ItemCollection, ListCollection,
    MapCollection,
};
pub use document::Node;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use handle::{Handle, Index};
pub use slots::Slots;
pub use types::{DataType, Element, TypeId};
