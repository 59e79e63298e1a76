//! Saving and loading Arbor data stores.
//!
//! This crate provides:
//! - Store serialization to and from `MessagePack` bytes
//! - File save and load built on the same encoding
//! - Document-level encoding for partial trees

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod serialize;

pub use serialize::{
    document_from_bytes, document_to_bytes, from_bytes, load_from_file, load_into, save_to_file,
    to_bytes,
};
