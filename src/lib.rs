//! Arbor - Hierarchical in-memory data store
//!
//! This crate re-exports all layers of the Arbor system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: arbor_io         - MessagePack save and load
//! Layer 1: arbor_store      - Buffers, views, groups, the data store
//! Layer 0: arbor_foundation - Types, errors, item collections, documents
//! ```

pub use arbor_foundation as foundation;
pub use arbor_io as io;
pub use arbor_store as store;
