//! Hierarchical in-memory data store for Arbor.
//!
//! This crate provides:
//! - [`DataStore`] - Owns the group tree, the buffer registry and memory sources
//! - [`Group`] and [`View`] - Named tree nodes and typed data descriptors
//! - [`Buffer`] - Registry-owned blocks of memory shared by views
//! - [`Allocator`] and [`PersistentStore`] - Pluggable memory sources
//!
//! Groups and views live in generational arenas owned by the store and are
//! addressed by [`GroupId`] and [`ViewId`]. Every mutation goes through
//! `&mut DataStore`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Logs a refusal at `warn` and returns the error from the enclosing function.
macro_rules! refuse {
    ($err:expr) => {{
        let err: arbor_foundation::Error = $err;
        tracing::warn!(error = %err, "operation refused");
        return Err(err);
    }};
}

/// Unwraps a result, refusing through [`refuse!`] on error.
macro_rules! attempt {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => refuse!(err),
        }
    };
}

pub mod buffer;
pub mod config;
pub mod datastore;
pub mod exchange;
pub mod group;
pub mod memory;
mod path;
pub mod view;

pub use buffer::Buffer;
pub use config::StoreConfig;
pub use datastore::DataStore;
pub use group::{Group, GroupId};
pub use memory::{Allocator, HeapAllocator, MemoryPersistentStore, PersistentStore, SharedBlock};
pub use view::{View, ViewId, ViewState};
