//! Integration tests for Layer 1: Store
//!
//! Tests for path resolution, buffer sharing, view states, tree surgery,
//! and export/import through the public `DataStore` API.

mod buffers;
mod exchange;
mod paths;
mod tree;
mod views;
