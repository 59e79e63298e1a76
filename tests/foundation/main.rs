//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: item collections, data types, documents, and errors.

mod collections;
mod documents;
mod errors;
mod types;
