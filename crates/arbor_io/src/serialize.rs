//! Store serialization and deserialization using `MessagePack`.
//!
//! A store is first exported to a [`Node`] document (see
//! [`DataStore::export`]) and the document is what gets encoded. Buffer
//! bytes travel once per buffer no matter how many views share them.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use arbor_foundation::{Error, ErrorKind, Node, Result};
use arbor_store::{DataStore, GroupId};
use tracing::{debug, warn};

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    let err = Error::new(ErrorKind::IoError(format!(
        "failed to {action} file '{}': {e}",
        path.display()
    )));
    warn!(error = %err, "file access failed");
    err
}

fn serialization_error(e: &impl std::fmt::Display) -> Error {
    let err = Error::new(ErrorKind::SerializationError(e.to_string()));
    warn!(error = %err, "encoding failed");
    err
}

/// Encodes a document as `MessagePack`, keeping object keys by name.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn document_to_bytes(doc: &Node) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(doc).map_err(|e| serialization_error(&e))
}

/// Decodes a `MessagePack` document.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn document_from_bytes(bytes: &[u8]) -> Result<Node> {
    rmp_serde::from_slice(bytes).map_err(|e| serialization_error(&e))
}

/// Serializes a store to bytes.
///
/// # Errors
///
/// Returns an error if export or serialization fails.
pub fn to_bytes(store: &DataStore) -> Result<Vec<u8>> {
    document_to_bytes(&store.export()?)
}

/// Rebuilds a store from bytes produced by [`to_bytes`].
///
/// # Errors
///
/// Returns an error if the bytes do not decode or describe a malformed tree.
pub fn from_bytes(bytes: &[u8]) -> Result<DataStore> {
    DataStore::import(&document_from_bytes(bytes)?)
}

/// Saves a store to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(store: &DataStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(store)?;

    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "store saved");
    Ok(())
}

fn read_document(path: &Path) -> Result<Node> {
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "store file read");
    document_from_bytes(&bytes)
}

/// Loads a store from a file written by [`save_to_file`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<DataStore> {
    DataStore::import(&read_document(path.as_ref())?)
}

/// Loads a saved store's buffers and tree into an existing store, below
/// `group`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not decode, or its
/// names collide with items already below `group`.
pub fn load_into<P: AsRef<Path>>(store: &mut DataStore, group: GroupId, path: P) -> Result<()> {
    store.import_into(group, &read_document(path.as_ref())?)
}
