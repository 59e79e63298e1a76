//! Conversion between store trees and [`Node`] documents.
//!
//! A group exports as an object with optional `views` and `groups`
//! children keyed by name. Views record their state and description plus
//! whatever identifies their data: a buffer index, an owned value, or a
//! persistent key. External memory is never exported; such views come back
//! described but unbound.
//!
//! A whole-store document adds a `buffers` object keyed by registry index,
//! holding each referenced buffer's description and bytes once.

use std::collections::{BTreeSet, HashMap};

use arbor_foundation::{CollectionStore, DataType, Error, Index, Node, Result, TypeId};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::datastore::{DataStore, stale_view};
use crate::group::GroupId;
use crate::view::{Binding, View, ViewId, ViewState};

const VIEWS: &str = "views";
const GROUPS: &str = "groups";
const BUFFERS: &str = "buffers";
const ROOT: &str = "root";

// =============================================================================
// Document helpers
// =============================================================================

fn str_field<'a>(node: &'a Node, key: &str) -> Result<&'a str> {
    node.require(key)?
        .as_str()
        .ok_or_else(|| Error::document(format!("'{key}' must be a string")))
}

fn usize_field(node: &Node, key: &str) -> Result<usize> {
    node.require(key)?
        .as_usize()
        .ok_or_else(|| Error::document(format!("'{key}' must be an unsigned integer")))
}

fn type_field(node: &Node, key: &str) -> Result<TypeId> {
    let name = str_field(node, key)?;
    TypeId::from_name(name).ok_or_else(|| Error::document(format!("unknown element type '{name}'")))
}

fn write_data_type(dtype: &DataType, node: &mut Node) {
    node.fetch("dtype").set(dtype.type_id().name());
    node.fetch("shape")
        .set(dtype.shape().iter().map(|&n| Node::from(n)).collect::<Vec<_>>());
    node.fetch("offset").set(dtype.offset());
    node.fetch("stride").set(dtype.stride());
}

fn read_data_type(node: &Node) -> Result<DataType> {
    let type_id = type_field(node, "dtype")?;
    let shape = node
        .require("shape")?
        .as_list()
        .ok_or_else(|| Error::document("'shape' must be a list"))?
        .iter()
        .map(|extent| {
            extent
                .as_usize()
                .ok_or_else(|| Error::document("shape extents must be unsigned integers"))
        })
        .collect::<Result<Vec<_>>>()?;
    let dtype = DataType::with_shape(type_id, &shape)
        .with_offset(usize_field(node, "offset")?)
        .with_stride(usize_field(node, "stride")?);
    dtype
        .validate()
        .map_err(|e| Error::document(format!("bad schema: {e}")))?;
    Ok(dtype)
}

fn write_view(view: &View, node: &mut Node) {
    *node = Node::object();
    node.fetch("state").set(view.state().name());
    if let Some(dtype) = view.data_type() {
        write_data_type(dtype, node.fetch("schema"));
    }
    match &view.binding {
        Binding::Buffer(idx) => node.fetch("buffer_id").set(*idx),
        Binding::String(value) => node.fetch("value").set(value.as_str()),
        Binding::Scalar(bytes) => node.fetch("value").set(bytes.clone()),
        Binding::Persistent { key, .. } => node.fetch("key").set(key.as_str()),
        Binding::Unbound | Binding::External(_) => {}
    }
}

/// A view as recorded in a document.
enum SavedView {
    Empty,
    Described(DataType),
    Buffer(Option<DataType>, Index),
    External(Option<DataType>),
    String(String),
    Scalar(DataType, Vec<u8>),
    Persistent(DataType, String),
}

fn read_view(node: &Node) -> Result<SavedView> {
    let state_name = str_field(node, "state")?;
    let state = ViewState::from_name(state_name)
        .ok_or_else(|| Error::document(format!("unknown view state '{state_name}'")))?;
    let schema = node.get("schema").map(read_data_type).transpose()?;
    let required = |schema: Option<DataType>| {
        schema.ok_or_else(|| Error::document(format!("{state} view has no schema")))
    };

    Ok(match state {
        ViewState::Empty => SavedView::Empty,
        ViewState::Described => SavedView::Described(required(schema)?),
        ViewState::Buffer => SavedView::Buffer(schema, usize_field(node, "buffer_id")?),
        ViewState::External => SavedView::External(schema),
        ViewState::String => SavedView::String(str_field(node, "value")?.to_owned()),
        ViewState::Scalar => {
            let dtype = required(schema)?;
            let bytes = node
                .require("value")?
                .as_bytes()
                .ok_or_else(|| Error::document("scalar value must be bytes"))?;
            if dtype.num_elements() != 1 || bytes.len() != dtype.total_bytes() {
                return Err(Error::document(format!(
                    "scalar of {} bytes does not match {dtype}",
                    bytes.len()
                )));
            }
            SavedView::Scalar(dtype, bytes.to_vec())
        }
        ViewState::Persistent => {
            SavedView::Persistent(required(schema)?, str_field(node, "key")?.to_owned())
        }
    })
}

// =============================================================================
// Export and import
// =============================================================================

impl DataStore {
    /// Writes the subtree below `group` into `node`, collecting the indices
    /// of buffers its views use.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn export_group(
        &self,
        group: GroupId,
        node: &mut Node,
        buffers: &mut BTreeSet<Index>,
    ) -> Result<()> {
        let g = attempt!(self.group_ref(group));
        if !node.is_object() {
            *node = Node::object();
        }
        for view in g.views() {
            let v = attempt!(self.view_ref(view));
            write_view(v, node.fetch(VIEWS).fetch(&v.name));
            if let Some(idx) = v.buffer_index() {
                buffers.insert(idx);
            }
        }
        for child in g.groups() {
            let name = attempt!(self.group_ref(child)).name();
            self.export_group(child, node.fetch(GROUPS).fetch(name), buffers)?;
        }
        Ok(())
    }

    /// Recreates the views and groups recorded in `node` below `group`.
    ///
    /// Buffer references are translated through `buffers`, which maps the
    /// indices in the document to indices in this store. Missing `views` or
    /// `groups` keys are an empty group, not an error. Persistent views bind
    /// their region only if a persistent store is installed; otherwise they
    /// stay described.
    ///
    /// # Errors
    ///
    /// Refused for malformed documents, name collisions and unknown buffer
    /// references. Items imported before the failure remain.
    pub fn import_group(
        &mut self,
        group: GroupId,
        node: &Node,
        buffers: &HashMap<Index, Index>,
    ) -> Result<()> {
        attempt!(self.group_ref(group));
        if let Some(views) = node.get(VIEWS) {
            for (name, child) in views.children() {
                let view = attempt!(self.insert_view(group, name));
                self.import_view(view, child, buffers)?;
            }
        }
        if let Some(groups) = node.get(GROUPS) {
            for (name, child) in groups.children() {
                let sub = attempt!(self.insert_group(group, name));
                self.import_group(sub, child, buffers)?;
            }
        }
        Ok(())
    }

    fn import_view(
        &mut self,
        view: ViewId,
        node: &Node,
        buffers: &HashMap<Index, Index>,
    ) -> Result<()> {
        match attempt!(read_view(node)) {
            SavedView::Empty | SavedView::External(None) => Ok(()),
            SavedView::Described(dtype) | SavedView::External(Some(dtype)) => {
                self.describe_view(view, dtype)
            }
            SavedView::Buffer(dtype, saved) => {
                let Some(&idx) = buffers.get(&saved) else {
                    refuse!(Error::document(format!(
                        "view refers to buffer {saved}, which is not in the document"
                    )));
                };
                if let Some(dtype) = dtype {
                    self.describe_view(view, dtype)?;
                }
                self.attach_buffer(view, idx)
            }
            SavedView::String(value) => self.set_string(view, &value),
            SavedView::Scalar(dtype, bytes) => {
                let Some(v) = self.views.get_mut(view.handle()) else {
                    refuse!(stale_view(view));
                };
                v.dtype = dtype;
                v.binding = Binding::Scalar(bytes);
                Ok(())
            }
            SavedView::Persistent(dtype, key) => {
                self.describe_view(view, dtype)?;
                if self.persistent.is_none() {
                    warn!(key = %key, "no persistent store installed; view left described");
                    return Ok(());
                }
                self.bind_persistent(view, &key)
            }
        }
    }

    /// Exports the whole store: the tree under `root` and every buffer it
    /// references under `buffers`.
    ///
    /// # Errors
    ///
    /// Only fails if the tree refers to a missing group, view or buffer.
    pub fn export(&self) -> Result<Node> {
        let mut doc = Node::object();
        *doc.fetch(BUFFERS) = Node::object();
        let mut referenced = BTreeSet::new();
        self.export_group(self.root, doc.fetch(ROOT), &mut referenced)?;

        let buffers = doc.fetch(BUFFERS);
        for idx in referenced {
            let Some(b) = self.buffers.get(idx) else {
                refuse!(Error::buffer_not_found(idx));
            };
            let node = buffers.fetch(&idx.to_string());
            node.fetch("dtype").set(b.type_id().name());
            node.fetch("num_elements").set(b.num_elements());
            if let Some(data) = b.data() {
                node.fetch("data").set(data.to_vec());
            }
        }
        debug!(
            views = self.views.len(),
            buffers = buffers.number_of_children(),
            "store exported"
        );
        Ok(doc)
    }

    /// Builds a new store, with the default configuration, from a document
    /// produced by [`DataStore::export`].
    ///
    /// # Errors
    ///
    /// Refused for malformed documents.
    pub fn import(doc: &Node) -> Result<DataStore> {
        Self::import_with_config(doc, StoreConfig::default())
    }

    /// Builds a new store with `config` from an exported document.
    ///
    /// # Errors
    ///
    /// Refused for malformed documents.
    pub fn import_with_config(doc: &Node, config: StoreConfig) -> Result<DataStore> {
        let mut store = DataStore::with_config(config);
        let root = store.root;
        store.import_into(root, doc)?;
        Ok(store)
    }

    /// Recreates an exported store's buffers in this store and its tree
    /// below `group`.
    ///
    /// Top-level names are checked against `group` before anything is
    /// created. If the import fails later, buffers it created that no view
    /// has attached are destroyed again.
    ///
    /// # Errors
    ///
    /// Refused for malformed documents or name collisions below `group`.
    pub fn import_into(&mut self, group: GroupId, doc: &Node) -> Result<()> {
        let tree = attempt!(doc.require(ROOT));
        let g = attempt!(self.group_ref(group));
        for (name, _) in tree.get(VIEWS).into_iter().flat_map(Node::children) {
            if g.has_child_view(name) {
                refuse!(Error::name_collision(g.name(), name));
            }
        }
        for (name, _) in tree.get(GROUPS).into_iter().flat_map(Node::children) {
            if g.has_child_group(name) {
                refuse!(Error::name_collision(g.name(), name));
            }
        }

        let mut mapping = HashMap::new();
        let imported = self
            .import_buffers(doc, &mut mapping)
            .and_then(|()| self.import_group(group, tree, &mapping));
        if imported.is_err() {
            for &idx in mapping.values() {
                if self.buffers.get(idx).is_some_and(|b| b.num_views() == 0) {
                    self.buffers.remove(idx);
                }
            }
        }
        imported
    }

    fn import_buffers(&mut self, doc: &Node, mapping: &mut HashMap<Index, Index>) -> Result<()> {
        let Some(buffers) = doc.get(BUFFERS) else {
            return Ok(());
        };
        for (key, node) in buffers.children() {
            let Ok(saved) = key.parse::<Index>() else {
                refuse!(Error::document(format!(
                    "buffer key '{key}' is not an index"
                )));
            };
            let idx = self.import_buffer(node)?;
            mapping.insert(saved, idx);
        }
        Ok(())
    }

    fn import_buffer(&mut self, node: &Node) -> Result<Index> {
        let type_id = attempt!(type_field(node, "dtype"));
        let num_elements = attempt!(usize_field(node, "num_elements"));
        let data = match node.get("data") {
            Some(data) => Some(attempt!(
                data.as_bytes()
                    .ok_or_else(|| Error::document("buffer data must be bytes"))
            )),
            None => None,
        };

        if num_elements
            .checked_mul(type_id.bytes_per_element())
            .is_none()
        {
            refuse!(Error::document(format!(
                "buffer of {num_elements} {type_id} elements is too large"
            )));
        }
        let idx = if type_id.is_valid() {
            self.create_buffer_with(type_id, num_elements)?
        } else {
            self.create_buffer()?
        };
        let Some(bytes) = data else {
            return Ok(idx);
        };
        let Some(b) = self.buffers.get_mut(idx) else {
            refuse!(Error::buffer_not_found(idx));
        };
        if bytes.len() != b.total_bytes() {
            let err = Error::document(format!(
                "buffer holds {} bytes but describes {}",
                bytes.len(),
                b.total_bytes()
            ));
            self.buffers.remove(idx);
            refuse!(err);
        }
        if let Err(err) = b.allocate() {
            self.buffers.remove(idx);
            return Err(err);
        }
        if let Some(out) = b.data_mut() {
            out.copy_from_slice(bytes);
        }
        Ok(idx)
    }

    // =========================================================================
    // Info
    // =========================================================================

    /// Describes one view: its name, state, schema, sizes and binding.
    ///
    /// # Errors
    ///
    /// Refused for a stale view id.
    pub fn view_info(&self, view: ViewId) -> Result<Node> {
        let v = attempt!(self.view_ref(view));
        let mut node = Node::object();
        write_view(v, &mut node);
        node.fetch("name").set(v.name.as_str());
        node.fetch("num_elements").set(v.num_elements());
        node.fetch("total_bytes").set(v.dtype.total_bytes());
        if let Some(available) = self.view_available_bytes(view) {
            node.fetch("available_bytes").set(available);
        }
        Ok(node)
    }

    /// Describes the subtree below `group` as a document.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn group_info(&self, group: GroupId) -> Result<Node> {
        let g = attempt!(self.group_ref(group));
        let mut node = Node::object();
        node.fetch("name").set(g.name());
        for view in g.views() {
            let info = self.view_info(view)?;
            let name = attempt!(self.view_ref(view)).name();
            *node.fetch(VIEWS).fetch(name) = info;
        }
        for child in g.groups() {
            let info = self.group_info(child)?;
            let name = attempt!(self.group_ref(child)).name();
            *node.fetch(GROUPS).fetch(name) = info;
        }
        Ok(node)
    }
}
