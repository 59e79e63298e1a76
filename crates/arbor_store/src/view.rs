//! Views: named, typed descriptors over memory.
//!
//! A view carries a [`DataType`] and at most one binding: a registry
//! buffer, caller-owned external memory, an owned string or scalar, or a
//! persistent-store region. Data is always reached through the binding at
//! the time of access.
//!
//! State transitions live on [`DataStore`] because they may touch the
//! buffer registry or the persistent store as well as the view.

use std::fmt;

use arbor_foundation::{CollectionStore, DataType, Element, Error, Handle, Index, Result, TypeId};
use tracing::debug;

use crate::buffer::element_matches;
use crate::datastore::{DataStore, stale_view};
use crate::group::GroupId;
use crate::memory::SharedBlock;

/// Generational id of a view in a [`DataStore`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct ViewId(Handle);

impl ViewId {
    pub(crate) const fn from_handle(handle: Handle) -> Self {
        Self(handle)
    }

    /// The underlying arena handle.
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.0
    }
}

/// Observable state of a view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewState {
    /// No description and no binding.
    Empty,
    /// Described but not bound.
    Described,
    /// Attached to a registry buffer.
    Buffer,
    /// Pointing at caller-owned memory.
    External,
    /// Holding an owned string.
    String,
    /// Holding an owned scalar.
    Scalar,
    /// Bound to a persistent-store region.
    Persistent,
}

impl ViewState {
    /// Stable uppercase name, used in documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Described => "DESCRIBED",
            Self::Buffer => "BUFFER",
            Self::External => "EXTERNAL",
            Self::String => "STRING",
            Self::Scalar => "SCALAR",
            Self::Persistent => "PERSISTENT",
        }
    }

    /// Parses a name produced by [`ViewState::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Empty,
            Self::Described,
            Self::Buffer,
            Self::External,
            Self::String,
            Self::Scalar,
            Self::Persistent,
        ]
        .into_iter()
        .find(|s| s.name() == name)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Binding {
    Unbound,
    Buffer(Index),
    External(SharedBlock),
    String(String),
    Scalar(Vec<u8>),
    Persistent { key: String, block: SharedBlock },
}

/// A named, typed descriptor owned by one group.
#[derive(Debug)]
pub struct View {
    pub(crate) name: String,
    pub(crate) owner: GroupId,
    pub(crate) dtype: DataType,
    pub(crate) binding: Binding,
}

impl View {
    pub(crate) fn new(name: &str, owner: GroupId) -> Self {
        Self {
            name: name.to_owned(),
            owner,
            dtype: DataType::empty(),
            binding: Binding::Unbound,
        }
    }

    /// Name, unique within the owning group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group holding this view.
    #[must_use]
    pub fn owner(&self) -> GroupId {
        self.owner
    }

    /// Description, if one has been applied.
    #[must_use]
    pub fn data_type(&self) -> Option<&DataType> {
        (!self.dtype.is_empty()).then_some(&self.dtype)
    }

    /// Described element type, `NoType` when undescribed.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.dtype.type_id()
    }

    /// Described element count.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.dtype.num_elements()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        match &self.binding {
            Binding::Unbound if self.dtype.is_empty() => ViewState::Empty,
            Binding::Unbound => ViewState::Described,
            Binding::Buffer(_) => ViewState::Buffer,
            Binding::External(_) => ViewState::External,
            Binding::String(_) => ViewState::String,
            Binding::Scalar(_) => ViewState::Scalar,
            Binding::Persistent { .. } => ViewState::Persistent,
        }
    }

    /// Registry index of the attached buffer.
    #[must_use]
    pub fn buffer_index(&self) -> Option<Index> {
        match self.binding {
            Binding::Buffer(idx) => Some(idx),
            _ => None,
        }
    }

    /// Key of the bound persistent region.
    #[must_use]
    pub fn persistent_key(&self) -> Option<&str> {
        match &self.binding {
            Binding::Persistent { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Returns true with neither description nor binding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state() == ViewState::Empty
    }

    /// Returns true once a description has been applied.
    #[must_use]
    pub fn is_described(&self) -> bool {
        !self.dtype.is_empty()
    }

    /// Returns true if bound to anything.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !matches!(self.binding, Binding::Unbound)
    }

    /// Returns true if attached to a buffer.
    #[must_use]
    pub fn has_buffer(&self) -> bool {
        matches!(self.binding, Binding::Buffer(_))
    }

    /// Returns true if pointing at external memory.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self.binding, Binding::External(_))
    }

    /// Returns true if holding a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.binding, Binding::String(_))
    }

    /// Returns true if holding a scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.binding, Binding::Scalar(_))
    }

    /// Returns true if bound to a persistent region.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.binding, Binding::Persistent { .. })
    }

    /// Same name, state and description.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &View) -> bool {
        self.name == other.name && self.state() == other.state() && self.dtype == other.dtype
    }
}

/// Elements of backing memory a description reaches, counting offset and
/// stride.
fn span_elements(dtype: &DataType) -> usize {
    match dtype.num_elements() {
        0 => 0,
        n => (n - 1)
            .saturating_mul(dtype.stride())
            .saturating_add(dtype.offset())
            .saturating_add(1),
    }
}

fn check_span(dtype: &DataType, bytes: &[u8]) -> Result<()> {
    let needed = dtype.span_bytes();
    if needed > bytes.len() {
        return Err(Error::out_of_bounds(needed, bytes.len()));
    }
    Ok(())
}

fn gather<T: Element>(dtype: &DataType, bytes: &[u8]) -> Result<Vec<T>> {
    check_span(dtype, bytes)?;
    let width = dtype.bytes_per_element();
    Ok((0..dtype.num_elements())
        .map(|i| {
            let at = dtype.element_byte_offset(i);
            T::read_ne(&bytes[at..at + width])
        })
        .collect())
}

fn scatter<T: Element>(dtype: &DataType, values: &[T], bytes: &mut [u8]) -> Result<()> {
    check_span(dtype, bytes)?;
    let width = dtype.bytes_per_element();
    for (i, value) in values.iter().enumerate() {
        let at = dtype.element_byte_offset(i);
        value.write_ne(&mut bytes[at..at + width]);
    }
    Ok(())
}

fn compact_bytes(dtype: &DataType, bytes: &[u8]) -> Result<Vec<u8>> {
    check_span(dtype, bytes)?;
    let width = dtype.bytes_per_element();
    if dtype.is_compact() {
        return Ok(bytes[..dtype.total_bytes()].to_vec());
    }
    let mut out = Vec::with_capacity(dtype.total_bytes());
    for i in 0..dtype.num_elements() {
        let at = dtype.element_byte_offset(i);
        out.extend_from_slice(&bytes[at..at + width]);
    }
    Ok(out)
}

/// Writes packed values to the front of resized memory and zeroes the rest.
fn repack(packed: &[u8], bytes: &mut [u8]) {
    let keep = packed.len().min(bytes.len());
    bytes[..keep].copy_from_slice(&packed[..keep]);
    bytes[keep..].fill(0);
}

// =============================================================================
// View operations
// =============================================================================

impl DataStore {
    /// Applies a description to an unbound view.
    ///
    /// # Errors
    ///
    /// Refused for an invalid description or a bound view.
    pub fn describe_view(&mut self, view: ViewId, dtype: DataType) -> Result<()> {
        attempt!(dtype.validate());
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if v.is_bound() {
            refuse!(Error::illegal_state(format!(
                "view '{}' is bound; detach it before describing",
                v.name
            )));
        }
        debug!(view = %v.name, %dtype, "view described");
        v.dtype = dtype;
        Ok(())
    }

    /// Attaches a registry buffer to a view.
    ///
    /// An undescribed view takes the buffer's description. Attaching the
    /// buffer the view already uses does nothing.
    ///
    /// # Errors
    ///
    /// Refused for an unknown buffer or a view bound to something else.
    pub fn attach_buffer(&mut self, view: ViewId, buffer: Index) -> Result<()> {
        let Some(b) = self.buffers.get_mut(buffer) else {
            refuse!(Error::buffer_not_found(buffer));
        };
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        match v.binding {
            Binding::Buffer(current) if current == buffer => return Ok(()),
            Binding::Unbound => {}
            _ => refuse!(Error::illegal_state(format!(
                "view '{}' is already {}; detach it first",
                v.name,
                v.state()
            ))),
        }
        if v.dtype.is_empty() && b.is_described() {
            v.dtype = b.data_type();
        }
        v.binding = Binding::Buffer(buffer);
        b.attach_view(view);
        debug!(view = %v.name, buffer, "buffer attached");
        Ok(())
    }

    /// Detaches a view from its buffer and returns the buffer's index.
    ///
    /// The view keeps its description. The buffer is never destroyed here,
    /// even if this was its last view.
    ///
    /// # Errors
    ///
    /// Refused if the view has no buffer.
    pub fn detach_buffer(&mut self, view: ViewId) -> Result<Index> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        let Binding::Buffer(idx) = v.binding else {
            refuse!(Error::illegal_state(format!(
                "view '{}' has no buffer to detach",
                v.name
            )));
        };
        v.binding = Binding::Unbound;
        if let Some(b) = self.buffers.get_mut(idx) {
            b.detach_view(view);
        }
        debug!(view = %v.name, buffer = idx, "buffer detached");
        Ok(idx)
    }

    /// Points a view at caller-owned memory.
    ///
    /// The view never frees the block. A view already pointing at external
    /// memory is re-pointed.
    ///
    /// # Errors
    ///
    /// Refused if the view is bound to anything but external memory.
    pub fn set_external_data(&mut self, view: ViewId, block: SharedBlock) -> Result<()> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if !matches!(v.binding, Binding::Unbound | Binding::External(_)) {
            refuse!(Error::illegal_state(format!(
                "view '{}' is already {}; detach it first",
                v.name,
                v.state()
            )));
        }
        debug!(view = %v.name, bytes = block.len(), "external data set");
        v.binding = Binding::External(block);
        Ok(())
    }

    /// Stores a string in a view, describing it as a byte string.
    ///
    /// # Errors
    ///
    /// Refused if the view is bound to anything but a string.
    pub fn set_string(&mut self, view: ViewId, value: &str) -> Result<()> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if !matches!(v.binding, Binding::Unbound | Binding::String(_)) {
            refuse!(Error::illegal_state(format!(
                "view '{}' is {}; cannot hold a string",
                v.name,
                v.state()
            )));
        }
        v.dtype = DataType::char8_str(value.len());
        v.binding = Binding::String(value.to_owned());
        Ok(())
    }

    /// Stores a single typed value in a view.
    ///
    /// # Errors
    ///
    /// Refused if the view is bound to anything but a scalar.
    pub fn set_scalar<T: Element>(&mut self, view: ViewId, value: T) -> Result<()> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if !matches!(v.binding, Binding::Unbound | Binding::Scalar(_)) {
            refuse!(Error::illegal_state(format!(
                "view '{}' is {}; cannot hold a scalar",
                v.name,
                v.state()
            )));
        }
        let dtype = DataType::new(T::TYPE_ID, 1);
        let mut bytes = vec![0; dtype.total_bytes()];
        value.write_ne(&mut bytes);
        v.dtype = dtype;
        v.binding = Binding::Scalar(bytes);
        Ok(())
    }

    /// Binds a described view to the persistent region named `key`,
    /// creating the region if needed.
    ///
    /// # Errors
    ///
    /// Refused without a persistent store, for an undescribed or bound view,
    /// or if the store refuses.
    pub fn bind_persistent(&mut self, view: ViewId, key: &str) -> Result<()> {
        let Some(store) = self.persistent.clone() else {
            refuse!(Error::illegal_state("no persistent store is installed"));
        };
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if v.is_bound() {
            refuse!(Error::illegal_state(format!(
                "view '{}' is already {}; detach it first",
                v.name,
                v.state()
            )));
        }
        if v.dtype.is_empty() {
            refuse!(Error::illegal_state(format!(
                "view '{}' must be described before binding persistent memory",
                v.name
            )));
        }
        let block = attempt!(store.bind(key, v.dtype.span_bytes()));
        debug!(view = %v.name, key, "persistent region bound");
        v.binding = Binding::Persistent {
            key: key.to_owned(),
            block,
        };
        Ok(())
    }

    /// Drops an external, string, scalar or persistent binding.
    ///
    /// Strings and scalars lose their description with their value; external
    /// and persistent views stay described. Persistent regions are not
    /// released.
    ///
    /// # Errors
    ///
    /// Refused for buffer-bound views; use [`DataStore::detach_buffer`].
    pub fn clear_binding(&mut self, view: ViewId) -> Result<()> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        match v.binding {
            Binding::Buffer(_) => refuse!(Error::illegal_state(format!(
                "view '{}' has a buffer; use detach_buffer",
                v.name
            ))),
            Binding::String(_) | Binding::Scalar(_) => v.dtype = DataType::empty(),
            Binding::Unbound | Binding::External(_) | Binding::Persistent { .. } => {}
        }
        v.binding = Binding::Unbound;
        Ok(())
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocates memory for a view.
    ///
    /// A view attached to an unallocated buffer allocates that buffer,
    /// describing it from the view first if needed. A described, unbound view
    /// gets a new buffer sized to its description.
    ///
    /// # Errors
    ///
    /// Refused for undescribed views, views bound to non-buffer memory, and
    /// buffers already allocated; allocator failures are passed on.
    pub fn allocate_view(&mut self, view: ViewId) -> Result<()> {
        let Some(v) = self.views.get(view.handle()) else {
            refuse!(stale_view(view));
        };
        let dtype = v.dtype.clone();
        match v.binding {
            Binding::Buffer(idx) => {
                let Some(b) = self.buffers.get_mut(idx) else {
                    refuse!(Error::buffer_not_found(idx));
                };
                if b.is_allocated() {
                    refuse!(Error::illegal_state(format!(
                        "buffer {idx} is already allocated"
                    )));
                }
                if !b.is_described() {
                    if dtype.is_empty() {
                        refuse!(Error::illegal_state(
                            "neither the view nor its buffer is described"
                        ));
                    }
                    b.describe(dtype.type_id(), span_elements(&dtype))?;
                }
                b.allocate()
            }
            Binding::Unbound => {
                if dtype.is_empty() {
                    refuse!(Error::illegal_state(format!(
                        "view '{}' has no description to allocate from",
                        v.name
                    )));
                }
                let idx = self.create_buffer_with(dtype.type_id(), span_elements(&dtype))?;
                let allocated = match self.buffers.get_mut(idx) {
                    Some(b) => b.allocate(),
                    None => Err(Error::buffer_not_found(idx)),
                };
                if let Err(err) = allocated {
                    self.buffers.remove(idx);
                    return Err(err);
                }
                self.attach_buffer(view, idx)
            }
            _ => refuse!(Error::illegal_state(format!(
                "view '{}' is {}; only buffer memory is allocated",
                v.name,
                v.state()
            ))),
        }
    }

    /// Describes an unbound view, then allocates it.
    ///
    /// # Errors
    ///
    /// See [`DataStore::describe_view`] and [`DataStore::allocate_view`].
    pub fn allocate_view_as(&mut self, view: ViewId, dtype: DataType) -> Result<()> {
        self.describe_view(view, dtype)?;
        self.allocate_view(view)
    }

    /// Resizes a view's memory to `num_elements` values, keeping leading
    /// values. The view becomes a compact one-dimensional description; a view
    /// with an offset or stride has its values packed to the front first.
    ///
    /// Buffer-backed views must be the only view of their buffer; persistent
    /// views resize their region.
    ///
    /// # Errors
    ///
    /// Refused for shared buffers, undescribed views, sizes that overflow,
    /// type mismatches with the buffer, and other bindings. Memory and
    /// description are unchanged when refused.
    pub fn reallocate_view(&mut self, view: ViewId, num_elements: usize) -> Result<()> {
        let Some(v) = self.views.get_mut(view.handle()) else {
            refuse!(stale_view(view));
        };
        if v.dtype.is_empty() {
            refuse!(Error::illegal_state(format!(
                "view '{}' has no description to reallocate",
                v.name
            )));
        }
        let resized = DataType::new(v.dtype.type_id(), num_elements);
        attempt!(resized.validate());
        match &v.binding {
            Binding::Buffer(idx) => {
                let idx = *idx;
                let Some(b) = self.buffers.get_mut(idx) else {
                    refuse!(Error::buffer_not_found(idx));
                };
                if b.num_views() > 1 {
                    refuse!(Error::illegal_state(format!(
                        "buffer {idx} is shared by {} views",
                        b.num_views()
                    )));
                }
                if b.is_described() && b.type_id() != resized.type_id() {
                    refuse!(Error::type_mismatch(b.type_id(), resized.type_id()));
                }
                match b.data() {
                    Some(bytes) if !v.dtype.is_compact() => {
                        let packed = attempt!(compact_bytes(&v.dtype, bytes));
                        b.reallocate(num_elements)?;
                        if let Some(bytes) = b.data_mut() {
                            repack(&packed, bytes);
                        }
                    }
                    Some(_) => b.reallocate(num_elements)?,
                    None => b.allocate_as(resized.type_id(), num_elements)?,
                }
            }
            Binding::Persistent { key, block } => {
                let Some(store) = self.persistent.as_ref() else {
                    refuse!(Error::illegal_state("no persistent store is installed"));
                };
                let packed = if v.dtype.is_compact() {
                    None
                } else {
                    Some(attempt!(compact_bytes(&v.dtype, &block.read())))
                };
                attempt!(store.resize(key, resized.total_bytes()));
                if let Some(packed) = packed {
                    repack(&packed, &mut block.write());
                }
            }
            _ => refuse!(Error::illegal_state(format!(
                "view '{}' is {}; it cannot be reallocated",
                v.name,
                v.state()
            ))),
        }
        debug!(view = %v.name, num_elements, "view reallocated");
        v.dtype = resized;
        Ok(())
    }

    // =========================================================================
    // Data access
    // =========================================================================

    fn with_bytes<R>(&self, view: ViewId, f: impl FnOnce(&[u8]) -> Result<R>) -> Result<R> {
        let v = self.view_ref(view)?;
        match &v.binding {
            Binding::Unbound => Err(Error::illegal_state(format!(
                "view '{}' has no data",
                v.name
            ))),
            Binding::Buffer(idx) => {
                let b = self
                    .buffers
                    .get(*idx)
                    .ok_or_else(|| Error::buffer_not_found(*idx))?;
                let bytes = b.data().ok_or_else(|| {
                    Error::illegal_state(format!("buffer {idx} is not allocated"))
                })?;
                f(bytes)
            }
            Binding::External(block) | Binding::Persistent { block, .. } => f(&block.read()),
            Binding::String(value) => f(value.as_bytes()),
            Binding::Scalar(bytes) => f(bytes),
        }
    }

    fn with_bytes_mut<R>(
        &mut self,
        view: ViewId,
        f: impl FnOnce(&mut [u8]) -> Result<R>,
    ) -> Result<R> {
        let v = self
            .views
            .get_mut(view.handle())
            .ok_or_else(|| stale_view(view))?;
        match &mut v.binding {
            Binding::Unbound => Err(Error::illegal_state(format!(
                "view '{}' has no data",
                v.name
            ))),
            Binding::String(_) => Err(Error::illegal_state(format!(
                "view '{}' holds a string; use set_string",
                v.name
            ))),
            Binding::Buffer(idx) => {
                let idx = *idx;
                let b = self
                    .buffers
                    .get_mut(idx)
                    .ok_or_else(|| Error::buffer_not_found(idx))?;
                let bytes = b.data_mut().ok_or_else(|| {
                    Error::illegal_state(format!("buffer {idx} is not allocated"))
                })?;
                f(bytes)
            }
            Binding::External(block) | Binding::Persistent { block, .. } => {
                f(&mut block.write())
            }
            Binding::Scalar(bytes) => f(bytes),
        }
    }

    fn typed_description<T: Element>(&self, view: ViewId) -> Result<DataType> {
        let v = self.view_ref(view)?;
        if v.dtype.is_empty() {
            return Err(Error::illegal_state(format!(
                "view '{}' is not described",
                v.name
            )));
        }
        if !element_matches::<T>(v.dtype.type_id()) {
            return Err(Error::type_mismatch(v.dtype.type_id(), T::TYPE_ID));
        }
        Ok(v.dtype.clone())
    }

    /// Copies a view's values out, honouring offset and stride.
    ///
    /// # Errors
    ///
    /// Refused for undescribed or unbacked views, a type mismatch, or memory
    /// too small for the description.
    pub fn view_data<T: Element>(&self, view: ViewId) -> Result<Vec<T>> {
        let dtype = attempt!(self.typed_description::<T>(view));
        Ok(attempt!(self.with_bytes(view, |bytes| gather(&dtype, bytes))))
    }

    /// Writes a view's values, honouring offset and stride.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::view_data`], and refused unless `values` holds
    /// exactly the described number of elements. String views are written
    /// with [`DataStore::set_string`].
    pub fn set_view_data<T: Element>(&mut self, view: ViewId, values: &[T]) -> Result<()> {
        let dtype = attempt!(self.typed_description::<T>(view));
        if values.len() != dtype.num_elements() {
            refuse!(Error::invalid_argument(format!(
                "expected {} values, got {}",
                dtype.num_elements(),
                values.len()
            )));
        }
        attempt!(self.with_bytes_mut(view, |bytes| scatter(&dtype, values, bytes)));
        Ok(())
    }

    /// Copies the described elements out as packed bytes.
    ///
    /// # Errors
    ///
    /// Refused for undescribed or unbacked views, or memory too small for
    /// the description.
    pub fn view_bytes(&self, view: ViewId) -> Result<Vec<u8>> {
        let v = attempt!(self.view_ref(view));
        if v.dtype.is_empty() {
            refuse!(Error::illegal_state(format!(
                "view '{}' is not described",
                v.name
            )));
        }
        let dtype = v.dtype.clone();
        Ok(attempt!(self.with_bytes(view, |bytes| compact_bytes(&dtype, bytes))))
    }

    /// The string held by a string view.
    ///
    /// # Errors
    ///
    /// Refused for any other kind of view.
    pub fn view_string(&self, view: ViewId) -> Result<String> {
        let v = attempt!(self.view_ref(view));
        match &v.binding {
            Binding::String(value) => Ok(value.clone()),
            _ => refuse!(Error::illegal_state(format!(
                "view '{}' is {}, not a string",
                v.name,
                v.state()
            ))),
        }
    }

    /// The single value of a one-element view.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::view_data`], and refused unless exactly one value
    /// is described.
    pub fn view_scalar<T: Element>(&self, view: ViewId) -> Result<T> {
        let values = self.view_data::<T>(view)?;
        match values.as_slice() {
            [value] => Ok(*value),
            _ => refuse!(Error::invalid_argument(format!(
                "view holds {} values, not one",
                values.len()
            ))),
        }
    }

    /// Bytes of backing memory reachable through the view's binding.
    #[must_use]
    pub fn view_available_bytes(&self, view: ViewId) -> Option<usize> {
        self.with_bytes(view, |bytes| Ok(bytes.len())).ok()
    }

    /// Returns true if the view's binding has memory behind it.
    #[must_use]
    pub fn is_allocated(&self, view: ViewId) -> bool {
        self.view_available_bytes(view).is_some()
    }

    /// Returns true if the view is described and its memory covers the
    /// whole description.
    #[must_use]
    pub fn is_applied(&self, view: ViewId) -> bool {
        let Some(v) = self.view(view) else {
            return false;
        };
        v.is_described()
            && self
                .view_available_bytes(view)
                .is_some_and(|available| v.dtype.span_bytes() <= available)
    }
}
