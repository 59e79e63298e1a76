//! Registry-owned blocks of memory.
//!
//! A buffer carries an element type and count, optionally the bytes
//! themselves, and the set of views attached to it. Views never copy a
//! buffer's bytes or hold on to them; they look the buffer up by index on
//! every access, so a reallocation is seen by all of them at once.

use std::fmt;
use std::sync::Arc;

use arbor_foundation::{DataType, Element, Error, Index, Result, TypeId};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::memory::Allocator;
use crate::view::ViewId;

/// A block of memory in the store's buffer registry.
pub struct Buffer {
    index: Index,
    type_id: TypeId,
    num_elements: usize,
    data: Option<Vec<u8>>,
    views: SmallVec<[ViewId; 2]>,
    allocator: Arc<dyn Allocator>,
}

impl Buffer {
    pub(crate) fn new(index: Index, allocator: Arc<dyn Allocator>) -> Self {
        Self {
            index,
            type_id: TypeId::NoType,
            num_elements: 0,
            data: None,
            views: SmallVec::new(),
            allocator,
        }
    }

    /// Registry index of this buffer.
    #[must_use]
    pub fn index(&self) -> Index {
        self.index
    }

    /// Described element type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Described element count.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Size of one element in bytes.
    #[must_use]
    pub fn bytes_per_element(&self) -> usize {
        self.type_id.bytes_per_element()
    }

    /// Bytes needed to hold the described elements.
    ///
    /// Never overflows: [`Buffer::describe`] refuses counts that would.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.num_elements * self.bytes_per_element()
    }

    /// Compact description of the whole buffer.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        DataType::new(self.type_id, self.num_elements)
    }

    /// Number of views attached.
    #[must_use]
    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    /// Views attached, in attachment order.
    #[must_use]
    pub fn views(&self) -> &[ViewId] {
        &self.views
    }

    /// Returns true once a type has been described.
    #[must_use]
    pub fn is_described(&self) -> bool {
        self.type_id.is_valid()
    }

    /// Returns true if memory is held.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Raw bytes, if allocated.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Raw bytes, mutably, if allocated.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Sets the element type and count.
    ///
    /// # Errors
    ///
    /// Refused once memory is allocated, and for `NoType`.
    pub fn describe(&mut self, type_id: TypeId, num_elements: usize) -> Result<()> {
        if self.is_allocated() {
            refuse!(Error::illegal_state(format!(
                "buffer {} is allocated; reallocate to change its size",
                self.index
            )));
        }
        if !type_id.is_valid() {
            refuse!(Error::invalid_argument("buffer type must not be empty"));
        }
        if num_elements.checked_mul(type_id.bytes_per_element()).is_none() {
            refuse!(Error::invalid_argument(format!(
                "{num_elements} elements of {type_id} overflow the address space"
            )));
        }
        self.type_id = type_id;
        self.num_elements = num_elements;
        Ok(())
    }

    /// Allocates zeroed memory for the described elements.
    ///
    /// # Errors
    ///
    /// Refused if undescribed or already allocated, or if the allocator
    /// fails.
    pub fn allocate(&mut self) -> Result<()> {
        if !self.is_described() {
            refuse!(Error::illegal_state(format!(
                "buffer {} has no description to allocate from",
                self.index
            )));
        }
        if self.is_allocated() {
            refuse!(Error::illegal_state(format!(
                "buffer {} is already allocated",
                self.index
            )));
        }
        let block = match self.allocator.allocate(self.total_bytes()) {
            Ok(block) => block,
            Err(err) => refuse!(err),
        };
        debug!(buffer = self.index, bytes = block.len(), "buffer allocated");
        self.data = Some(block);
        Ok(())
    }

    /// Describes then allocates.
    ///
    /// # Errors
    ///
    /// See [`Buffer::describe`] and [`Buffer::allocate`].
    pub fn allocate_as(&mut self, type_id: TypeId, num_elements: usize) -> Result<()> {
        self.describe(type_id, num_elements)?;
        self.allocate()
    }

    /// Changes the element count, keeping the leading bytes.
    ///
    /// # Errors
    ///
    /// Refused if not allocated, if the new size overflows, or if the
    /// allocator fails. The buffer keeps its memory and description when
    /// refused.
    pub fn reallocate(&mut self, num_elements: usize) -> Result<()> {
        let index = self.index;
        let Some(bytes) = num_elements.checked_mul(self.bytes_per_element()) else {
            refuse!(Error::invalid_argument(format!(
                "{num_elements} elements of {} overflow the address space",
                self.type_id
            )));
        };
        let Some(block) = self.data.as_mut() else {
            refuse!(Error::illegal_state(format!(
                "buffer {index} is not allocated"
            )));
        };
        attempt!(self.allocator.reallocate(block, bytes));
        debug!(buffer = index, bytes, "buffer reallocated");
        self.num_elements = num_elements;
        Ok(())
    }

    /// Releases memory, keeping the description.
    pub fn deallocate(&mut self) {
        if let Some(block) = self.data.take() {
            debug!(buffer = self.index, "buffer deallocated");
            self.allocator.deallocate(block);
        }
    }

    // =========================================================================
    // Typed access
    // =========================================================================

    /// Copies every element out.
    ///
    /// # Errors
    ///
    /// Refused if `T` does not match the described type or nothing is
    /// allocated.
    pub fn read<T: Element>(&self) -> Result<Vec<T>> {
        self.check_element::<T>()?;
        let Some(bytes) = self.data() else {
            refuse!(Error::illegal_state(format!(
                "buffer {} is not allocated",
                self.index
            )));
        };
        Ok(bytes
            .chunks_exact(self.bytes_per_element())
            .map(T::read_ne)
            .collect())
    }

    /// Overwrites the leading elements with `values`.
    ///
    /// # Errors
    ///
    /// Refused on a type mismatch, when not allocated, or when `values` is
    /// longer than the buffer.
    pub fn write<T: Element>(&mut self, values: &[T]) -> Result<()> {
        self.check_element::<T>()?;
        let width = self.bytes_per_element();
        let index = self.index;
        let Some(bytes) = self.data_mut() else {
            refuse!(Error::illegal_state(format!(
                "buffer {index} is not allocated"
            )));
        };
        let needed = values.len() * width;
        if needed > bytes.len() {
            refuse!(Error::out_of_bounds(needed, bytes.len()));
        }
        for (value, out) in values.iter().zip(bytes.chunks_exact_mut(width)) {
            value.write_ne(out);
        }
        Ok(())
    }

    fn check_element<T: Element>(&self) -> Result<()> {
        if !element_matches::<T>(self.type_id) {
            refuse!(Error::type_mismatch(self.type_id, T::TYPE_ID));
        }
        Ok(())
    }

    // =========================================================================
    // View bookkeeping
    // =========================================================================

    pub(crate) fn attach_view(&mut self, view: ViewId) {
        if !self.views.contains(&view) {
            self.views.push(view);
            trace!(buffer = self.index, views = self.views.len(), "view attached");
        }
    }

    pub(crate) fn detach_view(&mut self, view: ViewId) -> bool {
        let Some(pos) = self.views.iter().position(|v| *v == view) else {
            return false;
        };
        self.views.remove(pos);
        trace!(buffer = self.index, views = self.views.len(), "view detached");
        true
    }

    pub(crate) fn take_views(&mut self) -> SmallVec<[ViewId; 2]> {
        std::mem::take(&mut self.views)
    }
}

/// Returns true if `T` may read or write elements tagged `type_id`.
///
/// Byte strings are read and written as `u8`.
pub(crate) fn element_matches<T: Element>(type_id: TypeId) -> bool {
    T::TYPE_ID == type_id || (type_id == TypeId::Char8Str && T::TYPE_ID == TypeId::UInt8)
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.deallocate();
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("index", &self.index)
            .field("type_id", &self.type_id)
            .field("num_elements", &self.num_elements)
            .field("allocated", &self.is_allocated())
            .field("views", &self.views.len())
            .finish()
    }
}
