//! The store: root of the group tree and owner of the buffer registry.

use std::sync::Arc;

use arbor_foundation::{
    CollectionStore, Error, ErrorKind, Index, IndexedCollection, Result, Slots, TypeId,
};
use tracing::debug;

use crate::buffer::Buffer;
use crate::config::StoreConfig;
use crate::group::{Group, GroupId};
use crate::memory::{Allocator, HeapAllocator, PersistentStore};
use crate::view::{Binding, View, ViewId};

/// Hierarchical in-memory data store.
///
/// Groups and views live in generational arenas owned by the store. Parent
/// and owner links are ids; destroying a group removes its whole subtree
/// from the arenas, and a stale [`GroupId`] or [`ViewId`] is detected rather
/// than resolving to whatever reuses the slot.
#[derive(Debug)]
pub struct DataStore {
    pub(crate) config: StoreConfig,
    pub(crate) allocator: Arc<dyn Allocator>,
    pub(crate) persistent: Option<Arc<dyn PersistentStore>>,
    pub(crate) buffers: IndexedCollection<Buffer>,
    pub(crate) groups: Slots<Group>,
    pub(crate) views: Slots<View>,
    pub(crate) root: GroupId,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    /// Creates a store with the default configuration and a heap allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store with the given configuration and a heap allocator.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_allocator(config, Arc::new(HeapAllocator::new()))
    }

    /// Creates a store that draws buffer memory from `allocator`.
    #[must_use]
    pub fn with_allocator(config: StoreConfig, allocator: Arc<dyn Allocator>) -> Self {
        let mut groups = Slots::new();
        let root = GroupId::from_handle(groups.insert(Group::new(String::new(), None, &config)));
        debug!(?config, "store created");
        Self {
            config,
            allocator,
            persistent: None,
            buffers: IndexedCollection::new(),
            groups,
            views: Slots::new(),
            root,
        }
    }

    /// Installs the persistent store used by [`DataStore::bind_persistent`].
    pub fn set_persistent_store(&mut self, store: Arc<dyn PersistentStore>) {
        self.persistent = Some(store);
    }

    /// The persistent store, if one is installed.
    #[must_use]
    pub fn persistent_store(&self) -> Option<&Arc<dyn PersistentStore>> {
        self.persistent.as_ref()
    }

    /// Construction-time configuration.
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Allocator backing buffer memory.
    #[must_use]
    pub fn allocator(&self) -> &Arc<dyn Allocator> {
        &self.allocator
    }

    // =========================================================================
    // Tree access
    // =========================================================================

    /// The root group. It has an empty name and no parent.
    #[must_use]
    pub fn root(&self) -> GroupId {
        self.root
    }

    /// Looks up a group, or `None` if the id is stale.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.handle())
    }

    /// Looks up a view, or `None` if the id is stale.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id.handle())
    }

    /// Number of live groups, the root included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of live views across the whole tree.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub(crate) fn group_ref(&self, id: GroupId) -> Result<&Group> {
        self.groups
            .get(id.handle())
            .ok_or_else(|| Error::stale_handle(format!("group {:?}", id.handle())))
    }

    pub(crate) fn view_ref(&self, id: ViewId) -> Result<&View> {
        self.views.get(id.handle()).ok_or_else(|| stale_view(id))
    }

    // =========================================================================
    // Buffer registry
    // =========================================================================

    /// Creates an undescribed buffer and returns its registry index.
    ///
    /// # Errors
    ///
    /// Only fails if the registry refuses the slot it just reported free.
    pub fn create_buffer(&mut self) -> Result<Index> {
        let idx = self.buffers.valid_empty_index();
        let buffer = Buffer::new(idx, Arc::clone(&self.allocator));
        if self.buffers.insert_at(buffer, "", idx).is_err() {
            refuse!(Error::new(ErrorKind::Internal(format!(
                "buffer slot {idx} reported free but occupied"
            ))));
        }
        debug!(buffer = idx, "buffer created");
        Ok(idx)
    }

    /// Creates a buffer described as `num_elements` values of `type_id`.
    ///
    /// # Errors
    ///
    /// Refused for `NoType` and for counts whose byte size overflows;
    /// nothing is created in that case.
    pub fn create_buffer_with(&mut self, type_id: TypeId, num_elements: usize) -> Result<Index> {
        if !type_id.is_valid() {
            refuse!(Error::invalid_argument("buffer type must not be empty"));
        }
        let idx = self.create_buffer()?;
        let described = match self.buffers.get_mut(idx) {
            Some(buffer) => buffer.describe(type_id, num_elements),
            None => Err(Error::buffer_not_found(idx)),
        };
        if let Err(err) = described {
            self.buffers.remove(idx);
            return Err(err);
        }
        Ok(idx)
    }

    /// Destroys a buffer and frees its memory.
    ///
    /// # Errors
    ///
    /// Refused if no buffer has this index or views are still attached.
    pub fn destroy_buffer(&mut self, idx: Index) -> Result<()> {
        let Some(buffer) = self.buffers.get(idx) else {
            refuse!(Error::buffer_not_found(idx));
        };
        if buffer.num_views() > 0 {
            refuse!(Error::buffer_in_use(idx, buffer.num_views()));
        }
        self.buffers.remove(idx);
        debug!(buffer = idx, "buffer destroyed");
        Ok(())
    }

    /// Destroys every buffer, first detaching the views that use them.
    ///
    /// Detached views keep their description.
    pub fn destroy_all_buffers(&mut self) {
        let mut next = self.buffers.first_valid_index();
        while let Some(idx) = next {
            if let Some(buffer) = self.buffers.get_mut(idx) {
                for view in buffer.take_views() {
                    if let Some(view) = self.views.get_mut(view.handle()) {
                        view.binding = Binding::Unbound;
                    }
                }
            }
            next = self.buffers.next_valid_index(idx);
        }
        let destroyed = self.buffers.remove_all().len();
        debug!(destroyed, "all buffers destroyed");
    }

    /// Looks up a buffer by registry index.
    #[must_use]
    pub fn buffer(&self, idx: Index) -> Option<&Buffer> {
        self.buffers.get(idx)
    }

    /// Looks up a buffer mutably.
    pub fn buffer_mut(&mut self, idx: Index) -> Option<&mut Buffer> {
        self.buffers.get_mut(idx)
    }

    /// Returns true if a buffer lives at `idx`.
    #[must_use]
    pub fn has_buffer(&self, idx: Index) -> bool {
        self.buffers.has(idx)
    }

    /// Number of buffers in the registry.
    #[must_use]
    pub fn num_buffers(&self) -> usize {
        self.buffers.count()
    }

    /// Lowest live buffer index.
    #[must_use]
    pub fn first_valid_buffer_index(&self) -> Option<Index> {
        self.buffers.first_valid_index()
    }

    /// Next live buffer index after `idx`.
    #[must_use]
    pub fn next_valid_buffer_index(&self, idx: Index) -> Option<Index> {
        self.buffers.next_valid_index(idx)
    }

    /// Iterates `(index, buffer)` pairs in ascending index order.
    pub fn buffers(&self) -> impl Iterator<Item = (Index, &Buffer)> + '_ {
        self.buffers.iter()
    }
}

pub(crate) fn stale_view(id: ViewId) -> Error {
    Error::stale_handle(format!("view {:?}", id.handle()))
}
