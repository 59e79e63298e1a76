//! Groups: named tree nodes holding child views and child groups.
//!
//! Paths are `/`-delimited. Reads walk existing groups and fail on the
//! first missing one; creates make missing intermediate groups but never
//! the final item implicitly. Names are unique among a group's views and,
//! separately, among its groups.

use std::fmt::Write as _;

use arbor_foundation::{
    CollectionKind, CollectionStore, DataType, Element, Error, ErrorContext, Handle, Index,
    ItemCollection, Result,
};
use tracing::debug;

use crate::config::StoreConfig;
use crate::datastore::DataStore;
use crate::memory::SharedBlock;
use crate::path;
use crate::view::{Binding, View, ViewId};

/// Generational id of a group in a [`DataStore`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct GroupId(Handle);

impl GroupId {
    pub(crate) const fn from_handle(handle: Handle) -> Self {
        Self(handle)
    }

    /// The underlying arena handle.
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.0
    }
}

/// A named node of the tree.
#[derive(Debug)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) parent: Option<GroupId>,
    pub(crate) views: ItemCollection<ViewId>,
    pub(crate) groups: ItemCollection<GroupId>,
}

impl Group {
    pub(crate) fn new(name: String, parent: Option<GroupId>, config: &StoreConfig) -> Self {
        Self {
            name,
            parent,
            views: ItemCollection::new(config.view_collection),
            groups: ItemCollection::new(config.group_collection),
        }
    }

    /// Name, unique among the parent's groups. Empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent group; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Returns true for the store's root group.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of child views.
    #[must_use]
    pub fn num_views(&self) -> usize {
        self.views.count()
    }

    /// Number of child groups.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.count()
    }

    /// Child view named `name`. Does not interpret paths.
    #[must_use]
    pub fn child_view(&self, name: &str) -> Option<ViewId> {
        self.views.get_by_name(name).copied()
    }

    /// Child group named `name`. Does not interpret paths.
    #[must_use]
    pub fn child_group(&self, name: &str) -> Option<GroupId> {
        self.groups.get_by_name(name).copied()
    }

    /// Returns true if a child view is named `name`.
    #[must_use]
    pub fn has_child_view(&self, name: &str) -> bool {
        self.views.has_name(name)
    }

    /// Returns true if a child group is named `name`.
    #[must_use]
    pub fn has_child_group(&self, name: &str) -> bool {
        self.groups.has_name(name)
    }

    /// Index of the child view named `name`.
    #[must_use]
    pub fn view_index(&self, name: &str) -> Option<Index> {
        self.views.index_of(name)
    }

    /// Index of the child group named `name`.
    #[must_use]
    pub fn group_index(&self, name: &str) -> Option<Index> {
        self.groups.index_of(name)
    }

    /// Name of the child view at `idx`.
    #[must_use]
    pub fn view_name(&self, idx: Index) -> Option<&str> {
        self.views.name_of(idx)
    }

    /// Name of the child group at `idx`.
    #[must_use]
    pub fn group_name(&self, idx: Index) -> Option<&str> {
        self.groups.name_of(idx)
    }

    /// First live child view index.
    #[must_use]
    pub fn first_valid_view_index(&self) -> Option<Index> {
        self.views.first_valid_index()
    }

    /// Next live child view index after `idx`.
    #[must_use]
    pub fn next_valid_view_index(&self, idx: Index) -> Option<Index> {
        self.views.next_valid_index(idx)
    }

    /// First live child group index.
    #[must_use]
    pub fn first_valid_group_index(&self) -> Option<Index> {
        self.groups.first_valid_index()
    }

    /// Next live child group index after `idx`.
    #[must_use]
    pub fn next_valid_group_index(&self, idx: Index) -> Option<Index> {
        self.groups.next_valid_index(idx)
    }

    /// Child views in canonical order.
    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.iter().map(|(_, id)| *id)
    }

    /// Child groups in canonical order.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.iter().map(|(_, id)| *id)
    }

    /// Strategy holding the child views.
    #[must_use]
    pub fn view_collection_kind(&self) -> CollectionKind {
        self.views.kind()
    }

    /// Strategy holding the child groups.
    #[must_use]
    pub fn group_collection_kind(&self) -> CollectionKind {
        self.groups.kind()
    }
}

// =============================================================================
// Path resolution and insertion
// =============================================================================

impl DataStore {
    fn context(&self, group: GroupId, path: &str) -> ErrorContext {
        let context = ErrorContext::new().with_path(path);
        match self.group(group) {
            Some(g) => context.with_group(g.name()),
            None => context,
        }
    }

    /// Walks `dirs` from `start`, creating nothing.
    fn walk(&self, start: GroupId, dirs: &[&str]) -> Result<GroupId> {
        self.group_ref(start)?;
        dirs.iter().try_fold(start, |current, segment| {
            let group = self.group_ref(current)?;
            group
                .child_group(segment)
                .ok_or_else(|| Error::path_not_found(group.name(), *segment))
        })
    }

    /// Walks `dirs` from `start`, creating missing groups.
    fn walk_or_create(&mut self, start: GroupId, dirs: &[&str]) -> Result<GroupId> {
        self.group_ref(start)?;
        let mut current = start;
        for segment in dirs {
            current = match self.group_ref(current)?.child_group(segment) {
                Some(next) => next,
                None => self.insert_group(current, segment)?,
            };
        }
        Ok(current)
    }

    fn resolve_view(&self, group: GroupId, path: &str) -> Result<ViewId> {
        let (dirs, name) = path::split(path)?;
        let owner = self.group_ref(self.walk(group, &dirs)?)?;
        owner
            .child_view(name)
            .ok_or_else(|| Error::path_not_found(owner.name(), name))
    }

    fn resolve_group(&self, group: GroupId, path: &str) -> Result<GroupId> {
        let (dirs, name) = path::split(path)?;
        let parent = self.group_ref(self.walk(group, &dirs)?)?;
        parent
            .child_group(name)
            .ok_or_else(|| Error::path_not_found(parent.name(), name))
    }

    pub(crate) fn insert_group(&mut self, parent: GroupId, name: &str) -> Result<GroupId> {
        path::check_name(name)?;
        let p = self.group_ref(parent)?;
        if p.has_child_group(name) {
            return Err(Error::name_collision(p.name(), name));
        }
        let group = Group::new(name.to_owned(), Some(parent), &self.config);
        let id = GroupId(self.groups.insert(group));
        let Some(p) = self.groups.get_mut(parent.0) else {
            self.groups.remove(id.0);
            return Err(Error::stale_handle(format!("group {:?}", parent.0)));
        };
        if p.groups.insert(id, name).is_err() {
            let err = Error::name_collision(p.name(), name);
            self.groups.remove(id.0);
            return Err(err);
        }
        debug!(group = name, parent = %p.name, "group created");
        Ok(id)
    }

    pub(crate) fn insert_view(&mut self, owner: GroupId, name: &str) -> Result<ViewId> {
        path::check_name(name)?;
        let g = self.group_ref(owner)?;
        if g.has_child_view(name) {
            return Err(Error::name_collision(g.name(), name));
        }
        let id = ViewId::from_handle(self.views.insert(View::new(name, owner)));
        let Some(g) = self.groups.get_mut(owner.0) else {
            self.views.remove(id.handle());
            return Err(Error::stale_handle(format!("group {:?}", owner.0)));
        };
        if g.views.insert(id, name).is_err() {
            let err = Error::name_collision(g.name(), name);
            self.views.remove(id.handle());
            return Err(err);
        }
        debug!(view = name, group = %g.name, "view created");
        Ok(id)
    }

    /// Returns true if `group` is `ancestor` or lies beneath it.
    fn is_within(&self, group: GroupId, ancestor: GroupId) -> bool {
        let mut current = Some(group);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.group(id).and_then(Group::parent);
        }
        false
    }

    // =========================================================================
    // View creation
    // =========================================================================

    /// Creates an empty view at `path` below `group`, creating missing
    /// intermediate groups.
    ///
    /// # Errors
    ///
    /// Refused for empty path segments or if the final group already has a
    /// view with that name.
    pub fn create_view(&mut self, group: GroupId, path: &str) -> Result<ViewId> {
        let (dirs, name) = attempt!(path::split(path));
        let owner = attempt!(
            self.walk_or_create(group, &dirs)
                .map_err(|e| e.with_context(self.context(group, path)))
        );
        Ok(attempt!(
            self.insert_view(owner, name)
                .map_err(|e| e.with_context(self.context(group, path)))
        ))
    }

    /// Creates a described view.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view`], and refused for an invalid
    /// description before anything is created.
    pub fn create_view_with_type(
        &mut self,
        group: GroupId,
        path: &str,
        dtype: DataType,
    ) -> Result<ViewId> {
        attempt!(dtype.validate());
        let view = self.create_view(group, path)?;
        self.describe_view(view, dtype)?;
        Ok(view)
    }

    /// Creates a view attached to an existing buffer, optionally described.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view`], and refused for an unknown buffer
    /// or invalid description before anything is created.
    pub fn create_view_with_buffer(
        &mut self,
        group: GroupId,
        path: &str,
        dtype: Option<DataType>,
        buffer: Index,
    ) -> Result<ViewId> {
        if !self.has_buffer(buffer) {
            refuse!(Error::buffer_not_found(buffer));
        }
        let view = match dtype {
            Some(dtype) => self.create_view_with_type(group, path, dtype)?,
            None => self.create_view(group, path)?,
        };
        if let Err(err) = self.attach_buffer(view, buffer) {
            self.remove_view(view, false);
            return Err(err);
        }
        Ok(view)
    }

    /// Creates a view over caller-owned memory, optionally described.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view`].
    pub fn create_view_with_external(
        &mut self,
        group: GroupId,
        path: &str,
        dtype: Option<DataType>,
        block: SharedBlock,
    ) -> Result<ViewId> {
        let view = match dtype {
            Some(dtype) => self.create_view_with_type(group, path, dtype)?,
            None => self.create_view(group, path)?,
        };
        if let Err(err) = self.set_external_data(view, block) {
            self.remove_view(view, false);
            return Err(err);
        }
        Ok(view)
    }

    /// Creates a described view backed by a new, allocated buffer.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view_with_type`]. If allocation fails the
    /// new view is removed again.
    pub fn create_view_and_allocate(
        &mut self,
        group: GroupId,
        path: &str,
        dtype: DataType,
    ) -> Result<ViewId> {
        let view = self.create_view_with_type(group, path, dtype)?;
        if let Err(err) = self.allocate_view(view) {
            self.remove_view(view, true);
            return Err(err);
        }
        Ok(view)
    }

    /// Creates a view holding a string.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view`].
    pub fn create_view_string(&mut self, group: GroupId, path: &str, value: &str) -> Result<ViewId> {
        let view = self.create_view(group, path)?;
        self.set_string(view, value)?;
        Ok(view)
    }

    /// Creates a view holding one typed value.
    ///
    /// # Errors
    ///
    /// As for [`DataStore::create_view`].
    pub fn create_view_scalar<T: Element>(
        &mut self,
        group: GroupId,
        path: &str,
        value: T,
    ) -> Result<ViewId> {
        let view = self.create_view(group, path)?;
        self.set_scalar(view, value)?;
        Ok(view)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Finds the view at `path` below `group`.
    ///
    /// # Errors
    ///
    /// Refused if any segment is missing; nothing is created.
    pub fn get_view(&self, group: GroupId, path: &str) -> Result<ViewId> {
        Ok(attempt!(
            self.resolve_view(group, path)
                .map_err(|e| e.with_context(self.context(group, path)))
        ))
    }

    /// Returns true if a view exists at `path` below `group`.
    #[must_use]
    pub fn has_view(&self, group: GroupId, path: &str) -> bool {
        self.resolve_view(group, path).is_ok()
    }

    /// Finds the group at `path` below `group`.
    ///
    /// # Errors
    ///
    /// Refused if any segment is missing; nothing is created.
    pub fn get_group(&self, group: GroupId, path: &str) -> Result<GroupId> {
        Ok(attempt!(
            self.resolve_group(group, path)
                .map_err(|e| e.with_context(self.context(group, path)))
        ))
    }

    /// Returns true if a group exists at `path` below `group`.
    #[must_use]
    pub fn has_group(&self, group: GroupId, path: &str) -> bool {
        self.resolve_group(group, path).is_ok()
    }

    /// Child view of `group` at index `idx`.
    #[must_use]
    pub fn view_at(&self, group: GroupId, idx: Index) -> Option<ViewId> {
        self.group(group)?.views.get(idx).copied()
    }

    /// Child group of `group` at index `idx`.
    #[must_use]
    pub fn group_at(&self, group: GroupId, idx: Index) -> Option<GroupId> {
        self.group(group)?.groups.get(idx).copied()
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Drops a view from the arena and unbinds it. The owner's collection
    /// must already have let go of it.
    fn release_view(&mut self, view: ViewId, with_data: bool) {
        let Some(v) = self.views.remove(view.handle()) else {
            return;
        };
        match &v.binding {
            Binding::Buffer(idx) => {
                if let Some(b) = self.buffers.get_mut(*idx) {
                    b.detach_view(view);
                    if with_data && b.num_views() == 0 {
                        self.buffers.remove(*idx);
                        debug!(buffer = *idx, "buffer destroyed with its last view");
                    }
                }
            }
            Binding::Persistent { key, .. } if with_data => {
                if let Some(store) = &self.persistent {
                    store.release(key);
                }
            }
            _ => {}
        }
        debug!(view = %v.name, "view destroyed");
    }

    /// Detaches a view from its owner and destroys it.
    fn remove_view(&mut self, view: ViewId, with_data: bool) {
        let Some(v) = self.views.get(view.handle()) else {
            return;
        };
        let owner = v.owner;
        if let Some(g) = self.groups.get_mut(owner.0) {
            if let Some(idx) = g.views.index_of(&v.name) {
                g.views.remove(idx);
            }
        }
        self.release_view(view, with_data);
    }

    fn destroy_view_inner(&mut self, group: GroupId, path: &str, with_data: bool) -> Result<()> {
        let view = self.get_view(group, path)?;
        self.remove_view(view, with_data);
        Ok(())
    }

    fn destroy_view_at_inner(&mut self, group: GroupId, idx: Index, with_data: bool) -> Result<()> {
        let Some(g) = self.groups.get_mut(group.0) else {
            refuse!(Error::stale_handle(format!("group {:?}", group.0)));
        };
        let Some(view) = g.views.remove(idx) else {
            refuse!(Error::invalid_argument(format!(
                "group '{}' has no view at index {idx}",
                g.name
            )));
        };
        self.release_view(view, with_data);
        Ok(())
    }

    fn destroy_views_inner(&mut self, group: GroupId, with_data: bool) -> Result<()> {
        let Some(g) = self.groups.get_mut(group.0) else {
            refuse!(Error::stale_handle(format!("group {:?}", group.0)));
        };
        for view in g.views.remove_all() {
            self.release_view(view, with_data);
        }
        Ok(())
    }

    /// Destroys the view at `path`. Its buffer is left in the registry even
    /// if no other view uses it.
    ///
    /// # Errors
    ///
    /// Refused if no view exists at `path`.
    pub fn destroy_view(&mut self, group: GroupId, path: &str) -> Result<()> {
        self.destroy_view_inner(group, path, false)
    }

    /// Destroys the child view at index `idx`.
    ///
    /// # Errors
    ///
    /// Refused if `idx` holds no view.
    pub fn destroy_view_at(&mut self, group: GroupId, idx: Index) -> Result<()> {
        self.destroy_view_at_inner(group, idx, false)
    }

    /// Destroys every child view of `group`.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn destroy_views(&mut self, group: GroupId) -> Result<()> {
        self.destroy_views_inner(group, false)
    }

    /// Destroys the view at `path`, and its buffer if this was the buffer's
    /// last view. A persistent region is released.
    ///
    /// # Errors
    ///
    /// Refused if no view exists at `path`.
    pub fn destroy_view_and_data(&mut self, group: GroupId, path: &str) -> Result<()> {
        self.destroy_view_inner(group, path, true)
    }

    /// Index form of [`DataStore::destroy_view_and_data`].
    ///
    /// # Errors
    ///
    /// Refused if `idx` holds no view.
    pub fn destroy_view_and_data_at(&mut self, group: GroupId, idx: Index) -> Result<()> {
        self.destroy_view_at_inner(group, idx, true)
    }

    /// Destroys every child view of `group` with its data.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn destroy_views_and_data(&mut self, group: GroupId) -> Result<()> {
        self.destroy_views_inner(group, true)
    }

    /// Removes a group from its parent's collection, leaving it in the arena.
    fn unlink_group(&mut self, id: GroupId) {
        let Some(g) = self.groups.get(id.0) else {
            return;
        };
        let (parent, name) = (g.parent, g.name.clone());
        if let Some(p) = parent.and_then(|p| self.groups.get_mut(p.0)) {
            if let Some(idx) = p.groups.index_of(&name) {
                p.groups.remove(idx);
            }
        }
    }

    /// Drops a detached group and its whole subtree from the arenas.
    fn release_group_tree(&mut self, top: GroupId) {
        let mut pending = vec![top];
        while let Some(id) = pending.pop() {
            let Some(mut g) = self.groups.remove(id.0) else {
                continue;
            };
            for view in g.views.remove_all() {
                self.release_view(view, false);
            }
            pending.extend(g.groups.remove_all());
            debug!(group = %g.name, "group destroyed");
        }
    }

    /// Creates the group at `path`, creating missing intermediates.
    ///
    /// # Errors
    ///
    /// Refused for empty segments or if the final group already exists.
    pub fn create_group(&mut self, group: GroupId, path: &str) -> Result<GroupId> {
        let (dirs, name) = attempt!(path::split(path));
        let parent = attempt!(
            self.walk_or_create(group, &dirs)
                .map_err(|e| e.with_context(self.context(group, path)))
        );
        Ok(attempt!(
            self.insert_group(parent, name)
                .map_err(|e| e.with_context(self.context(group, path)))
        ))
    }

    /// Destroys the group at `path` and everything below it.
    ///
    /// # Errors
    ///
    /// Refused if no group exists at `path`.
    pub fn destroy_group(&mut self, group: GroupId, path: &str) -> Result<()> {
        let target = self.get_group(group, path)?;
        self.unlink_group(target);
        self.release_group_tree(target);
        Ok(())
    }

    /// Destroys the child group at index `idx` and everything below it.
    ///
    /// # Errors
    ///
    /// Refused if `idx` holds no group.
    pub fn destroy_group_at(&mut self, group: GroupId, idx: Index) -> Result<()> {
        let Some(g) = self.groups.get_mut(group.0) else {
            refuse!(Error::stale_handle(format!("group {:?}", group.0)));
        };
        let Some(child) = g.groups.remove(idx) else {
            refuse!(Error::invalid_argument(format!(
                "group '{}' has no child group at index {idx}",
                g.name
            )));
        };
        self.release_group_tree(child);
        Ok(())
    }

    /// Destroys every child group of `group`.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn destroy_groups(&mut self, group: GroupId) -> Result<()> {
        let Some(g) = self.groups.get_mut(group.0) else {
            refuse!(Error::stale_handle(format!("group {:?}", group.0)));
        };
        for child in g.groups.remove_all() {
            self.release_group_tree(child);
        }
        Ok(())
    }

    // =========================================================================
    // Move and copy
    // =========================================================================

    /// Moves a view under `dst`. Moving to its current owner does nothing.
    ///
    /// # Errors
    ///
    /// Refused if `dst` already has a view with the same name; the view then
    /// stays where it was.
    pub fn move_view(&mut self, dst: GroupId, view: ViewId) -> Result<()> {
        let v = attempt!(self.view_ref(view));
        let (owner, name) = (v.owner, v.name.clone());
        let d = attempt!(self.group_ref(dst));
        if owner == dst {
            return Ok(());
        }
        if d.has_child_view(&name) {
            refuse!(Error::name_collision(d.name(), &name));
        }

        if let Some(d) = self.groups.get_mut(dst.0) {
            if d.views.insert(view, &name).is_err() {
                refuse!(Error::name_collision(d.name(), &name));
            }
        }
        if let Some(src) = self.groups.get_mut(owner.0) {
            if let Some(idx) = src.views.index_of(&name) {
                src.views.remove(idx);
            }
        }
        if let Some(v) = self.views.get_mut(view.handle()) {
            v.owner = dst;
        }
        debug!(view = %name, "view moved");
        Ok(())
    }

    /// Moves a group, with its subtree, under `dst`. Moving to its current
    /// parent does nothing.
    ///
    /// # Errors
    ///
    /// Refused for the root, for a destination inside the moved subtree, or
    /// if `dst` already has a group with the same name; the group then stays
    /// where it was.
    pub fn move_group(&mut self, dst: GroupId, group: GroupId) -> Result<()> {
        let g = attempt!(self.group_ref(group));
        let Some(parent) = g.parent else {
            refuse!(Error::illegal_state("the root group cannot be moved"));
        };
        let name = g.name.clone();
        let d = attempt!(self.group_ref(dst));
        if parent == dst {
            return Ok(());
        }
        if self.is_within(dst, group) {
            refuse!(Error::illegal_state(format!(
                "group '{name}' cannot be moved into its own subtree"
            )));
        }
        if d.has_child_group(&name) {
            refuse!(Error::name_collision(d.name(), &name));
        }

        if let Some(d) = self.groups.get_mut(dst.0) {
            if d.groups.insert(group, &name).is_err() {
                refuse!(Error::name_collision(d.name(), &name));
            }
        }
        self.unlink_group(group);
        if let Some(g) = self.groups.get_mut(group.0) {
            g.parent = Some(dst);
        }
        debug!(group = %name, "group moved");
        Ok(())
    }

    fn duplicate_view(&mut self, dst: GroupId, view: ViewId) -> Result<ViewId> {
        let v = self.view_ref(view)?;
        let (name, dtype, binding) = (v.name.clone(), v.dtype.clone(), v.binding.clone());
        let copy = self.insert_view(dst, &name)?;
        if let Binding::Buffer(idx) = binding {
            if let Some(b) = self.buffers.get_mut(idx) {
                b.attach_view(copy);
            }
        }
        if let Some(c) = self.views.get_mut(copy.handle()) {
            c.dtype = dtype;
            c.binding = binding;
        }
        Ok(copy)
    }

    fn duplicate_children(&mut self, from: GroupId, to: GroupId) -> Result<()> {
        let (groups, views): (Vec<GroupId>, Vec<ViewId>) = {
            let g = self.group_ref(from)?;
            (g.groups().collect(), g.views().collect())
        };
        for child in groups {
            let name = self.group_ref(child)?.name.clone();
            let copy = self.insert_group(to, &name)?;
            self.duplicate_children(child, copy)?;
        }
        for view in views {
            self.duplicate_view(to, view)?;
        }
        Ok(())
    }

    /// Copies a view under `dst`. The copy shares the original's memory: a
    /// buffer gains a view, external and persistent memory is pointed at
    /// again, and owned strings and scalars are cloned.
    ///
    /// # Errors
    ///
    /// Refused if `dst` already has a view with the same name.
    pub fn copy_view(&mut self, dst: GroupId, view: ViewId) -> Result<ViewId> {
        Ok(attempt!(self.duplicate_view(dst, view)))
    }

    /// Copies a group and its whole subtree under `dst`, sharing memory the
    /// way [`DataStore::copy_view`] does.
    ///
    /// # Errors
    ///
    /// Refused if `dst` already has a group with the same name, or lies
    /// inside the copied subtree.
    pub fn copy_group(&mut self, dst: GroupId, group: GroupId) -> Result<GroupId> {
        let name = attempt!(self.group_ref(group)).name.clone();
        attempt!(self.group_ref(dst));
        if self.is_within(dst, group) {
            refuse!(Error::illegal_state(format!(
                "group '{name}' cannot be copied into its own subtree"
            )));
        }
        let copy = attempt!(self.insert_group(dst, &name));
        if let Err(err) = self.duplicate_children(group, copy) {
            self.unlink_group(copy);
            self.release_group_tree(copy);
            refuse!(err);
        }
        debug!(group = %name, "group copied");
        Ok(copy)
    }

    // =========================================================================
    // Comparison and printing
    // =========================================================================

    /// Returns true if group `a` of this store and group `b` of `other` have
    /// the same name, equivalent views and equivalent subgroups, visited in
    /// canonical order on each side.
    #[must_use]
    pub fn groups_equivalent(&self, a: GroupId, other: &DataStore, b: GroupId) -> bool {
        let (Some(ga), Some(gb)) = (self.group(a), other.group(b)) else {
            return false;
        };
        ga.name == gb.name
            && ga.num_views() == gb.num_views()
            && ga.num_groups() == gb.num_groups()
            && ga.views().zip(gb.views()).all(|(va, vb)| {
                match (self.view(va), other.view(vb)) {
                    (Some(x), Some(y)) => x.is_equivalent_to(y),
                    _ => false,
                }
            })
            && ga
                .groups()
                .zip(gb.groups())
                .all(|(x, y)| self.groups_equivalent(x, other, y))
    }

    /// Renders the subtree below `group`, four spaces per level.
    ///
    /// # Errors
    ///
    /// Refused for a stale group id.
    pub fn render_tree(&self, group: GroupId) -> Result<String> {
        attempt!(self.group_ref(group));
        let mut out = String::new();
        self.write_tree(group, 0, &mut out);
        Ok(out)
    }

    fn write_tree(&self, group: GroupId, depth: usize, out: &mut String) {
        let Some(g) = self.group(group) else {
            return;
        };
        let indent = " ".repeat(depth * 4);
        let _ = writeln!(out, "{indent}Group {}", g.name);
        for view in g.views() {
            if let Some(v) = self.view(view) {
                let _ = writeln!(out, "{indent}    View {}", v.name);
            }
        }
        for child in g.groups() {
            self.write_tree(child, depth + 1, out);
        }
    }
}
