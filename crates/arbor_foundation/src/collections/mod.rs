//! Item collections addressed by stable index and by name.
//!
//! Groups keep their child views and child groups in one of three
//! interchangeable strategies, and the store keeps its buffer registry in
//! another. All of them implement [`CollectionStore`], whose only iteration
//! primitive is `first_valid_index` / `next_valid_index`.
//!
//! | Strategy | Index reuse | Name lookup | Iteration order |
//! |----------|-------------|-------------|-----------------|
//! | [`IndexedCollection`] | LIFO free list | linear scan | ascending index |
//! | [`MapCollection`] | LIFO free list | hashed | ascending index |
//! | [`ListCollection`] | never | linear scan | insertion |

mod indexed;
mod list;
mod map;

use std::marker::PhantomData;

pub use indexed::IndexedCollection;
pub use list::ListCollection;
pub use map::MapCollection;

use crate::handle::Index;

/// A named item slot shared by all strategies.
#[derive(Debug, Clone)]
struct Entry<T> {
    name: String,
    item: T,
}

/// Common contract of all collection strategies.
///
/// Lookups by a stale or out-of-range index are a miss, never a panic:
/// indices are recycled, so holding one past its item's removal is an
/// expected situation.
pub trait CollectionStore<T> {
    /// Number of items currently held.
    fn count(&self) -> usize;

    /// Returns true if the collection holds no items.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Index of the first live item in canonical order.
    fn first_valid_index(&self) -> Option<Index>;

    /// Index of the live item following `idx` in canonical order.
    ///
    /// `idx` need not be live itself.
    fn next_valid_index(&self, idx: Index) -> Option<Index>;

    /// Returns true if `idx` names a live item.
    fn has(&self, idx: Index) -> bool {
        self.get(idx).is_some()
    }

    /// Returns true if an item is held under `name`.
    fn has_name(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Item at `idx`.
    fn get(&self, idx: Index) -> Option<&T>;

    /// Item at `idx`, mutably.
    fn get_mut(&mut self, idx: Index) -> Option<&mut T>;

    /// Item held under `name`.
    fn get_by_name(&self, name: &str) -> Option<&T> {
        self.index_of(name).and_then(|idx| self.get(idx))
    }

    /// Name the item at `idx` was inserted under.
    fn name_of(&self, idx: Index) -> Option<&str>;

    /// Index of the item held under `name`.
    fn index_of(&self, name: &str) -> Option<Index>;

    /// Inserts an item and returns its index.
    ///
    /// # Errors
    ///
    /// Hands the item back if the strategy refuses it.
    fn insert(&mut self, item: T, name: &str) -> Result<Index, T>;

    /// Detaches and returns the item at `idx`.
    fn remove(&mut self, idx: Index) -> Option<T>;

    /// Detaches and returns the item held under `name`.
    fn remove_by_name(&mut self, name: &str) -> Option<T> {
        let idx = self.index_of(name)?;
        self.remove(idx)
    }

    /// Detaches every item, in canonical order, and resets index recycling.
    fn remove_all(&mut self) -> Vec<T>;

    /// Iterates `(index, item)` pairs in canonical order.
    fn iter(&self) -> Iter<'_, T, Self>
    where
        Self: Sized,
    {
        Iter {
            collection: self,
            next: self.first_valid_index(),
            _item: PhantomData,
        }
    }
}

/// Canonical-order iterator built on `first_valid_index`/`next_valid_index`.
pub struct Iter<'a, T, C: ?Sized> {
    collection: &'a C,
    next: Option<Index>,
    _item: PhantomData<&'a T>,
}

impl<'a, T: 'a, C: CollectionStore<T> + ?Sized> Iterator for Iter<'a, T, C> {
    type Item = (Index, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        self.next = self.collection.next_valid_index(idx);
        self.collection.get(idx).map(|item| (idx, item))
    }
}

/// Strategy selector for [`ItemCollection`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionKind {
    /// Dense array with free-list reuse.
    Indexed,
    /// Dense array plus a name index.
    #[default]
    Map,
    /// Insertion-ordered list.
    List,
}

/// A collection whose strategy is picked at construction time.
#[derive(Debug, Clone)]
pub enum ItemCollection<T> {
    /// Indexed strategy.
    Indexed(IndexedCollection<T>),
    /// Map strategy.
    Map(MapCollection<T>),
    /// List strategy.
    List(ListCollection<T>),
}

impl<T> ItemCollection<T> {
    /// Creates an empty collection of the given kind.
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Indexed => Self::Indexed(IndexedCollection::new()),
            CollectionKind::Map => Self::Map(MapCollection::new()),
            CollectionKind::List => Self::List(ListCollection::new()),
        }
    }

    /// The strategy in use.
    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Indexed(_) => CollectionKind::Indexed,
            Self::Map(_) => CollectionKind::Map,
            Self::List(_) => CollectionKind::List,
        }
    }
}

impl<T> Default for ItemCollection<T> {
    fn default() -> Self {
        Self::new(CollectionKind::default())
    }
}

macro_rules! dispatch {
    ($self:ident, $c:ident => $body:expr) => {
        match $self {
            ItemCollection::Indexed($c) => $body,
            ItemCollection::Map($c) => $body,
            ItemCollection::List($c) => $body,
        }
    };
}

impl<T> CollectionStore<T> for ItemCollection<T> {
    fn count(&self) -> usize {
        dispatch!(self, c => c.count())
    }

    fn first_valid_index(&self) -> Option<Index> {
        dispatch!(self, c => c.first_valid_index())
    }

    fn next_valid_index(&self, idx: Index) -> Option<Index> {
        dispatch!(self, c => c.next_valid_index(idx))
    }

    fn has(&self, idx: Index) -> bool {
        dispatch!(self, c => c.has(idx))
    }

    fn has_name(&self, name: &str) -> bool {
        dispatch!(self, c => c.has_name(name))
    }

    fn get(&self, idx: Index) -> Option<&T> {
        dispatch!(self, c => c.get(idx))
    }

    fn get_mut(&mut self, idx: Index) -> Option<&mut T> {
        dispatch!(self, c => c.get_mut(idx))
    }

    fn get_by_name(&self, name: &str) -> Option<&T> {
        dispatch!(self, c => c.get_by_name(name))
    }

    fn name_of(&self, idx: Index) -> Option<&str> {
        dispatch!(self, c => c.name_of(idx))
    }

    fn index_of(&self, name: &str) -> Option<Index> {
        dispatch!(self, c => c.index_of(name))
    }

    fn insert(&mut self, item: T, name: &str) -> Result<Index, T> {
        dispatch!(self, c => c.insert(item, name))
    }

    fn remove(&mut self, idx: Index) -> Option<T> {
        dispatch!(self, c => c.remove(idx))
    }

    fn remove_by_name(&mut self, name: &str) -> Option<T> {
        dispatch!(self, c => c.remove_by_name(name))
    }

    fn remove_all(&mut self) -> Vec<T> {
        dispatch!(self, c => c.remove_all())
    }
}
