use std::collections::HashMap;

use super::{CollectionStore, IndexedCollection};
use crate::handle::Index;

/// Indexed storage plus a name → index map.
///
/// Indices stay fixed while an item is held, so callers can keep them
/// across unrelated insertions and removals. Names are unique.
#[derive(Debug, Clone)]
pub struct MapCollection<T> {
    items: IndexedCollection<T>,
    names: HashMap<String, Index>,
}

impl<T> Default for MapCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MapCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexedCollection::new(),
            names: HashMap::new(),
        }
    }
}

impl<T> CollectionStore<T> for MapCollection<T> {
    fn count(&self) -> usize {
        self.items.count()
    }

    fn first_valid_index(&self) -> Option<Index> {
        self.items.first_valid_index()
    }

    fn next_valid_index(&self, idx: Index) -> Option<Index> {
        self.items.next_valid_index(idx)
    }

    fn has(&self, idx: Index) -> bool {
        self.items.has(idx)
    }

    fn get(&self, idx: Index) -> Option<&T> {
        self.items.get(idx)
    }

    fn get_mut(&mut self, idx: Index) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    fn name_of(&self, idx: Index) -> Option<&str> {
        self.items.name_of(idx)
    }

    fn index_of(&self, name: &str) -> Option<Index> {
        self.names.get(name).copied()
    }

    fn insert(&mut self, item: T, name: &str) -> Result<Index, T> {
        if self.names.contains_key(name) {
            return Err(item);
        }
        let idx = self.items.insert(item, name)?;
        self.names.insert(name.to_owned(), idx);
        Ok(idx)
    }

    fn remove(&mut self, idx: Index) -> Option<T> {
        let name = self.items.name_of(idx)?;
        self.names.remove(name);
        self.items.remove(idx)
    }

    fn remove_by_name(&mut self, name: &str) -> Option<T> {
        let idx = self.names.remove(name)?;
        self.items.remove(idx)
    }

    fn remove_all(&mut self) -> Vec<T> {
        self.names.clear();
        self.items.remove_all()
    }
}
