use super::{CollectionStore, Entry};
use crate::handle::Index;

/// Dense slot array with LIFO reuse of freed indices.
///
/// Names are stored with each item but not indexed; name lookups scan.
#[derive(Debug, Clone)]
pub struct IndexedCollection<T> {
    slots: Vec<Option<Entry<T>>>,
    /// Freed indices, reused last-in first-out.
    free_ids: Vec<Index>,
    count: usize,
}

impl<T> Default for IndexedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_ids: Vec::new(),
            count: 0,
        }
    }

    /// Index the next plain `insert` will use.
    #[must_use]
    pub fn valid_empty_index(&self) -> Index {
        self.free_ids.last().copied().unwrap_or(self.slots.len())
    }

    /// Inserts an item at a caller-chosen index.
    ///
    /// Slots skipped over while growing become free and are reused later.
    ///
    /// # Errors
    ///
    /// Hands the item back if the slot is occupied.
    pub fn insert_at(&mut self, item: T, name: &str, idx: Index) -> Result<Index, T> {
        if self.has(idx) {
            return Err(item);
        }
        if idx >= self.slots.len() {
            let old_len = self.slots.len();
            self.slots.resize_with(idx + 1, || None);
            // Newly opened holes below idx are reusable.
            self.free_ids.extend((old_len..idx).rev());
        } else {
            self.free_ids.retain(|&free| free != idx);
        }
        self.slots[idx] = Some(Entry {
            name: name.to_owned(),
            item,
        });
        self.count += 1;
        Ok(idx)
    }

    /// Number of slots, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn scan_from(&self, start: Index) -> Option<Index> {
        (start..self.slots.len()).find(|&idx| self.slots[idx].is_some())
    }
}

impl<T> CollectionStore<T> for IndexedCollection<T> {
    fn count(&self) -> usize {
        self.count
    }

    fn first_valid_index(&self) -> Option<Index> {
        self.scan_from(0)
    }

    fn next_valid_index(&self, idx: Index) -> Option<Index> {
        self.scan_from(idx.checked_add(1)?)
    }

    fn has(&self, idx: Index) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    fn get(&self, idx: Index) -> Option<&T> {
        self.slots.get(idx)?.as_ref().map(|entry| &entry.item)
    }

    fn get_mut(&mut self, idx: Index) -> Option<&mut T> {
        self.slots.get_mut(idx)?.as_mut().map(|entry| &mut entry.item)
    }

    fn name_of(&self, idx: Index) -> Option<&str> {
        self.slots.get(idx)?.as_ref().map(|entry| entry.name.as_str())
    }

    fn index_of(&self, name: &str) -> Option<Index> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|entry| entry.name == name))
    }

    fn insert(&mut self, item: T, name: &str) -> Result<Index, T> {
        let entry = Some(Entry {
            name: name.to_owned(),
            item,
        });
        let idx = if let Some(idx) = self.free_ids.pop() {
            self.slots[idx] = entry;
            idx
        } else {
            self.slots.push(entry);
            self.slots.len() - 1
        };
        self.count += 1;
        Ok(idx)
    }

    fn remove(&mut self, idx: Index) -> Option<T> {
        let entry = self.slots.get_mut(idx)?.take()?;
        self.free_ids.push(idx);
        self.count -= 1;
        Some(entry.item)
    }

    fn remove_all(&mut self) -> Vec<T> {
        let items = self
            .slots
            .drain(..)
            .flatten()
            .map(|entry| entry.item)
            .collect();
        self.free_ids.clear();
        self.count = 0;
        items
    }
}
