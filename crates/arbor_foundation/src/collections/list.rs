use super::{CollectionStore, Entry};
use crate::handle::Index;

/// Insertion-ordered list.
///
/// Every insert takes a fresh index, so indices are never reused and the
/// ascending index order is also the insertion order.
#[derive(Debug, Clone)]
pub struct ListCollection<T> {
    /// Entries in insertion order, sorted by index.
    entries: Vec<(Index, Entry<T>)>,
    next_index: Index,
}

impl<T> Default for ListCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListCollection<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_index: 0,
        }
    }

    fn position(&self, idx: Index) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&idx, |(i, _)| *i)
    }
}

impl<T> CollectionStore<T> for ListCollection<T> {
    fn count(&self) -> usize {
        self.entries.len()
    }

    fn first_valid_index(&self) -> Option<Index> {
        self.entries.first().map(|(idx, _)| *idx)
    }

    fn next_valid_index(&self, idx: Index) -> Option<Index> {
        let pos = match self.position(idx) {
            Ok(pos) => pos + 1,
            Err(pos) => pos,
        };
        self.entries.get(pos).map(|(idx, _)| *idx)
    }

    fn get(&self, idx: Index) -> Option<&T> {
        let pos = self.position(idx).ok()?;
        Some(&self.entries[pos].1.item)
    }

    fn get_mut(&mut self, idx: Index) -> Option<&mut T> {
        let pos = self.position(idx).ok()?;
        Some(&mut self.entries[pos].1.item)
    }

    fn name_of(&self, idx: Index) -> Option<&str> {
        let pos = self.position(idx).ok()?;
        Some(self.entries[pos].1.name.as_str())
    }

    fn index_of(&self, name: &str) -> Option<Index> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.name == name)
            .map(|(idx, _)| *idx)
    }

    fn insert(&mut self, item: T, name: &str) -> Result<Index, T> {
        let idx = self.next_index;
        self.next_index += 1;
        self.entries.push((
            idx,
            Entry {
                name: name.to_owned(),
                item,
            },
        ));
        Ok(idx)
    }

    fn remove(&mut self, idx: Index) -> Option<T> {
        let pos = self.position(idx).ok()?;
        Some(self.entries.remove(pos).1.item)
    }

    fn remove_all(&mut self) -> Vec<T> {
        self.entries.drain(..).map(|(_, entry)| entry.item).collect()
    }
}
