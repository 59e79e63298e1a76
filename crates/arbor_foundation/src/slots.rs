//! Generational slot arena.
//!
//! `Slots` owns items addressed by [`Handle`]. Freed slots go on a free
//! list and are reused, with the generation bumped so stale handles are
//! detected instead of silently resolving to a newer item.

// Allow u32 to usize casts - slot counts are bounded well below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use crate::handle::Handle;

#[derive(Debug, Clone)]
struct Slot<T> {
    /// Even generations are free, odd generations are alive.
    generation: u32,
    value: Option<T>,
}

/// Arena of items addressed by generational handles.
#[derive(Debug, Clone)]
pub struct Slots<T> {
    slots: Vec<Slot<T>>,
    /// Free list of indices available for reuse.
    free_list: Vec<u32>,
    /// Count of live items.
    live_count: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slots<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live_count: 0,
        }
    }

    /// Stores a value and returns its handle.
    ///
    /// Reuses indices from the free list when available.
    pub fn insert(&mut self, value: T) -> Handle {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            // Was even/free, now odd/alive
            slot.generation += 1;
            slot.value = Some(value);
            Handle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Handle::new(index, 1)
        }
    }

    /// Removes and returns the value behind a handle.
    ///
    /// Returns `None` if the handle is stale or was never issued.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        let slot = &mut self.slots[handle.slot()];
        // Was odd/alive, now even/free
        slot.generation += 1;
        self.free_list.push(handle.index);
        self.live_count -= 1;
        slot.value.take()
    }

    /// Checks if a handle refers to a live item.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.slot())
            .is_some_and(|slot| slot.generation == handle.generation && slot.generation % 2 == 1)
    }

    /// Returns the value behind a handle.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.slot())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Returns the value behind a handle mutably.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.slot())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Returns the number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over all live items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(idx as u32, slot.generation), value))
        })
    }
}
