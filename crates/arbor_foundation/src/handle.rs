//! Generational handles for arena-stored items.

use std::fmt;

/// Small-integer position in a collection.
///
/// Stable while the item it names is live; may be handed out again
/// once the item is removed.
pub type Index = usize;

/// Handle with a generation counter for stale reference detection.
///
/// The generation increments every time a slot is freed or reused, so a
/// handle kept past the destruction of its item never aliases whatever
/// later takes the slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handle {
    /// Slot index in the owning arena.
    pub index: u32,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl Handle {
    /// Creates a handle with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index as a `usize`.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}
