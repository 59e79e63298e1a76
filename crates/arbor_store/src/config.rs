//! Store configuration.

use arbor_foundation::CollectionKind;

/// Construction-time settings for a [`DataStore`](crate::DataStore).
///
/// The buffer registry is always an indexed collection; only the child
/// collections of groups are configurable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct StoreConfig {
    /// Strategy for each group's child views.
    pub view_collection: CollectionKind,
    /// Strategy for each group's child groups.
    pub group_collection: CollectionKind,
}

impl StoreConfig {
    /// Creates the default configuration (map collections everywhere).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strategy for child views.
    #[must_use]
    pub fn with_view_collection(mut self, kind: CollectionKind) -> Self {
        self.view_collection = kind;
        self
    }

    /// Sets the strategy for child groups.
    #[must_use]
    pub fn with_group_collection(mut self, kind: CollectionKind) -> Self {
        self.group_collection = kind;
        self
    }

    /// Uses one strategy for both child collections.
    #[must_use]
    pub fn with_collections(self, kind: CollectionKind) -> Self {
        self.with_view_collection(kind).with_group_collection(kind)
    }
}
