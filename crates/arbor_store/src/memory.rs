//! Memory sources that back buffers and views.
//!
//! The store never decides how memory is obtained. Buffers call into an
//! [`Allocator`]; views may instead point at caller-owned [`SharedBlock`]s or
//! at regions of a [`PersistentStore`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use arbor_foundation::{Error, ErrorKind, Result};

// =============================================================================
// Allocator
// =============================================================================

/// Backing allocator for buffer memory.
pub trait Allocator: fmt::Debug + Send + Sync {
    /// Returns a zeroed block of `bytes` bytes.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the request cannot be met.
    fn allocate(&self, bytes: usize) -> Result<Vec<u8>>;

    /// Resizes a block in place, preserving its first `min(old, new)` bytes.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the request cannot be met. The block
    /// is left untouched in that case.
    fn reallocate(&self, block: &mut Vec<u8>, new_bytes: usize) -> Result<()>;

    /// Returns a block to the allocator.
    fn deallocate(&self, block: Vec<u8>);
}

/// Heap allocator with live-byte accounting and an optional cap.
#[derive(Debug, Default)]
pub struct HeapAllocator {
    live_bytes: AtomicUsize,
    live_blocks: AtomicUsize,
    limit: Option<usize>,
}

impl HeapAllocator {
    /// Creates an allocator without a cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that refuses to hold more than `limit` bytes.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Bytes currently handed out.
    #[must_use]
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Blocks currently handed out.
    #[must_use]
    pub fn live_blocks(&self) -> usize {
        self.live_blocks.load(Ordering::Relaxed)
    }

    fn check_limit(&self, extra: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            let wanted = self.live_bytes().saturating_add(extra);
            if wanted > limit {
                return Err(Error::new(ErrorKind::Allocation(format!(
                    "request for {extra} bytes exceeds limit of {limit} ({} in use)",
                    self.live_bytes()
                ))));
            }
        }
        Ok(())
    }
}

impl Allocator for HeapAllocator {
    fn allocate(&self, bytes: usize) -> Result<Vec<u8>> {
        self.check_limit(bytes)?;
        let mut block = Vec::new();
        block.try_reserve_exact(bytes).map_err(|e| {
            Error::new(ErrorKind::Allocation(format!(
                "cannot allocate {bytes} bytes: {e}"
            )))
        })?;
        block.resize(bytes, 0);
        self.live_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.live_blocks.fetch_add(1, Ordering::Relaxed);
        Ok(block)
    }

    fn reallocate(&self, block: &mut Vec<u8>, new_bytes: usize) -> Result<()> {
        let old_bytes = block.len();
        if new_bytes > old_bytes {
            let extra = new_bytes - old_bytes;
            self.check_limit(extra)?;
            block.try_reserve_exact(extra).map_err(|e| {
                Error::new(ErrorKind::Allocation(format!(
                    "cannot grow block to {new_bytes} bytes: {e}"
                )))
            })?;
            self.live_bytes.fetch_add(extra, Ordering::Relaxed);
        } else {
            self.live_bytes.fetch_sub(old_bytes - new_bytes, Ordering::Relaxed);
        }
        block.resize(new_bytes, 0);
        Ok(())
    }

    fn deallocate(&self, block: Vec<u8>) {
        self.live_bytes.fetch_sub(block.len(), Ordering::Relaxed);
        self.live_blocks.fetch_sub(1, Ordering::Relaxed);
    }
}

// =============================================================================
// Shared blocks
// =============================================================================

/// Caller-owned memory that views can point at.
///
/// Cloning shares the same bytes. A view bound to a block holds one clone
/// and never frees the memory; it lives as long as any holder keeps it.
#[derive(Clone, Debug, Default)]
pub struct SharedBlock(Arc<RwLock<Vec<u8>>>);

impl SharedBlock {
    /// Wraps existing bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(RwLock::new(bytes)))
    }

    /// Creates a zeroed block.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true for a zero-length block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks the bytes for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<u8>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the bytes for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<u8>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies the bytes out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.read().clone()
    }

    /// Returns true if both handles share the same memory.
    #[must_use]
    pub fn ptr_eq(&self, other: &SharedBlock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// =============================================================================
// Persistent store
// =============================================================================

/// Named, externally managed regions that can back a view directly.
pub trait PersistentStore: fmt::Debug + Send + Sync {
    /// Returns the region stored under `key`, creating a zeroed region of
    /// `bytes` bytes if none exists.
    ///
    /// # Errors
    ///
    /// Returns a persistent-store error if the region cannot be provided.
    fn bind(&self, key: &str, bytes: usize) -> Result<SharedBlock>;

    /// Size in bytes of the region under `key`.
    fn size(&self, key: &str) -> Option<usize>;

    /// Resizes the region under `key` in place, preserving leading bytes.
    ///
    /// # Errors
    ///
    /// Returns a persistent-store error if no such region exists.
    fn resize(&self, key: &str, bytes: usize) -> Result<()>;

    /// Discards the region under `key`.
    fn release(&self, key: &str);
}

/// Process-local persistent store keeping regions in a map.
#[derive(Debug, Default)]
pub struct MemoryPersistentStore {
    regions: Mutex<HashMap<String, SharedBlock>>,
}

impl MemoryPersistentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a region is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl PersistentStore for MemoryPersistentStore {
    fn bind(&self, key: &str, bytes: usize) -> Result<SharedBlock> {
        if key.is_empty() {
            return Err(Error::new(ErrorKind::Persistent(
                "region key must not be empty".to_owned(),
            )));
        }
        let mut regions = self.regions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(regions
            .entry(key.to_owned())
            .or_insert_with(|| SharedBlock::zeroed(bytes))
            .clone())
    }

    fn size(&self, key: &str) -> Option<usize> {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(SharedBlock::len)
    }

    fn resize(&self, key: &str, bytes: usize) -> Result<()> {
        let regions = self.regions.lock().unwrap_or_else(PoisonError::into_inner);
        let block = regions.get(key).ok_or_else(|| {
            Error::new(ErrorKind::Persistent(format!("no region named '{key}'")))
        })?;
        block.write().resize(bytes, 0);
        Ok(())
    }

    fn release(&self, key: &str) {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
