//! MemoryHistoryStore: in-memory append-only history persistence
//!
//! Implements the HistoryStore trait using:
//! - `HashMap<String, Vec<HistoryRecord>>` keyed by history collection name
//! - `parking_lot::RwLock` for thread-safe access
//!
//! Records are only ever pushed; within one collection they appear in
//! append order. `clear` drops a whole collection, matching the
//! administrative-wipe contract. Read accessors exist for inspection and
//! tests; they return clones, never references into the locked map.

use std::collections::HashMap;

use parking_lot::RwLock;

use sediment_core::{HistoryRecord, HistoryStore, Result};

/// In-memory append-only history store
///
/// # Example
///
/// ```
/// use sediment_store::MemoryHistoryStore;
///
/// let store = MemoryHistoryStore::new();
/// assert!(store.records("people_history").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    collections: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl MemoryHistoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one collection's records, in append order
    pub fn records(&self, collection: &str) -> Vec<HistoryRecord> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of records in one collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// True when a collection holds no records
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Names of all collections that have received at least one append
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, collection: &str, record: HistoryRecord) -> Result<()> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn append_batch(&self, collection: &str, records: Vec<HistoryRecord>) -> Result<()> {
        // Single write lock: the whole batch lands atomically, in order.
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }

    fn clear(&self, collection: &str) -> Result<()> {
        self.collections.write().remove(collection);
        Ok(())
    }
}
