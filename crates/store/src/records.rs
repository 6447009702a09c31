//! MemoryRecordStore: a minimal audited record store
//!
//! A process-local stand-in for the external record store the audit engine
//! attaches to. It exists for integration tests and as the wiring reference
//! for real adapters: every mutation returns the stored snapshot so the
//! caller can drive the matching interceptor hook after the mutation
//! committed.
//!
//! Conventions:
//! - `_id`: store-assigned identifier (uuid v4 string unless supplied)
//! - `_version`: optimistic version marker, 1 on insert, bumped on save
//!
//! All returned documents are independent snapshots.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::{json, Value};
use uuid::Uuid;

use sediment_core::{Document, Filter, RecordSource, Result, ID_FIELD, VERSION_FIELD};

/// In-memory record store with uuid identifiers and version markers
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    rows: RwLock<BTreeMap<String, Document>>,
}

impl MemoryRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record
    ///
    /// Assigns `_id` (unless the document carries one) and `_version = 1`.
    /// Returns the stored snapshot.
    pub fn insert(&self, mut doc: Document) -> Document {
        let id = match doc.id().and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                doc.set(ID_FIELD, json!(id));
                id
            }
        };
        doc.set(VERSION_FIELD, json!(1));
        self.rows.write().insert(id, doc.clone());
        doc
    }

    /// Snapshot of one record by identifier
    pub fn find(&self, id: &str) -> Option<Document> {
        self.rows.read().get(id).cloned()
    }

    /// Snapshots of all records, in identifier order
    pub fn find_all(&self) -> Vec<Document> {
        self.rows.read().values().cloned().collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Save a modified record
    ///
    /// Requires `_id` to reference a stored record; bumps `_version` and
    /// returns the stored snapshot, or None when the record is unknown.
    pub fn save(&self, doc: &Document) -> Option<Document> {
        let id = doc.id().and_then(Value::as_str)?.to_string();
        let mut rows = self.rows.write();
        let current_version = rows
            .get(&id)?
            .get(VERSION_FIELD)
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let mut stored = doc.clone();
        stored.set(VERSION_FIELD, json!(current_version + 1));
        rows.insert(id, stored.clone());
        Some(stored)
    }

    /// Remove a record, returning its final snapshot
    pub fn remove(&self, id: &str) -> Option<Document> {
        self.rows.write().remove(id)
    }

    /// Apply field assignments to every record matching the filter
    ///
    /// Bumps each affected record's version. Returns the number of records
    /// modified.
    pub fn update_many(&self, filter: &Filter, assignments: &Document) -> usize {
        let mut rows = self.rows.write();
        let mut modified = 0;

        for doc in rows.values_mut() {
            if !filter.matches(doc) {
                continue;
            }
            for (field, value) in assignments.iter() {
                doc.set(field.clone(), value.clone());
            }
            let version = doc.get(VERSION_FIELD).and_then(Value::as_i64).unwrap_or(0);
            doc.set(VERSION_FIELD, json!(version + 1));
            modified += 1;
        }

        modified
    }
}

impl RecordSource for MemoryRecordStore {
    fn find_matching(&self, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }
}
