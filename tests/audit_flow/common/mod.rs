//! Shared test utilities for the audit flow suites.
//!
//! Import via `mod common;` from the suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

use sediment::{
    AuditConfig, Auditor, Document, Filter, HistoryRecord, MemoryHistoryStore, MemoryRecordStore,
    Value,
};
use serde_json::json;

pub use sediment::{MutationInterceptor, Operation};

/// Build a Document from a JSON object literal
pub fn doc(value: serde_json::Value) -> Document {
    Document::from_value(value).expect("test documents are object literals")
}

/// A record store with an auditor wired around its mutations
///
/// The helper methods follow the decorator protocol: capture before state,
/// mutate, then drive the matching hook only after the mutation committed.
pub struct Harness {
    pub records: MemoryRecordStore,
    pub history: Arc<MemoryHistoryStore>,
    pub auditor: Auditor,
}

impl Harness {
    pub fn new(config: AuditConfig) -> Self {
        let history = Arc::new(MemoryHistoryStore::new());
        let auditor = Auditor::new(config, history.clone()).expect("valid test config");
        Harness {
            records: MemoryRecordStore::new(),
            history,
            auditor,
        }
    }

    pub fn diff_only() -> Self {
        Self::new(AuditConfig::new().with_diff_only(true))
    }

    /// Insert a document and audit it; returns the stored snapshot
    pub fn insert(&self, collection: &str, document: Document) -> Document {
        let stored = self.records.insert(document);
        self.auditor
            .on_insert(collection, &stored)
            .expect("insert audit");
        stored
    }

    /// Load a record, apply `change`, save, audit; returns the new snapshot
    pub fn update(&self, collection: &str, id: &str, change: impl FnOnce(&mut Document)) -> Document {
        // Before-snapshot captured at load time, strictly before mutating.
        let before = self.records.find(id).expect("record exists");
        let mut after = before.clone();
        change(&mut after);
        let saved = self.records.save(&after).expect("record exists");
        self.auditor
            .on_update(collection, Some(&before), &saved)
            .expect("update audit");
        saved
    }

    /// Remove a record and audit it; returns the final snapshot
    pub fn remove(&self, collection: &str, id: &str) -> Document {
        let gone = self.records.remove(id).expect("record exists");
        self.auditor
            .on_remove(collection, &gone)
            .expect("remove audit");
        gone
    }

    /// All history records for a source collection, in append order
    pub fn trail(&self, collection: &str) -> Vec<HistoryRecord> {
        self.history
            .records(&self.auditor.history_collection_for(collection))
    }
}

/// Extract a record's string identifier
pub fn id_of(document: &Document) -> String {
    document
        .id()
        .and_then(Value::as_str)
        .expect("store-assigned id")
        .to_string()
}

/// Shorthand for an equality filter on one field
pub fn filter_eq(field: &str, value: serde_json::Value) -> Filter {
    Filter::new().eq(field, value)
}

/// A three-person fixture used by the bulk suites
pub fn seed_people(harness: &Harness) -> (String, String, String) {
    let a = harness.insert("people", doc(json!({"name": "Ann", "status": "active"})));
    let b = harness.insert("people", doc(json!({"name": "Bob", "status": "active"})));
    let c = harness.insert("people", doc(json!({"name": "Cyd", "status": "archived"})));
    (id_of(&a), id_of(&b), id_of(&c))
}
