//! Sediment - embedded change auditing for record stores
//!
//! Sediment attaches to a record store's mutation lifecycle and appends an
//! immutable, timestamped history record for every insert, update, remove
//! and bulk update, optionally reduced to a field-level diff and enriched
//! with caller-supplied metadata.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sediment::{AuditConfig, Auditor, Document, MemoryHistoryStore, MutationInterceptor};
//! use serde_json::json;
//!
//! let history = Arc::new(MemoryHistoryStore::new());
//! let auditor = Auditor::new(AuditConfig::new().with_diff_only(true), history.clone()).unwrap();
//!
//! // The caller performs its own mutation, then drives the hook.
//! let doc = Document::from_value(json!({"name": "Ann", "age": 30})).unwrap();
//! auditor.on_insert("people", &doc).unwrap();
//!
//! assert_eq!(history.len("people_history"), 1);
//! ```
//!
//! # Architecture
//!
//! The caller wraps its own mutation calls (decorator pattern): it captures
//! "before" snapshots prior to mutating, performs the mutation, and invokes
//! the matching [`MutationInterceptor`] hook once the mutation committed.
//! Bulk updates go through [`Auditor::bulk`], which snapshots the matching
//! records before the mutation and reports audit failures through a side
//! channel instead of the mutation result.

// Re-export the public API from the member crates
pub use sediment_core::{
    change, compute_diff, history_collection_name, is_changed, naming, AuditConfig, CustomDiff,
    Document, Error, Filter, HistoryRecord, HistoryStore, MetadataField, MetadataSource,
    MutationInterceptor, Operation, RecordSource, Result, Value, HISTORY_SUFFIX, ID_FIELD,
    VERSION_FIELD,
};
pub use sediment_engine::{
    Auditor, BulkAuditFailure, BulkAuditReport, BulkSnapshotCoordinator, HistoryRecordBuilder,
};
pub use sediment_store::{MemoryHistoryStore, MemoryRecordStore};
