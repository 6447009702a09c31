//! Core types and traits for Sediment
//!
//! This crate defines the foundational pieces of the change-auditing engine:
//! - Document / Filter: snapshot and predicate types over opaque field values
//! - change: the unified change-detection rules and diff derivation
//! - HistoryRecord / Operation: the immutable audit entry and its wire shape
//! - AuditConfig / MetadataField: explicit engine configuration
//! - naming: deterministic history collection naming
//! - Error: the audit error taxonomy
//! - traits: HistoryStore, RecordSource, MutationInterceptor seams

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod change;
pub mod config;
pub mod document;
pub mod error;
pub mod naming;
pub mod record;
pub mod traits;

// Field values are opaque JSON values; re-export the type callers hand us
pub use serde_json::Value;

// Re-export commonly used types and traits
pub use change::{compute_diff, is_changed};
pub use config::{AuditConfig, CustomDiff, FallibleMetadataFn, MetadataField, MetadataFn, MetadataSource};
pub use document::{Document, Filter, ID_FIELD, VERSION_FIELD};
pub use error::{Error, Result};
pub use naming::{history_collection_name, HISTORY_SUFFIX};
pub use record::{HistoryRecord, Operation};
pub use traits::{HistoryStore, MutationInterceptor, RecordSource};
