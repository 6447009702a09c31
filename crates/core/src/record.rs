//! History record types
//!
//! A history record is the immutable audit entry describing one mutation of
//! a record. The persisted wire shape is deliberately compact:
//!
//! - `t`: creation instant
//! - `o`: operation code (`"i"`, `"u"`, `"r"`)
//! - `d`: document snapshot, version marker stripped
//! - `diff`: optional mapping field -> prior value
//! - metadata keys flattened at the top level alongside the four above
//!
//! Records are created once inside a mutation hook, persisted once, and
//! never mutated or deleted afterwards. Wiping an entire audit trail is an
//! explicit administrative operation on the history store, not a per-record
//! one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;

/// Mutation kind described by a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// A new record was persisted
    #[serde(rename = "i")]
    Insert,
    /// An existing record was modified
    #[serde(rename = "u")]
    Update,
    /// A record was deleted
    #[serde(rename = "r")]
    Remove,
}

impl Operation {
    /// Single-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            Operation::Insert => "i",
            Operation::Update => "u",
            Operation::Remove => "r",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Immutable audit entry describing one mutation
///
/// `diff` is present only for diff-only single-document updates and for
/// bulk-update records. An update that changed nothing still produces a
/// record, with an empty (not omitted) diff: every intercepted mutation
/// yields exactly one history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Creation instant of the record
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    /// Operation kind
    #[serde(rename = "o")]
    pub operation: Operation,
    /// Snapshot of the record's state at the time of the operation
    #[serde(rename = "d")]
    pub document: Document,
    /// Field -> prior value, for the fields the detector judged changed
    #[serde(rename = "diff", default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Document>,
    /// Resolved caller-defined metadata, merged at the top level
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}
