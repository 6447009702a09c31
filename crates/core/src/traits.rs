//! Core traits for the audit engine's external seams
//!
//! This module defines the boundaries the engine calls across:
//! - `HistoryStore`: append-only persistence for history records
//! - `RecordSource`: the snapshot query the bulk coordinator needs
//! - `MutationInterceptor`: the per-operation-kind hook contract the calling
//!   code drives around its own mutations
//!
//! Thread safety: all trait methods must be safe to call concurrently from
//! multiple mutation hooks (hence `Send + Sync`). Concurrent history appends
//! for different records never conflict; appends for the same record are
//! each independently valid points in its history.

use crate::document::{Document, Filter};
use crate::error::Result;
use crate::record::HistoryRecord;

/// Append-only persistence for history records
///
/// Keyed by a history collection name derived from the source collection
/// (see [`naming`](crate::naming)). Implementations never update or delete
/// individual records; `clear` wipes a whole collection and exists only for
/// explicit administrative use.
pub trait HistoryStore: Send + Sync {
    /// Append one history record to a collection
    ///
    /// # Errors
    ///
    /// Returns [`Persistence`](crate::Error::Persistence) when the write is
    /// rejected. The error propagates to the caller of the mutation hook;
    /// nothing is retried.
    fn append(&self, collection: &str, record: HistoryRecord) -> Result<()>;

    /// Append a batch of history records to a collection as one insert
    ///
    /// Used by the bulk-update path: one record per affected document,
    /// persisted together.
    ///
    /// # Errors
    ///
    /// Returns [`Persistence`](crate::Error::Persistence) when the write is
    /// rejected. A failed batch writes nothing.
    fn append_batch(&self, collection: &str, records: Vec<HistoryRecord>) -> Result<()>;

    /// Delete every record of one history collection
    ///
    /// Administrative operation; the only sanctioned deletion in the system.
    ///
    /// # Errors
    ///
    /// Returns [`Persistence`](crate::Error::Persistence) when the store
    /// rejects the wipe.
    fn clear(&self, collection: &str) -> Result<()>;
}

/// Snapshot query over the audited record store
///
/// The bulk coordinator uses this to capture the point-in-time state of
/// every record matching a filter, strictly before the bulk mutation runs.
/// Returned documents must be independent snapshots, never live references.
pub trait RecordSource: Send + Sync {
    /// Return snapshots of all records currently matching `filter`
    ///
    /// # Errors
    ///
    /// Returns [`Snapshot`](crate::Error::Snapshot) when the query fails;
    /// the bulk audit is then skipped (the mutation itself is unaffected).
    fn find_matching(&self, filter: &Filter) -> Result<Vec<Document>>;
}

/// Per-operation-kind mutation hook contract
///
/// The calling code wraps its own mutation calls: it captures the "before"
/// snapshot strictly prior to mutating, performs the mutation, and invokes
/// the matching hook only after the mutation has committed. A mutation that
/// never commits must not produce a history record; a hook failure must not
/// roll the mutation back.
pub trait MutationInterceptor: Send + Sync {
    /// A new record was inserted. No prior state exists.
    ///
    /// # Errors
    ///
    /// Propagates resolution and persistence failures to the caller.
    fn on_insert(&self, collection: &str, new_doc: &Document) -> Result<()>;

    /// A loaded record was updated and saved
    ///
    /// `before` is the snapshot captured when the record was loaded, prior
    /// to any field mutation. In diff-only mode the detector runs per field
    /// of `after` against it; with no prior snapshot available, every field
    /// of `after` is reported changed with a null prior value.
    ///
    /// # Errors
    ///
    /// Propagates comparison, resolution and persistence failures.
    fn on_update(&self, collection: &str, before: Option<&Document>, after: &Document)
        -> Result<()>;

    /// A filter-based update ran without loading the record first
    ///
    /// Only the operation's declared field assignments are known; they are
    /// stored as the record's document. This is a weaker guarantee than the
    /// load-then-save path: the snapshot is partial and no diff can be
    /// computed.
    ///
    /// # Errors
    ///
    /// Propagates resolution and persistence failures.
    fn on_filter_update(&self, collection: &str, assignments: &Document) -> Result<()>;

    /// A record was removed
    ///
    /// Captures the full prior state; the record's entire prior existence is
    /// the meaningful delta, so no diff is attached.
    ///
    /// # Errors
    ///
    /// Propagates resolution and persistence failures.
    fn on_remove(&self, collection: &str, doc: &Document) -> Result<()>;
}
