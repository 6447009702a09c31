//! Bulk-update auditing
//!
//! A bulk update matches many records through a filter; no single in-memory
//! "before" record exists per document. The coordinator reconstructs one
//! history record per affected document from exactly two inputs:
//!
//! 1. the point-in-time snapshot set, queried strictly before the mutation
//! 2. the update's declared field assignments
//!
//! Nothing is re-read from the store after the mutation: a post-mutation
//! read has no ordering guarantee relative to the bulk write and can observe
//! drifted or partially-applied state.
//!
//! ## Failure side channel
//!
//! The bulk mutation must not be blocked or failed by the audit path, so
//! audit failures never surface through the mutation result. They are
//! collected in a [`BulkAuditReport`] and logged via `tracing::warn!`. A
//! metadata or comparison failure drops only the affected record; the rest
//! of the batch still persists.

use serde_json::Value;

use tracing::warn;

use sediment_core::{
    is_changed, Document, Error, Filter, HistoryRecord, Operation, RecordSource, Result,
};

use crate::builder::HistoryRecordBuilder;
use crate::interceptor::Auditor;

/// One dropped history record in a bulk audit
#[derive(Debug)]
pub struct BulkAuditFailure {
    /// Identifier of the affected document, when known
    pub id: Option<Value>,
    /// What went wrong
    pub error: Error,
}

/// Outcome of the audit side of one bulk update
///
/// `matched` counts the snapshot set, `written` the history records that
/// actually persisted. The two differ exactly when `failures` is non-empty.
#[derive(Debug, Default)]
pub struct BulkAuditReport {
    /// Number of records in the pre-mutation snapshot set
    pub matched: usize,
    /// Number of history records persisted
    pub written: usize,
    /// Per-record and batch-level audit failures
    pub failures: Vec<BulkAuditFailure>,
}

impl BulkAuditReport {
    /// True when every snapshotted record produced a persisted history record
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Audits filter-based multi-document updates
///
/// Borrowed from an [`Auditor`]; see [`Auditor::bulk`].
#[derive(Clone, Copy)]
pub struct BulkSnapshotCoordinator<'a> {
    auditor: &'a Auditor,
}

impl Auditor {
    /// Bulk-update coordinator over this auditor's configuration and store
    pub fn bulk(&self) -> BulkSnapshotCoordinator<'_> {
        BulkSnapshotCoordinator { auditor: self }
    }
}

impl BulkSnapshotCoordinator<'_> {
    /// Audit a bulk update
    ///
    /// Snapshots all records matching `filter` from `source`, runs the
    /// caller's `mutate` closure (the actual bulk mutation), then builds and
    /// batch-persists one history record per snapshotted document. Each
    /// record's diff compares the assignment set against the snapshotted
    /// values; its document is the snapshot with the assignments applied.
    /// Every bulk record carries a diff, possibly empty.
    ///
    /// # Errors
    ///
    /// Only the mutation's own error is ever returned. When `mutate` fails,
    /// no history is written. Audit failures are reported in the
    /// [`BulkAuditReport`] and logged, never raised.
    pub fn audit_update_many<R, E, F>(
        &self,
        source: &dyn RecordSource,
        collection: &str,
        filter: &Filter,
        assignments: &Document,
        mutate: F,
    ) -> std::result::Result<(R, BulkAuditReport), E>
    where
        F: FnOnce() -> std::result::Result<R, E>,
    {
        // Step 1: point-in-time snapshot, strictly before the mutation.
        let (snapshots, mut failures) = match source.find_matching(filter) {
            Ok(snapshots) => (snapshots, Vec::new()),
            Err(error) => {
                let error = Error::Snapshot(error.to_string());
                warn!(collection = %collection, error = %error, "bulk snapshot query failed, audit skipped");
                (Vec::new(), vec![BulkAuditFailure { id: None, error }])
            }
        };

        // Step 2: the bulk mutation proceeds regardless of audit state. A
        // failed mutation produces no history at all.
        let result = mutate()?;

        // Steps 3 and 4: diffs and records from the snapshot + payload only.
        let report = self.persist_history(collection, snapshots, assignments, failures);
        Ok((result, report))
    }

    fn persist_history(
        &self,
        collection: &str,
        snapshots: Vec<Document>,
        assignments: &Document,
        mut failures: Vec<BulkAuditFailure>,
    ) -> BulkAuditReport {
        let matched = snapshots.len();
        let builder = HistoryRecordBuilder::new(self.auditor.config());

        let mut records = Vec::with_capacity(matched);
        for snapshot in &snapshots {
            match self.build_record(&builder, snapshot, assignments) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(collection = %collection, error = %error, "bulk history record dropped");
                    failures.push(BulkAuditFailure {
                        id: snapshot.id().cloned(),
                        error,
                    });
                }
            }
        }

        let written = records.len();
        if !records.is_empty() {
            let history_collection = self.auditor.history_collection_for(collection);
            if let Err(error) = self
                .auditor
                .history()
                .append_batch(&history_collection, records)
            {
                warn!(collection = %history_collection, error = %error, "bulk history batch rejected");
                failures.push(BulkAuditFailure { id: None, error });
                return BulkAuditReport {
                    matched,
                    written: 0,
                    failures,
                };
            }
        }

        BulkAuditReport {
            matched,
            written,
            failures,
        }
    }

    /// Build one record from a snapshot and the assignment set
    fn build_record(
        &self,
        builder: &HistoryRecordBuilder<'_>,
        snapshot: &Document,
        assignments: &Document,
    ) -> Result<HistoryRecord> {
        let custom = self.auditor.config().custom_diff.as_ref();
        let mut diff = Document::new();
        let mut post_state = snapshot.clone();

        for (field, new_value) in assignments.iter() {
            let old_value = snapshot.get(field);
            let entry = match custom {
                Some(custom) => custom(field, Some(new_value), old_value).map_err(|message| {
                    Error::Comparison {
                        field: field.clone(),
                        message,
                    }
                })?,
                None => {
                    if is_changed(old_value, Some(new_value)) {
                        Some(old_value.cloned().unwrap_or(Value::Null))
                    } else {
                        None
                    }
                }
            };
            if let Some(entry) = entry {
                diff.set(field.clone(), entry);
            }
            post_state.set(field.clone(), new_value.clone());
        }

        builder.build(Operation::Update, post_state, Some(diff), Some(snapshot))
    }
}
