//! History record assembly
//!
//! Assembles the immutable history record from a snapshot, an operation
//! kind and an optional precomputed diff: strips the store-internal version
//! marker, stamps the creation instant, resolves the configured metadata.
//!
//! Assembly fails without side effects: when metadata resolution fails, no
//! record exists to persist. An empty diff passed in is kept as-is; an
//! update that changed nothing still yields exactly one record.

use chrono::Utc;

use sediment_core::{AuditConfig, Document, HistoryRecord, Operation, Result};

use crate::metadata::resolve_metadata;

/// Builds history records under one configuration
///
/// Stateless apart from the borrowed configuration; safe for unrestricted
/// concurrent use.
#[derive(Debug, Clone, Copy)]
pub struct HistoryRecordBuilder<'a> {
    config: &'a AuditConfig,
}

impl<'a> HistoryRecordBuilder<'a> {
    /// Create a builder over an audit configuration
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    /// Assemble a history record
    ///
    /// `snapshot` is the document state the record describes (post-state for
    /// inserts and updates, final prior state for removes); `old` is the
    /// prior state handed to metadata resolvers, when the caller has one.
    ///
    /// # Errors
    ///
    /// Returns [`Resolution`](sediment_core::Error::Resolution) when a
    /// metadata resolver fails; nothing is built in that case.
    pub fn build(
        &self,
        operation: Operation,
        snapshot: Document,
        diff: Option<Document>,
        old: Option<&Document>,
    ) -> Result<HistoryRecord> {
        let document = snapshot.stripped();
        let metadata = resolve_metadata(&self.config.metadata, old, &document)?;

        Ok(HistoryRecord {
            timestamp: Utc::now(),
            operation,
            document,
            diff,
            metadata,
        })
    }
}
