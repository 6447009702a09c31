//! Sediment engine: mutation interception and history building
//!
//! This crate drives the audit flow around a record store's mutations:
//! - metadata: atomic resolution of caller-defined record fields
//! - builder: history record assembly (strip, stamp, resolve, attach diff)
//! - interceptor: `Auditor`, the per-operation-kind hook implementation
//! - bulk: the snapshot/diff protocol for filter-based multi-document
//!   updates, with its failure side channel
//!
//! The engine is stateless: `Auditor` holds only configuration and an
//! `Arc` to the history store, and every component is safe to use from
//! concurrent mutation hooks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod bulk;
pub mod interceptor;
pub mod metadata;

pub use builder::HistoryRecordBuilder;
pub use bulk::{BulkAuditFailure, BulkAuditReport, BulkSnapshotCoordinator};
pub use interceptor::Auditor;
pub use metadata::resolve_metadata;
