//! Error types for the audit engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The taxonomy separates audit-path failures by where the caller has to react:
//! metadata resolution and field comparison abort a single history record,
//! persistence failures propagate to whoever triggered the mutation, and
//! snapshot failures are reported through the bulk side channel.

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the audit engine
#[derive(Debug, Error)]
pub enum Error {
    /// A metadata resolver failed. The whole history record is aborted;
    /// no partial metadata is ever persisted.
    #[error("metadata resolution failed for key {key:?}: {message}")]
    Resolution {
        /// Metadata key whose resolver failed
        key: String,
        /// Resolver-supplied failure description
        message: String,
    },

    /// The history store rejected a write. Propagated to the caller that
    /// invoked the mutation hook; never retried automatically.
    #[error("history persistence failed: {0}")]
    Persistence(String),

    /// A custom diff function failed for a field. Policy is strict-abort:
    /// the whole history record is dropped, never a half-computed diff.
    #[error("field comparison failed for {field:?}: {message}")]
    Comparison {
        /// Field whose comparison failed
        field: String,
        /// Comparison failure description
        message: String,
    },

    /// The bulk snapshot query failed before the mutation ran. The bulk
    /// audit is skipped and the failure surfaces through the side channel.
    #[error("bulk snapshot query failed: {0}")]
    Snapshot(String),

    /// Invalid audit configuration (duplicate or reserved metadata key).
    #[error("invalid audit configuration: {0}")]
    Configuration(String),
}
