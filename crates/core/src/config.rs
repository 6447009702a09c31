//! Audit configuration
//!
//! The configuration is an explicit value passed into the engine constructor,
//! consumed by every component. There is no implicit global state.
//!
//! ## Metadata sources
//!
//! A metadata entry attaches one caller-defined key to every history record.
//! Its source is one of:
//! - `Field`: constant lookup of a field in the new document state (null if
//!   absent)
//! - `Derived`: a pure function of (old, new) state
//! - `Fallible`: a function of (old, new) state that may fail; a failure
//!   aborts the whole history record

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::document::Document;

/// Pure metadata resolver: (old state, new state) -> value
pub type MetadataFn = Arc<dyn Fn(Option<&Document>, &Document) -> Value + Send + Sync>;

/// Fallible metadata resolver: (old state, new state) -> value or error
///
/// The error string is wrapped into [`Error::Resolution`](crate::Error::Resolution)
/// with the entry's key attached.
pub type FallibleMetadataFn =
    Arc<dyn Fn(Option<&Document>, &Document) -> std::result::Result<Value, String> + Send + Sync>;

/// Per-field diff override: (field name, new value, old value) -> diff entry
///
/// Returning `Ok(Some(entry))` records `entry` as the field's diff value,
/// `Ok(None)` excludes the field, and `Err` aborts the whole record
/// (strict comparison policy).
pub type CustomDiff = Arc<
    dyn Fn(&str, Option<&Value>, Option<&Value>) -> std::result::Result<Option<Value>, String>
        + Send
        + Sync,
>;

/// Where a metadata entry's value comes from
#[derive(Clone)]
pub enum MetadataSource {
    /// Constant lookup of a field in the new document state
    Field(String),
    /// Pure function of (old, new) state
    Derived(MetadataFn),
    /// Function of (old, new) state that may fail
    Fallible(FallibleMetadataFn),
}

impl fmt::Debug for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataSource::Field(name) => f.debug_tuple("Field").field(name).finish(),
            MetadataSource::Derived(_) => f.write_str("Derived(<fn>)"),
            MetadataSource::Fallible(_) => f.write_str("Fallible(<fn>)"),
        }
    }
}

/// One (key, resolver) pair of the metadata spec
///
/// Keys must be unique within the spec and must not collide with the
/// reserved record fields; the engine validates this at construction.
#[derive(Debug, Clone)]
pub struct MetadataField {
    /// Key under which the resolved value is stored in the history record
    pub key: String,
    /// Value source
    pub source: MetadataSource,
}

impl MetadataField {
    /// Constant lookup of `field` in the new document state
    pub fn field(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: MetadataSource::Field(field.into()),
        }
    }

    /// Pure resolver function
    pub fn derived(
        key: impl Into<String>,
        f: impl Fn(Option<&Document>, &Document) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            source: MetadataSource::Derived(Arc::new(f)),
        }
    }

    /// Fallible resolver function
    pub fn fallible(
        key: impl Into<String>,
        f: impl Fn(Option<&Document>, &Document) -> std::result::Result<Value, String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            source: MetadataSource::Fallible(Arc::new(f)),
        }
    }
}

/// Configuration for the audit engine
///
/// Supplied once and consumed by all components.
#[derive(Clone, Default)]
pub struct AuditConfig {
    /// Overrides the derived history collection name
    pub collection_override: Option<String>,
    /// Store field-level diffs instead of relying on full snapshots alone
    /// for single-document updates
    pub diff_only: bool,
    /// Ordered metadata spec; resolved into every history record
    pub metadata: Vec<MetadataField>,
    /// Per-field diff override, replacing the built-in change detector
    pub custom_diff: Option<CustomDiff>,
}

impl AuditConfig {
    /// Default configuration: derived collection name, full snapshots,
    /// no metadata, built-in change detection
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived history collection name
    pub fn with_collection_override(mut self, name: impl Into<String>) -> Self {
        self.collection_override = Some(name.into());
        self
    }

    /// Enable or disable diff-only mode for single-document updates
    pub fn with_diff_only(mut self, enabled: bool) -> Self {
        self.diff_only = enabled;
        self
    }

    /// Append a metadata entry
    pub fn with_metadata(mut self, field: MetadataField) -> Self {
        self.metadata.push(field);
        self
    }

    /// Install a per-field diff override
    pub fn with_custom_diff(
        mut self,
        f: impl Fn(&str, Option<&Value>, Option<&Value>) -> std::result::Result<Option<Value>, String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.custom_diff = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfig")
            .field("collection_override", &self.collection_override)
            .field("diff_only", &self.diff_only)
            .field("metadata", &self.metadata)
            .field(
                "custom_diff",
                &self.custom_diff.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}
