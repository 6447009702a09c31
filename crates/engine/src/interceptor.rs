//! Auditor: the mutation interceptor implementation
//!
//! ## Design: STATELESS FACADE
//!
//! `Auditor` holds only the configuration and an `Arc` to the history
//! store. No caches, no locks, no mutable state; it is `Send + Sync` and
//! one instance can serve every mutation hook in the process.
//!
//! ## Call protocol
//!
//! The calling code wraps its own mutations (decorator pattern):
//!
//! 1. capture the "before" snapshot strictly before mutating (for updates
//!    and removes)
//! 2. perform the mutation against the record store
//! 3. after the mutation commits, invoke the matching `on_*` hook
//!
//! Step 3 only runs for committed mutations, so cancelled or failed
//! mutations never leave orphaned history records. Hook errors propagate to
//! the same caller that performed the mutation; the mutation itself is
//! never rolled back because auditing failed.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use sediment_core::{
    compute_diff, history_collection_name, AuditConfig, Document, Error, HistoryRecord,
    HistoryStore, MetadataField, MutationInterceptor, Operation, Result,
};

use crate::builder::HistoryRecordBuilder;

/// Record fields a metadata key must not collide with
const RESERVED_KEYS: [&str; 4] = ["t", "o", "d", "diff"];

/// Validate metadata key uniqueness and reserved-key collisions
fn validate_metadata_spec(spec: &[MetadataField]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for entry in spec {
        if RESERVED_KEYS.contains(&entry.key.as_str()) {
            return Err(Error::Configuration(format!(
                "metadata key {:?} collides with a reserved record field",
                entry.key
            )));
        }
        if !seen.insert(entry.key.as_str()) {
            return Err(Error::Configuration(format!(
                "duplicate metadata key {:?}",
                entry.key
            )));
        }
    }
    Ok(())
}

/// Change-auditing engine attached around a record store's mutations
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sediment_core::{AuditConfig, Document, MutationInterceptor};
/// use sediment_engine::Auditor;
/// use sediment_store::MemoryHistoryStore;
/// use serde_json::json;
///
/// let history = Arc::new(MemoryHistoryStore::new());
/// let auditor = Auditor::new(AuditConfig::new(), history.clone()).unwrap();
///
/// let doc = Document::from_value(json!({"name": "Ann", "age": 30})).unwrap();
/// // ... the caller persists `doc` in its own store, then:
/// auditor.on_insert("people", &doc).unwrap();
///
/// assert_eq!(history.len("people_history"), 1);
/// ```
#[derive(Clone)]
pub struct Auditor {
    config: AuditConfig,
    history: Arc<dyn HistoryStore>,
}

impl Auditor {
    /// Create an auditor over a history store
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the metadata spec carries a
    /// duplicate key or one of the reserved record fields
    /// (`t`, `o`, `d`, `diff`).
    pub fn new(config: AuditConfig, history: Arc<dyn HistoryStore>) -> Result<Self> {
        validate_metadata_spec(&config.metadata)?;
        Ok(Self { config, history })
    }

    /// The configuration this auditor runs under
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// The underlying history store
    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// History collection name for a source collection
    pub fn history_collection_for(&self, source: &str) -> String {
        history_collection_name(source, self.config.collection_override.as_deref())
    }

    /// Wipe the audit trail of one source collection
    ///
    /// Administrative operation; per-record deletion does not exist.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`Persistence`](Error::Persistence) failure.
    pub fn clear_history(&self, source: &str) -> Result<()> {
        self.history.clear(&self.history_collection_for(source))
    }

    fn persist(&self, source: &str, record: HistoryRecord) -> Result<()> {
        let collection = self.history_collection_for(source);
        debug!(collection = %collection, operation = %record.operation, "appending history record");
        self.history.append(&collection, record)
    }

    fn builder(&self) -> HistoryRecordBuilder<'_> {
        HistoryRecordBuilder::new(&self.config)
    }
}

impl MutationInterceptor for Auditor {
    fn on_insert(&self, collection: &str, new_doc: &Document) -> Result<()> {
        let record = self
            .builder()
            .build(Operation::Insert, new_doc.clone(), None, None)?;
        self.persist(collection, record)
    }

    fn on_update(
        &self,
        collection: &str,
        before: Option<&Document>,
        after: &Document,
    ) -> Result<()> {
        let diff = if self.config.diff_only {
            Some(compute_diff(
                before,
                after,
                self.config.custom_diff.as_ref(),
            )?)
        } else {
            None
        };
        let record = self
            .builder()
            .build(Operation::Update, after.clone(), diff, before)?;
        self.persist(collection, record)
    }

    fn on_filter_update(&self, collection: &str, assignments: &Document) -> Result<()> {
        // Weak path: no prior state was ever loaded. The assignment set is
        // the only known document state, and no diff can be computed.
        let record = self
            .builder()
            .build(Operation::Update, assignments.clone(), None, None)?;
        self.persist(collection, record)
    }

    fn on_remove(&self, collection: &str, doc: &Document) -> Result<()> {
        let record = self
            .builder()
            .build(Operation::Remove, doc.clone(), None, Some(doc))?;
        self.persist(collection, record)
    }
}
