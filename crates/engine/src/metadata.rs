//! Metadata resolution
//!
//! Computes the caller-defined extra fields of a history record from the
//! original and new document state. Resolution is atomic: the first failing
//! resolver aborts the whole map, so a history record either carries the
//! complete metadata or is not persisted at all.
//!
//! Resolvers are independent of each other. None observes another's output
//! and none may mutate shared state, so the sequential execution order here
//! is an implementation detail, not a contract.

use serde_json::{Map, Value};

use sediment_core::{Document, Error, MetadataField, MetadataSource, Result};

/// Resolve a metadata spec against (old, new) document state
///
/// Constant lookups read the field from `new`, yielding null when absent.
///
/// # Errors
///
/// Returns [`Error::Resolution`] carrying the failing entry's key. No
/// partial map is ever returned.
pub fn resolve_metadata(
    spec: &[MetadataField],
    old: Option<&Document>,
    new: &Document,
) -> Result<Map<String, Value>> {
    let mut resolved = Map::with_capacity(spec.len());

    for entry in spec {
        let value = match &entry.source {
            MetadataSource::Field(name) => new.get(name).cloned().unwrap_or(Value::Null),
            MetadataSource::Derived(f) => f(old, new),
            MetadataSource::Fallible(f) => f(old, new).map_err(|message| Error::Resolution {
                key: entry.key.clone(),
                message,
            })?,
        };
        resolved.insert(entry.key.clone(), value);
    }

    Ok(resolved)
}
