//! Document and filter types
//!
//! This module defines:
//! - Document: an independent, point-in-time snapshot of a record's fields
//! - Filter: the field-equality predicate used to select bulk-update snapshots
//!
//! ## Ownership
//!
//! The engine only ever holds snapshots. A `Document` is a plain, already
//! serialized copy handed over by the record store adapter; the engine never
//! reaches into caller-owned live state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store-assigned identifier field.
pub const ID_FIELD: &str = "_id";

/// Store-internal version marker field. Stripped from every snapshot before
/// it is embedded in a history record.
pub const VERSION_FIELD: &str = "_version";

/// An independent snapshot of a record's field values
///
/// Fields are opaque JSON values. The snapshot is disconnected from the live
/// store: mutating it never affects the audited record, and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a document from a JSON value, if it is an object
    ///
    /// Returns None for any non-object value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field value
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Check whether a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the document has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The store-assigned identifier, if present
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// Iterate over (field, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Strip store-internal marker fields in place
    ///
    /// Removes the version marker. Called by the record builder before a
    /// snapshot is embedded in a history record.
    pub fn strip_internal(&mut self) {
        self.0.remove(VERSION_FIELD);
    }

    /// Consuming variant of [`strip_internal`](Self::strip_internal)
    pub fn stripped(mut self) -> Self {
        self.strip_internal();
        self
    }

    /// Borrow the underlying field map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the document, returning the underlying field map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Field-equality predicate over documents
///
/// A document matches when every filter field compares equal to the
/// document's value for that field. An absent document field compares equal
/// to an explicit null condition. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Create an empty filter (matches every document)
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a field-equality condition
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    /// True when the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (field, expected value) conditions
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, doc: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| doc.get(field).unwrap_or(&Value::Null) == expected)
    }
}
