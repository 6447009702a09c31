//! Change detection
//!
//! This module decides whether two field values differ under one unified
//! equality rule, and derives field-level diffs from it.
//!
//! ## Comparison Rules (CHG-1 to CHG-6)
//!
//! Applied in order, first match wins:
//!
//! - **CHG-1**: Both absent-or-null -> unchanged
//! - **CHG-2**: Exactly one absent-or-null -> changed
//! - **CHG-3**: Differing JSON kinds -> changed
//! - **CHG-4**: Arrays: both empty -> unchanged; one empty -> changed;
//!   otherwise symmetric set difference under deep equality. Ordering and
//!   duplicate count are ignored (a multiset is compared as a set). This is
//!   a deliberate simplification, kept for compatibility with existing
//!   audit trails.
//! - **CHG-5**: Objects: both empty -> unchanged; one empty -> changed;
//!   otherwise deep equality of the whole structure
//! - **CHG-6**: Scalars: changed iff not equal
//!
//! All functions here are pure and safe for unrestricted concurrent use.

use serde_json::Value;

use crate::config::CustomDiff;
use crate::document::{Document, VERSION_FIELD};
use crate::error::{Error, Result};

/// JSON kind discriminant, for the CHG-3 kind check
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Treat both absent fields and explicit nulls as "nil"
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Decide whether a field value changed between two states
///
/// `None` means the field was absent. Total over arbitrary values, pure,
/// no side effects; called once per field per mutation.
///
/// # Example
///
/// ```
/// use sediment_core::change::is_changed;
/// use serde_json::json;
///
/// assert!(!is_changed(None, None));
/// assert!(is_changed(None, Some(&json!(0))));
/// assert!(!is_changed(Some(&json!([1, 2])), Some(&json!([2, 1]))));
/// ```
pub fn is_changed(old: Option<&Value>, new: Option<&Value>) -> bool {
    match (present(old), present(new)) {
        // CHG-1
        (None, None) => false,
        // CHG-2
        (None, Some(_)) | (Some(_), None) => true,
        (Some(old), Some(new)) => values_differ(old, new),
    }
}

/// CHG-3 through CHG-6, for two present non-null values
fn values_differ(old: &Value, new: &Value) -> bool {
    if kind(old) != kind(new) {
        return true;
    }

    match (old, new) {
        (Value::Array(old), Value::Array(new)) => arrays_differ(old, new),
        (Value::Object(old), Value::Object(new)) => {
            if old.is_empty() && new.is_empty() {
                return false;
            }
            if old.is_empty() || new.is_empty() {
                return true;
            }
            old != new
        }
        _ => old != new,
    }
}

/// CHG-4: set-semantics array comparison
fn arrays_differ(old: &[Value], new: &[Value]) -> bool {
    if old.is_empty() && new.is_empty() {
        return false;
    }
    if old.is_empty() || new.is_empty() {
        return true;
    }

    // Symmetric set difference under deep equality. Quadratic, acceptable:
    // field arrays are small and elements are arbitrary JSON.
    let only_in_new = new.iter().any(|n| !old.contains(n));
    let only_in_old = old.iter().any(|o| !new.contains(o));
    only_in_new || only_in_old
}

/// Compute a field-level diff between two document states
///
/// Runs the change detector (or `custom`, when present) per field of the
/// post-state. Changed fields contribute their *prior* value; a prior value
/// that was absent is recorded as null. Fields absent from the returned diff
/// are guaranteed unchanged.
///
/// Post-state iteration means fields removed by the update do not appear in
/// the diff; the full prior state of removed fields is only captured by the
/// remove operation.
///
/// # Errors
///
/// Returns [`Error::Comparison`] when the custom diff function fails for a
/// field. The whole diff is aborted (strict policy), never truncated.
pub fn compute_diff(
    before: Option<&Document>,
    after: &Document,
    custom: Option<&CustomDiff>,
) -> Result<Document> {
    let mut diff = Document::new();

    for (field, new_value) in after.iter() {
        if field == VERSION_FIELD {
            continue;
        }
        let old_value = before.and_then(|d| d.get(field));

        match custom {
            Some(custom) => {
                let entry = custom(field, Some(new_value), old_value).map_err(|message| {
                    Error::Comparison {
                        field: field.clone(),
                        message,
                    }
                })?;
                if let Some(entry) = entry {
                    diff.set(field.clone(), entry);
                }
            }
            None => {
                if is_changed(old_value, Some(new_value)) {
                    diff.set(field.clone(), old_value.cloned().unwrap_or(Value::Null));
                }
            }
        }
    }

    Ok(diff)
}
