//! History collection naming
//!
//! The history collection name is derived deterministically from the source
//! collection's name so that every audited collection maps to exactly one
//! audit trail, unless the configuration overrides it.

/// Suffix appended to a source collection name to derive its history
/// collection name.
pub const HISTORY_SUFFIX: &str = "_history";

/// Derive the history collection name for a source collection
///
/// Returns `override_name` verbatim when present, otherwise
/// `{source}_history`.
pub fn history_collection_name(source: &str, override_name: Option<&str>) -> String {
    match override_name {
        Some(name) => name.to_string(),
        None => format!("{source}{HISTORY_SUFFIX}"),
    }
}
