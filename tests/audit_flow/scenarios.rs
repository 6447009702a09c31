//! Single-document mutation scenarios
//!
//! Each test wires the auditor around the in-memory record store and
//! asserts the exact shape of the resulting history records.

use crate::common::*;
use sediment::{AuditConfig, MetadataField};
use serde_json::json;

#[test]
fn insert_produces_one_insert_record() {
    let h = Harness::new(AuditConfig::new());
    let stored = h.insert("people", doc(json!({"name": "Ann", "age": 30})));

    let trail = h.trail("people");
    assert_eq!(trail.len(), 1);

    let record = &trail[0];
    assert_eq!(record.operation, Operation::Insert);
    assert!(record.diff.is_none());
    assert_eq!(record.document.get("name"), Some(&json!("Ann")));
    assert_eq!(record.document.get("age"), Some(&json!(30)));
    // The snapshot keeps the store id but never the version marker.
    assert_eq!(record.document.id(), stored.id());
    assert!(!record.document.contains("_version"));
}

#[test]
fn diff_only_update_captures_prior_value() {
    let h = Harness::diff_only();
    let stored = h.insert("people", doc(json!({"name": "Ann", "age": 30})));
    let id = id_of(&stored);

    h.update("people", &id, |d| d.set("age", json!(31)));

    let trail = h.trail("people");
    assert_eq!(trail.len(), 2);

    let record = &trail[1];
    assert_eq!(record.operation, Operation::Update);
    // Full post-update state plus the field-level diff.
    assert_eq!(record.document.get("age"), Some(&json!(31)));
    assert_eq!(record.document.get("name"), Some(&json!("Ann")));
    let diff = record.diff.as_ref().expect("diff-only update has a diff");
    assert_eq!(diff.len(), 1);
    assert_eq!(diff.get("age"), Some(&json!(30)));
}

#[test]
fn update_with_no_change_yields_empty_diff_record() {
    let h = Harness::diff_only();
    let stored = h.insert("people", doc(json!({"name": "Ann"})));
    let id = id_of(&stored);

    // Save without touching any field.
    h.update("people", &id, |_| {});

    let trail = h.trail("people");
    assert_eq!(trail.len(), 2);
    let diff = trail[1].diff.as_ref().expect("diff present");
    assert!(diff.is_empty(), "empty diff, not a suppressed record");
}

#[test]
fn full_snapshot_update_omits_diff() {
    let h = Harness::new(AuditConfig::new());
    let stored = h.insert("people", doc(json!({"age": 30})));
    let id = id_of(&stored);

    h.update("people", &id, |d| d.set("age", json!(31)));

    let record = &h.trail("people")[1];
    assert!(record.diff.is_none());
    assert_eq!(record.document.get("age"), Some(&json!(31)));
}

#[test]
fn remove_captures_final_state() {
    let h = Harness::new(AuditConfig::new());
    let stored = h.insert("people", doc(json!({"id": 7, "name": "Bob"})));
    let id = id_of(&stored);

    h.remove("people", &id);

    let trail = h.trail("people");
    assert_eq!(trail.len(), 2);
    let record = &trail[1];
    assert_eq!(record.operation, Operation::Remove);
    assert!(record.diff.is_none());
    assert_eq!(record.document.get("id"), Some(&json!(7)));
    assert_eq!(record.document.get("name"), Some(&json!("Bob")));
}

#[test]
fn filter_update_stores_assignments_only() {
    let h = Harness::diff_only();
    h.insert("people", doc(json!({"name": "Ann", "status": "active"})));

    // Filter-based update: the record was never loaded, so only the
    // assignment set reaches the audit trail.
    let assignments = doc(json!({"status": "archived"}));
    h.records
        .update_many(&filter_eq("status", json!("active")), &assignments);
    h.auditor
        .on_filter_update("people", &assignments)
        .unwrap();

    let trail = h.trail("people");
    let record = &trail[1];
    assert_eq!(record.operation, Operation::Update);
    assert_eq!(record.document, assignments);
    assert!(record.diff.is_none());
}

#[test]
fn metadata_resolved_into_every_record() {
    let config = AuditConfig::new()
        .with_diff_only(true)
        .with_metadata(MetadataField::field("who", "modified_by"))
        .with_metadata(MetadataField::derived("field_count", |_, new| {
            json!(new.len())
        }));
    let h = Harness::new(config);

    let stored = h.insert(
        "people",
        doc(json!({"name": "Ann", "modified_by": "kim"})),
    );
    h.update("people", &id_of(&stored), |d| {
        d.set("modified_by", json!("lee"));
    });

    let trail = h.trail("people");
    assert_eq!(trail[0].metadata.get("who"), Some(&json!("kim")));
    assert_eq!(trail[1].metadata.get("who"), Some(&json!("lee")));
    // Counts the stripped snapshot: _id, name, modified_by.
    assert_eq!(trail[1].metadata.get("field_count"), Some(&json!(3)));
}

#[test]
fn failed_metadata_resolution_surfaces_to_caller_and_persists_nothing() {
    let config = AuditConfig::new()
        .with_metadata(MetadataField::fallible("who", |_, _| Err("down".into())));
    let history = std::sync::Arc::new(sediment::MemoryHistoryStore::new());
    let auditor = sediment::Auditor::new(config, history.clone()).unwrap();

    let result = auditor.on_insert("people", &doc(json!({"name": "Ann"})));

    assert!(result.is_err());
    assert!(history.is_empty("people_history"));
}

#[test]
fn collection_override_redirects_the_trail() {
    let h = Harness::new(AuditConfig::new().with_collection_override("everything_audit"));
    h.insert("people", doc(json!({"n": 1})));
    h.insert("orders", doc(json!({"n": 2})));

    // Both collections share the overridden trail.
    assert_eq!(h.history.len("everything_audit"), 2);
    assert!(h.history.is_empty("people_history"));
    assert!(h.history.is_empty("orders_history"));
}

#[test]
fn audit_records_are_timestamped() {
    let before = chrono::Utc::now();
    let h = Harness::new(AuditConfig::new());
    h.insert("people", doc(json!({"n": 1})));
    let after = chrono::Utc::now();

    let t = h.trail("people")[0].timestamp;
    assert!(t >= before && t <= after);
}
