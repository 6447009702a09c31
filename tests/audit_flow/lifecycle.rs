//! Diff algebra across whole flows, plus administrative operations

use crate::common::*;
use sediment::AuditConfig;
use serde_json::json;

#[test]
fn diff_round_trip_reconstructs_the_original() {
    let h = Harness::diff_only();
    let stored = h.insert(
        "people",
        doc(json!({"name": "Ann", "age": 30, "city": "Oslo"})),
    );
    let id = id_of(&stored);

    let saved = h.update("people", &id, |d| {
        d.set("age", json!(31));
        d.set("city", json!("Bergen"));
    });

    let record = &h.trail("people")[1];
    let diff = record.diff.as_ref().unwrap();

    // Applying the captured prior values onto the new state restores the
    // original value of every changed field.
    let mut restored = saved.clone();
    restored.strip_internal();
    for (field, prior) in diff.iter() {
        restored.set(field.clone(), prior.clone());
    }
    assert_eq!(restored.get("age"), Some(&json!(30)));
    assert_eq!(restored.get("city"), Some(&json!("Oslo")));
    assert_eq!(restored.get("name"), Some(&json!("Ann")));
}

#[test]
fn repeating_an_identical_update_reports_nothing_changed() {
    let h = Harness::diff_only();
    let stored = h.insert("people", doc(json!({"age": 30})));
    let id = id_of(&stored);

    h.update("people", &id, |d| d.set("age", json!(31)));
    // Same assignment again: the field already holds 31.
    h.update("people", &id, |d| d.set("age", json!(31)));

    let trail = h.trail("people");
    assert_eq!(trail.len(), 3);
    assert_eq!(trail[1].diff.as_ref().unwrap().get("age"), Some(&json!(30)));
    assert!(trail[2].diff.as_ref().unwrap().is_empty());
}

#[test]
fn array_reordering_is_not_a_change() {
    let h = Harness::diff_only();
    let stored = h.insert("people", doc(json!({"tags": ["a", "b", "c"]})));
    let id = id_of(&stored);

    h.update("people", &id, |d| {
        d.set("tags", json!(["c", "a", "b"]));
    });

    assert!(h.trail("people")[1].diff.as_ref().unwrap().is_empty());
}

#[test]
fn full_lifecycle_leaves_a_complete_trail() {
    let h = Harness::diff_only();
    let stored = h.insert("people", doc(json!({"name": "Ann", "age": 30})));
    let id = id_of(&stored);

    h.update("people", &id, |d| d.set("age", json!(31)));
    h.remove("people", &id);

    let trail = h.trail("people");
    assert_eq!(trail.len(), 3);
    assert_eq!(trail[0].operation, Operation::Insert);
    assert_eq!(trail[1].operation, Operation::Update);
    assert_eq!(trail[2].operation, Operation::Remove);
    // The remove record preserves the last known state.
    assert_eq!(trail[2].document.get("age"), Some(&json!(31)));
}

#[test]
fn clear_history_is_the_only_deletion() {
    let h = Harness::new(AuditConfig::new());
    let stored = h.insert("people", doc(json!({"n": 1})));
    h.insert("orders", doc(json!({"n": 2})));
    h.remove("people", &id_of(&stored));

    assert_eq!(h.trail("people").len(), 2);

    h.auditor.clear_history("people").unwrap();
    assert!(h.trail("people").is_empty());
    // Other trails are untouched.
    assert_eq!(h.trail("orders").len(), 1);
}

#[test]
fn uncommitted_mutation_produces_no_record() {
    let h = Harness::new(AuditConfig::new());
    h.insert("people", doc(json!({"n": 1})));

    // The save never commits (unknown id), so the caller never reaches the
    // audit hook. The trail must not grow.
    let phantom = doc(json!({"_id": "ghost", "n": 2}));
    if h.records.save(&phantom).is_some() {
        h.auditor.on_update("people", None, &phantom).unwrap();
    }

    assert_eq!(h.trail("people").len(), 1);
}
