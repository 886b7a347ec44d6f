// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    enrollment = { OpKind::enrollment(Course::new("c-1", "Intro")), "c-1", "enrollment" },
    progress = { OpKind::progress_update("c-2", 40), "c-2", "progress_update" },
    completion = { OpKind::module_completion("c-3", "m-1"), "c-3", "module_completion" },
)]
fn op_kind_course_id_and_tag(kind: OpKind, course_id: &str, tag: &str) {
    assert_eq!(kind.course_id(), course_id);
    assert_eq!(kind.tag(), tag);
}

#[test]
fn op_ids_are_stable_for_same_input() {
    let kind = OpKind::progress_update("c-1", 10);
    let a = generate_op_id(&Stamp::new(1000, 0), &kind);
    let b = generate_op_id(&Stamp::new(1000, 0), &kind);
    assert_eq!(a, b);
    assert!(a.starts_with("op-"));
    assert_eq!(a.len(), "op-".len() + 16);
}

#[test]
fn op_ids_differ_by_stamp() {
    let kind = OpKind::progress_update("c-1", 10);
    let a = generate_op_id(&Stamp::new(1000, 0), &kind);
    let b = generate_op_id(&Stamp::new(1000, 1), &kind);
    assert_ne!(a, b);
}

#[test]
fn op_ordering_follows_creation_stamp() {
    let first = PendingOperation::new(Stamp::new(2000, 0), OpKind::module_completion("c", "m1"));
    let second = PendingOperation::new(Stamp::new(2000, 1), OpKind::module_completion("c", "m2"));
    let third = PendingOperation::new(Stamp::new(3000, 0), OpKind::progress_update("c", 90));

    let mut ops = vec![third.clone(), first.clone(), second.clone()];
    ops.sort();
    assert_eq!(ops, vec![first, second, third]);
}

#[test]
fn op_serializes_with_type_tag() {
    let op = PendingOperation::new(Stamp::new(5, 0), OpKind::module_completion("c", "m"));
    let json = serde_json::to_value(&op).unwrap();

    assert_eq!(json["kind"]["type"], "module_completion");
    assert_eq!(json["attempts"], 0);
    assert!(json.get("last_error").is_none());
}

#[test]
fn op_deserializes_without_attempts() {
    let json = r#"{
        "id": "op-1",
        "created_at": {"wall_ms": 1, "counter": 0},
        "kind": {"type": "progress_update", "course_id": "c", "progress": 5}
    }"#;
    let op: PendingOperation = serde_json::from_str(json).unwrap();
    assert_eq!(op.attempts, 0);
    assert_eq!(op.course_id(), "c");
}
