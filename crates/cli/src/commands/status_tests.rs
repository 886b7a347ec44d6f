// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{capture, TestContext, JSON, TEXT};
use lsync_core::{write_json as store_json, OpKind};

#[test]
fn test_status_empty_state() {
    let ctx = TestContext::new();

    let out = capture(|buf| run_impl(&ctx.state, TEXT, buf));

    assert!(out.contains("Enrolled courses: 0"));
    assert!(out.contains("Pending operations: 0"));
    assert!(out.contains("Dead letters: 0"));
    assert!(out.contains("Last sync: never"));
}

#[test]
fn test_status_counts_queue_and_dead_letters() {
    let ctx = TestContext::new();
    ctx.enroll("c1", "Rust", 2)
        .queue(OpKind::progress_update("c1", 10))
        .queue(OpKind::module_completion("c1", "m1"))
        .kill_oldest("rejected (404): gone");

    let out = capture(|buf| run_impl(&ctx.state, TEXT, buf));

    assert!(out.contains("Enrolled courses: 1"));
    assert!(out.contains("Pending operations: 1"));
    assert!(out.contains("Dead letters: 1"));
}

#[test]
fn test_status_json_includes_last_sync() {
    let ctx = TestContext::new();
    let at = Utc::now();
    store_json(&*ctx.state.store, "last_synced_at", &at).unwrap();

    let out = capture(|buf| run_impl(&ctx.state, JSON, buf));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["pending"], 0);
    assert_eq!(json["max_attempts"], 5);
    assert!(json["last_synced_at"].is_string());
}
