// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{capture, TestContext, JSON, TEXT};
use lsync_core::{OpKind, PendingOperation};

#[test]
fn test_list_empty() {
    let ctx = TestContext::new();
    let out = capture(|buf| list_impl(&ctx.state, TEXT, buf));
    assert_eq!(out, "No pending operations\n");
}

#[test]
fn test_list_in_creation_order() {
    let ctx = TestContext::new();
    ctx.queue(OpKind::progress_update("c1", 10))
        .queue(OpKind::module_completion("c1", "m1"))
        .queue(OpKind::progress_update("c2", 90));

    let out = capture(|buf| list_impl(&ctx.state, TEXT, buf));
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("progress c1 -> 10%"));
    assert!(lines[1].ends_with("complete c1/m1"));
    assert!(lines[2].ends_with("progress c2 -> 90%"));
}

#[test]
fn test_list_json() {
    let ctx = TestContext::new();
    ctx.queue(OpKind::progress_update("c1", 10));

    let out = capture(|buf| list_impl(&ctx.state, JSON, buf));
    let ops: Vec<PendingOperation> = serde_json::from_str(&out).unwrap();

    assert_eq!(ops.len(), 1);
    assert!(ops[0].id.starts_with("op-"));
}

#[test]
fn test_clear_empties_queue_but_keeps_dead_letters() {
    let ctx = TestContext::new();
    ctx.queue(OpKind::progress_update("c1", 10))
        .queue(OpKind::progress_update("c2", 20))
        .queue(OpKind::progress_update("c3", 30))
        .kill_oldest("rejected (400): bad");

    let out = capture(|buf| clear_impl(&ctx.state, buf));

    assert_eq!(out, "Cleared 2 pending operation(s)\n");
    let queue = ctx.state.queue().unwrap();
    assert!(queue.is_empty());
    assert_eq!(queue.dead_letters().len(), 1);
}
