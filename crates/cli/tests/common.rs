// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;
use std::sync::Arc;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use lsync_core::{Course, EntityCache, Module, OpKind, PendingQueue, SqliteStore};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `lsync` command pointed at `state_dir`.
pub fn lsync(state_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("lsync");
    cmd.env_remove("LSYNC_STATE_DIR").arg("--state-dir").arg(state_dir);
    cmd
}

fn open_store(state_dir: &Path) -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open(&state_dir.join("lsync.db")).unwrap())
}

/// Cache and enroll a course with modules `m1..=mN`.
pub fn seed_course(state_dir: &Path, id: &str, title: &str, modules: usize) {
    let modules = (1..=modules)
        .map(|i| Module::new(format!("m{i}"), format!("Module {i}")))
        .collect();
    let mut cache = EntityCache::open(open_store(state_dir)).unwrap();
    cache.put(Course::new(id, title).with_modules(modules)).unwrap();
    cache.add_enrolled(id).unwrap();
}

/// Append operations to the pending queue, in order.
pub fn seed_ops(state_dir: &Path, kinds: Vec<OpKind>) {
    let mut queue = PendingQueue::open(open_store(state_dir)).unwrap();
    for kind in kinds {
        queue.enqueue(kind).unwrap();
    }
}

/// Dead-letter the oldest pending operation.
pub fn kill_oldest(state_dir: &Path, reason: &str) {
    let mut queue = PendingQueue::open(open_store(state_dir)).unwrap();
    let oldest = queue.list().into_iter().next().unwrap();
    queue.dead_letter(&oldest.id, reason).unwrap();
}

pub fn pending_len(state_dir: &Path) -> usize {
    PendingQueue::open(open_store(state_dir)).unwrap().len()
}
