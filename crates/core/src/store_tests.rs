// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u32,
    name: String,
}

fn exercise(store: &dyn KvStore) {
    assert_eq!(store.read("missing").unwrap(), None);

    store.write("a", b"one").unwrap();
    assert_eq!(store.read("a").unwrap().as_deref(), Some(&b"one"[..]));

    store.write("a", b"two").unwrap();
    assert_eq!(store.read("a").unwrap().as_deref(), Some(&b"two"[..]));

    store.delete("a").unwrap();
    assert_eq!(store.read("a").unwrap(), None);

    // Deleting again is fine
    store.delete("a").unwrap();
}

#[test]
fn memory_store_read_write_delete() {
    exercise(&MemoryStore::new());
}

#[test]
fn sqlite_in_memory_read_write_delete() {
    exercise(&SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.write("course:c1", b"{}").unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.read("course:c1").unwrap().as_deref(), Some(&b"{}"[..]));
}

#[test]
fn json_helpers_roundtrip() {
    let store = MemoryStore::new();
    let record = Record { id: 7, name: "seven".into() };

    write_json(&store, "r", &record).unwrap();
    let loaded: Option<Record> = read_json(&store, "r").unwrap();
    assert_eq!(loaded, Some(record));
}

#[test]
fn read_json_reports_corrupt_value() {
    let store = MemoryStore::new();
    store.write("r", b"not json").unwrap();

    let err = read_json::<Record>(&store, "r").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn arc_store_delegates() {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<MemoryStore> = store.clone();
    shared.write("k", b"v").unwrap();
    assert_eq!(store.len(), 1);
}
