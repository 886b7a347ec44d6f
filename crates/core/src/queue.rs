// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue of operations waiting to reach the remote service.
//!
//! The whole queue is written as one value on every change, so a reader
//! never observes a partially applied enqueue or removal. A write that fails
//! leaves the in-memory queue untouched and reports the error.
//!
//! Operations that can never succeed are moved to a separate dead-letter
//! list where they stay until retried or cleared.

use chrono::Utc;

use crate::clock::OpClock;
use crate::error::Result;
use crate::op::{DeadLetter, OpKind, PendingOperation};
use crate::store::{read_json, write_json, KvStore};

const QUEUE_KEY: &str = "pending_ops";
const DEAD_LETTER_KEY: &str = "dead_letters";

/// Ordered, persisted log of unacknowledged mutations.
pub struct PendingQueue<S: KvStore> {
    store: S,
    clock: OpClock,
    ops: Vec<PendingOperation>,
    dead: Vec<DeadLetter>,
}

impl<S: KvStore> PendingQueue<S> {
    /// Opens the queue using the system clock.
    pub fn open(store: S) -> Result<Self> {
        Self::open_with_clock(store, OpClock::system())
    }

    /// Opens the queue with an explicit clock.
    ///
    /// The clock is advanced past the newest persisted operation so new
    /// entries always sort after existing ones.
    pub fn open_with_clock(store: S, clock: OpClock) -> Result<Self> {
        let mut ops: Vec<PendingOperation> = read_json(&store, QUEUE_KEY)?.unwrap_or_default();
        let dead: Vec<DeadLetter> = read_json(&store, DEAD_LETTER_KEY)?.unwrap_or_default();
        ops.sort();

        let newest = ops.iter().chain(dead.iter().map(|d| &d.op)).map(|op| op.created_at).max();
        if let Some(newest) = newest {
            clock.observe(newest);
        }

        Ok(PendingQueue { store, clock, ops, dead })
    }

    fn without(&self, id: &str) -> Vec<PendingOperation> {
        self.ops.iter().filter(|op| op.id != id).cloned().collect()
    }

    fn persist(&self, ops: &[PendingOperation]) -> Result<()> {
        write_json(&self.store, QUEUE_KEY, ops)
    }

    fn persist_dead(&self, dead: &[DeadLetter]) -> Result<()> {
        write_json(&self.store, DEAD_LETTER_KEY, dead)
    }

    /// Appends an operation with a fresh id and timestamp.
    pub fn enqueue(&mut self, kind: OpKind) -> Result<PendingOperation> {
        let op = PendingOperation::new(self.clock.now(), kind);

        let mut next = self.ops.clone();
        next.push(op.clone());
        self.persist(&next)?;
        self.ops = next;

        tracing::debug!(op_id = %op.id, op = %op.kind, "queued operation");
        Ok(op)
    }

    /// All queued operations, oldest first.
    pub fn list(&self) -> Vec<PendingOperation> {
        self.ops.clone()
    }

    /// Looks up a queued operation by id.
    pub fn get(&self, id: &str) -> Option<&PendingOperation> {
        self.ops.iter().find(|op| op.id == id)
    }

    /// Removes an operation by id. Returns false if it was not queued.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next = self.without(id);
        self.persist(&next)?;
        self.ops = next;
        Ok(true)
    }

    /// Removes every queued operation.
    pub fn clear(&mut self) -> Result<()> {
        self.persist(&[])?;
        self.ops.clear();
        Ok(())
    }

    /// Records a failed replay attempt and returns the new attempt count.
    pub fn record_failure(&mut self, id: &str, reason: &str) -> Result<Option<u32>> {
        let Some(index) = self.ops.iter().position(|op| op.id == id) else {
            return Ok(None);
        };

        let mut next = self.ops.clone();
        next[index].attempts += 1;
        next[index].last_error = Some(reason.to_string());
        let attempts = next[index].attempts;
        self.persist(&next)?;
        self.ops = next;
        Ok(Some(attempts))
    }

    /// Moves an operation to the dead-letter list.
    pub fn dead_letter(&mut self, id: &str, reason: &str) -> Result<bool> {
        let Some(op) = self.get(id).cloned() else {
            return Ok(false);
        };

        let mut dead = self.dead.clone();
        dead.push(DeadLetter { op, reason: reason.to_string(), dead_at: Utc::now() });
        let ops = self.without(id);

        // Dead letter first: a crash between the writes leaves a duplicate,
        // never a lost operation.
        self.persist_dead(&dead)?;
        self.dead = dead;
        self.persist(&ops)?;
        self.ops = ops;

        tracing::warn!(op_id = %id, reason, "operation moved to dead letters");
        Ok(true)
    }

    /// Operations that were taken out of replay.
    pub fn dead_letters(&self) -> &[DeadLetter] {
        &self.dead
    }

    /// Moves all dead letters back into the queue with their attempts reset.
    ///
    /// Returns the number of operations requeued.
    pub fn retry_dead_letters(&mut self) -> Result<usize> {
        if self.dead.is_empty() {
            return Ok(0);
        }

        let mut ops = self.ops.clone();
        for letter in &self.dead {
            if ops.iter().any(|op| op.id == letter.op.id) {
                continue;
            }
            let mut op = letter.op.clone();
            op.attempts = 0;
            op.last_error = None;
            ops.push(op);
        }
        ops.sort();
        let count = self.dead.len();

        self.persist(&ops)?;
        self.ops = ops;
        self.persist_dead(&[])?;
        self.dead.clear();
        Ok(count)
    }

    /// Drops every dead letter.
    pub fn clear_dead_letters(&mut self) -> Result<()> {
        self.persist_dead(&[])?;
        self.dead.clear();
        Ok(())
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
