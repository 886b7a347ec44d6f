// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! lsync-core: offline-first course progress sync
//!
//! This crate provides the local entity cache, the durable pending-operation
//! queue, connectivity tracking and the [`SyncEngine`] that ties them to a
//! remote course service.

pub mod cache;
pub mod clock;
pub mod config;
pub mod connectivity;
pub mod course;
pub mod engine;
pub mod error;
pub mod identity;
pub mod op;
pub mod queue;
pub mod remote;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use cache::EntityCache;
pub use clock::{ClockSource, OpClock, Stamp, SystemClock};
pub use config::SyncConfig;
pub use connectivity::{
    spawn_poller, ConnectivityEvent, ConnectivityMonitor, ReachabilityProbe, Subscription,
};
pub use course::{Course, Module};
pub use engine::{read_last_synced_at, ActionOutcome, DrainReport, SyncEngine, SyncStatus};
pub use error::{Error, ErrorCategory, Result};
pub use identity::{IdentityProvider, Session};
pub use op::{DeadLetter, OpKind, PendingOperation};
pub use queue::PendingQueue;
pub use remote::{dispatch, RemoteCourseService, RemoteError, RemoteFuture, RemoteResult};
pub use store::{read_json, write_json, KvStore, MemoryStore, SqliteStore};
