// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync engine.
//!
//! Every learner action is applied to the [`EntityCache`] first and journaled
//! in the [`PendingQueue`]. When the remote is reachable the action is sent
//! directly and dropped from the queue once acknowledged; otherwise, or when
//! the direct call fails, it stays queued and is replayed later by
//! [`SyncEngine::drain`].
//!
//! # Concurrency
//!
//! Cache and queue live behind a single `tokio::sync::Mutex`, and remote
//! calls made on their behalf run while it is held. A drain and a direct
//! call therefore never interleave, and operations reach the remote in the
//! order they were accepted. Reconnect-triggered drains are additionally
//! single-flight.
//!
//! Queue sizes and the last sync time are mirrored outside the lock after
//! every mutation, so [`SyncEngine::status`] never waits on a running drain.
//!
//! # Failure policy
//!
//! - Direct call fails: the cache write stays, the operation stays queued.
//! - Replay fails with a network error: the operation stays queued with its
//!   attempt count bumped, and later operations of the same course are held
//!   back for this pass. After `max_attempts` it is dead-lettered.
//! - Replay is rejected by the remote: the operation is dead-lettered.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::EntityCache;
use crate::clock::OpClock;
use crate::config::SyncConfig;
use crate::connectivity::{self, ConnectivityEvent, ConnectivityMonitor, ReachabilityProbe};
use crate::course::Course;
use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::op::{DeadLetter, OpKind, PendingOperation};
use crate::queue::PendingQueue;
use crate::remote::{dispatch, RemoteCourseService};
use crate::store::{read_json, write_json, KvStore};

const LAST_SYNC_KEY: &str = "last_synced_at";

/// Reads the time of the last completed drain.
pub fn read_last_synced_at(store: &dyn KvStore) -> Result<Option<DateTime<Utc>>> {
    read_json(store, LAST_SYNC_KEY)
}

/// How a learner action was propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The remote acknowledged the action.
    Acknowledged,
    /// The action is waiting in the pending queue.
    Queued(PendingOperation),
    /// The remote rejected the action while replaying the queue ahead of it.
    /// It will not be retried unless the dead letters are requeued.
    DeadLettered(DeadLetter),
}

impl ActionOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, ActionOutcome::Queued(_))
    }
}

/// Summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Operations acknowledged and removed from the queue.
    pub sent: usize,
    /// Operations that failed transiently and stay queued.
    pub retained: usize,
    /// Operations moved to the dead-letter list.
    pub dead_lettered: usize,
    /// Operations not attempted because an earlier one of the same course failed.
    pub skipped: usize,
}

/// Snapshot of the engine's sync state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub online: bool,
    pub draining: bool,
    pub pending: usize,
    pub dead_letters: usize,
    pub last_synced_at: Option<DateTime<Utc>>,
}

struct EngineState<S: KvStore> {
    cache: EntityCache<S>,
    queue: PendingQueue<S>,
    meta: S,
}

/// Clears the drain flag when a drain ends, however it ends.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates cache, queue, connectivity and the remote service.
pub struct SyncEngine<S: KvStore, R: RemoteCourseService> {
    state: Mutex<EngineState<S>>,
    remote: R,
    identity: Arc<dyn IdentityProvider>,
    monitor: Arc<ConnectivityMonitor>,
    config: SyncConfig,
    draining: AtomicBool,
    seen_online: AtomicBool,
    pending: AtomicUsize,
    dead: AtomicUsize,
    last_synced: RwLock<Option<DateTime<Utc>>>,
}

impl<S, R> SyncEngine<S, R>
where
    S: KvStore + Clone,
    R: RemoteCourseService,
{
    /// Opens the engine over `store`, loading cached courses and the queue.
    pub fn open(
        store: S,
        remote: R,
        identity: Arc<dyn IdentityProvider>,
        monitor: Arc<ConnectivityMonitor>,
        config: SyncConfig,
    ) -> Result<Self> {
        Self::open_with_clock(store, remote, identity, monitor, config, OpClock::system())
    }

    /// Like [`SyncEngine::open`] with an explicit clock for queue stamps.
    pub fn open_with_clock(
        store: S,
        remote: R,
        identity: Arc<dyn IdentityProvider>,
        monitor: Arc<ConnectivityMonitor>,
        config: SyncConfig,
        clock: OpClock,
    ) -> Result<Self> {
        config.validate()?;

        let cache = EntityCache::open(store.clone())?;
        let queue = PendingQueue::open_with_clock(store.clone(), clock)?;
        let last_synced_at = read_last_synced_at(&store)?;
        let online = monitor.is_connected();

        tracing::debug!(
            pending = queue.len(),
            enrolled = cache.enrolled_ids().len(),
            online,
            "sync engine opened"
        );

        let pending = AtomicUsize::new(queue.len());
        let dead = AtomicUsize::new(queue.dead_letters().len());

        Ok(SyncEngine {
            state: Mutex::new(EngineState {
                cache,
                queue,
                meta: store,
            }),
            remote,
            identity,
            monitor,
            config,
            draining: AtomicBool::new(false),
            seen_online: AtomicBool::new(online),
            pending,
            dead,
            last_synced: RwLock::new(last_synced_at),
        })
    }
}

impl<S, R> SyncEngine<S, R>
where
    S: KvStore,
    R: RemoteCourseService,
{
    fn require_identity(&self) -> Result<String> {
        self.identity.current_user().ok_or(Error::Auth)
    }

    /// Enrolls the learner in `course`.
    pub async fn enroll(&self, course: Course) -> Result<ActionOutcome> {
        let user = self.require_identity()?;
        let mut state = self.state.lock().await;

        state.cache.put(course.clone())?;
        state.cache.add_enrolled(&course.id)?;
        tracing::debug!(%user, course_id = %course.id, "enrolled locally");

        self.submit(&mut state, OpKind::enrollment(course)).await
    }

    /// Sets the progress of a course, clamped to 100.
    pub async fn update_progress(&self, course_id: &str, progress: u8) -> Result<ActionOutcome> {
        self.require_identity()?;
        let progress = progress.min(100);
        let mut state = self.state.lock().await;

        let updated = state.cache.update(course_id, |mut course| {
            course.set_progress(progress);
            course
        })?;
        if updated.is_none() {
            tracing::debug!(course_id, "progress update for uncached course");
        }

        self.submit(&mut state, OpKind::progress_update(course_id, progress)).await
    }

    /// Marks a module completed and recomputes the course progress.
    pub async fn complete_module(&self, course_id: &str, module_id: &str) -> Result<ActionOutcome> {
        self.require_identity()?;
        let mut state = self.state.lock().await;

        let mut known_module = false;
        let updated = state.cache.update(course_id, |mut course| {
            known_module = course.complete_module(module_id);
            course
        })?;
        if updated.is_none() {
            tracing::debug!(course_id, module_id, "module completion for uncached course");
        } else if !known_module {
            tracing::debug!(course_id, module_id, "module completion for unknown module");
        }

        self.submit(&mut state, OpKind::module_completion(course_id, module_id)).await
    }

    /// Returns the enrolled courses.
    ///
    /// Offline, the cached list is returned as is. Online, the remote list
    /// replaces the cached one; operations still pending are re-applied on
    /// top so optimistic writes stay visible. If the remote call fails the
    /// cached list is returned, unless it is empty.
    pub async fn get_enrolled_courses(&self) -> Result<Vec<Course>> {
        let mut state = self.state.lock().await;

        if !self.monitor.is_connected() {
            return Ok(state.cache.list_enrolled());
        }

        if !state.queue.is_empty() {
            self.drain_locked(&mut state).await?;
        }

        match self.remote.list_enrollments().await {
            Ok(courses) => {
                state.cache.replace_enrolled(courses)?;
                for op in state.queue.list() {
                    apply_locally(&mut state.cache, &op.kind)?;
                }
                Ok(state.cache.list_enrolled())
            }
            Err(err) => {
                let cached = state.cache.list_enrolled();
                if cached.is_empty() {
                    return Err(err.into());
                }
                tracing::warn!(error = %err, "listing enrollments failed, serving cached courses");
                Ok(cached)
            }
        }
    }

    /// Returns one cached course.
    pub async fn cached_course(&self, course_id: &str) -> Result<Option<Course>> {
        self.state.lock().await.cache.get(course_id)
    }

    /// Operations waiting for the remote, oldest first.
    pub async fn pending_operations(&self) -> Vec<PendingOperation> {
        self.state.lock().await.queue.list()
    }

    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.state.lock().await.queue.dead_letters().to_vec()
    }

    /// Requeues every dead letter in its original position.
    pub async fn retry_dead_letters(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let moved = state.queue.retry_dead_letters();
        self.publish_counts(&state);
        moved
    }

    /// Time of the last completed drain.
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        *self.last_synced.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the current sync state without waiting for a running drain.
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            online: self.monitor.is_connected(),
            draining: self.draining.load(Ordering::Acquire),
            pending: self.pending.load(Ordering::Acquire),
            dead_letters: self.dead.load(Ordering::Acquire),
            last_synced_at: self.last_synced_at(),
        }
    }

    fn publish_counts(&self, state: &EngineState<S>) {
        self.pending.store(state.queue.len(), Ordering::Release);
        self.dead.store(state.queue.dead_letters().len(), Ordering::Release);
    }

    /// Journals an accepted action, then sends it if the remote is reachable.
    ///
    /// The operation is queued before any remote call so that it survives the
    /// caller dropping the future mid-flight; an acknowledged send removes it
    /// again.
    async fn submit(&self, state: &mut EngineState<S>, kind: OpKind) -> Result<ActionOutcome> {
        let outcome = self.send_or_queue(state, kind).await;
        self.publish_counts(state);
        outcome
    }

    async fn send_or_queue(
        &self,
        state: &mut EngineState<S>,
        kind: OpKind,
    ) -> Result<ActionOutcome> {
        let op = state.queue.enqueue(kind)?;

        if !self.monitor.is_connected() {
            tracing::debug!(op_id = %op.id, op = %op.kind, "offline, queued");
            return Ok(ActionOutcome::Queued(op));
        }

        if state.queue.len() > 1 {
            // Older operations go first; replay the whole queue now
            self.drain_locked(state).await?;
            if state.queue.get(&op.id).is_some() {
                return Ok(ActionOutcome::Queued(op));
            }
            let dead_letters = state.queue.dead_letters();
            if let Some(dead) = dead_letters.iter().find(|d| d.op.id == op.id) {
                return Ok(ActionOutcome::DeadLettered(dead.clone()));
            }
            return Ok(ActionOutcome::Acknowledged);
        }

        match dispatch(&self.remote, &op.kind).await {
            Ok(()) => {
                if let Err(err) = state.queue.remove(&op.id) {
                    tracing::warn!(op_id = %op.id, error = %err, "acknowledged op stays queued");
                }
                Ok(ActionOutcome::Acknowledged)
            }
            Err(err) => {
                tracing::warn!(op_id = %op.id, error = %err, "direct send failed, queued");
                Ok(ActionOutcome::Queued(op))
            }
        }
    }

    /// Replays the pending queue against the remote.
    pub async fn drain(&self) -> Result<DrainReport> {
        let mut state = self.state.lock().await;
        self.drain_locked(&mut state).await
    }

    /// Runs one drain pass with the state lock held.
    ///
    /// Every drain, whatever triggered it, is visible through
    /// [`SyncStatus::draining`] while it runs.
    async fn drain_locked(&self, state: &mut EngineState<S>) -> Result<DrainReport> {
        // A reconnect drain has already raised the flag and owns clearing it
        let _guard = if self.draining.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(DrainGuard(&self.draining))
        };

        let report = self.replay(state).await;
        self.publish_counts(state);
        report
    }

    async fn replay(&self, state: &mut EngineState<S>) -> Result<DrainReport> {
        let ops = state.queue.list();
        let mut report = DrainReport::default();
        let mut held_back: HashSet<String> = HashSet::new();

        if !ops.is_empty() {
            tracing::info!(count = ops.len(), "draining pending operations");
        }

        for op in ops {
            if held_back.contains(op.course_id()) {
                report.skipped += 1;
                continue;
            }

            match dispatch(&self.remote, &op.kind).await {
                Ok(()) => {
                    state.queue.remove(&op.id)?;
                    report.sent += 1;
                }
                Err(err) if err.is_transient() => {
                    let reason = err.to_string();
                    let attempts =
                        state.queue.record_failure(&op.id, &reason)?.unwrap_or(op.attempts + 1);
                    held_back.insert(op.course_id().to_string());

                    if attempts >= self.config.max_attempts {
                        let why = format!("gave up after {attempts} attempts: {reason}");
                        state.queue.dead_letter(&op.id, &why)?;
                        report.dead_lettered += 1;
                    } else {
                        tracing::warn!(op_id = %op.id, attempts, error = %err, "replay failed");
                        report.retained += 1;
                    }
                }
                Err(err) => {
                    state.queue.dead_letter(&op.id, &err.to_string())?;
                    report.dead_lettered += 1;
                }
            }
        }

        let now = Utc::now();
        write_json(&state.meta, LAST_SYNC_KEY, &now)?;
        *self.last_synced.write().unwrap_or_else(|e| e.into_inner()) = Some(now);

        tracing::info!(
            sent = report.sent,
            retained = report.retained,
            dead_lettered = report.dead_lettered,
            skipped = report.skipped,
            "drain finished"
        );
        Ok(report)
    }

    /// Reacts to a connectivity transition.
    ///
    /// Only the offline to online edge drains; a repeated online event or an
    /// edge arriving while a drain is running is ignored. Returns the drain
    /// report when a drain ran.
    pub async fn handle_connectivity(
        &self,
        event: ConnectivityEvent,
    ) -> Result<Option<DrainReport>> {
        let was_online = self.seen_online.swap(event.is_online(), Ordering::AcqRel);
        if !event.is_online() || was_online {
            return Ok(None);
        }

        if self.draining.swap(true, Ordering::AcqRel) {
            tracing::debug!("drain already running, ignoring reconnect");
            return Ok(None);
        }
        let _guard = DrainGuard(&self.draining);

        tracing::info!("connectivity restored");
        self.drain().await.map(Some)
    }

    /// Drains whenever connectivity returns, until `cancel` fires.
    ///
    /// Pending operations are replayed immediately if the remote is already
    /// reachable when the loop starts.
    pub async fn run(&self, cancel: CancellationToken) {
        let monitor = self.monitor.clone();
        let mut events = monitor.subscribe();

        if monitor.is_connected() {
            self.seen_online.store(true, Ordering::Release);
            if self.pending.load(Ordering::Acquire) > 0 {
                if let Err(err) = self.drain().await {
                    tracing::error!(error = %err, "startup drain failed");
                }
            }
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.next() => {
                    let Some(event) = event else { break };
                    if let Err(err) = self.handle_connectivity(event).await {
                        tracing::error!(error = %err, "drain after reconnect failed");
                    }
                }
            }
        }
    }

    /// Polls `probe` every `probe_interval_ms` and feeds the results to the
    /// engine's connectivity monitor until `cancel` fires.
    pub fn spawn_poller<P>(&self, probe: P, cancel: CancellationToken) -> JoinHandle<()>
    where
        P: ReachabilityProbe + 'static,
    {
        connectivity::spawn_poller(
            self.monitor.clone(),
            probe,
            self.config.probe_interval(),
            cancel,
        )
    }
}

/// Re-applies a pending mutation to freshly fetched cache contents.
fn apply_locally<S: KvStore>(cache: &mut EntityCache<S>, kind: &OpKind) -> Result<()> {
    match kind {
        OpKind::Enrollment { course } => {
            if cache.get(&course.id)?.is_none() {
                cache.put(course.clone())?;
            }
            cache.add_enrolled(&course.id)?;
        }
        OpKind::ProgressUpdate { course_id, progress } => {
            cache.update(course_id, |mut c| {
                c.set_progress(*progress);
                c
            })?;
        }
        OpKind::ModuleCompletion { course_id, module_id } => {
            cache.update(course_id, |mut c| {
                c.complete_module(module_id);
                c
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
