// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for lsync-core tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Notify, Semaphore};

use crate::clock::ClockSource;
use crate::course::{Course, Module};
use crate::error::{Error, Result};
use crate::remote::{RemoteCourseService, RemoteError, RemoteFuture, RemoteResult};
use crate::store::{KvStore, MemoryStore};

/// Clock with controllable time.
pub struct MockClock {
    time_ms: AtomicU64,
}

impl MockClock {
    pub fn new(initial_ms: u64) -> Self {
        MockClock { time_ms: AtomicU64::new(initial_ms) }
    }

    pub fn set(&self, ms: u64) {
        self.time_ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.time_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.time_ms.load(Ordering::SeqCst)
    }
}

/// Creates a course with modules `m1..=mN`, none completed.
pub fn course_with_modules(id: &str, count: usize) -> Course {
    let modules = (1..=count)
        .map(|i| Module::new(format!("m{i}"), format!("Module {i}")))
        .collect();
    Course::new(id, format!("Course {id}")).with_modules(modules)
}

/// In-memory store whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KvStore for FlakyStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage(format!("injected write failure for {key}")));
        }
        self.inner.write(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key)
    }
}

/// A call observed by [`MockRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Enroll(String),
    UpdateProgress(String, u8),
    CompleteModule(String, String),
    ListEnrollments,
}

/// Scriptable in-memory remote course service.
///
/// Successful mutations update the mock's server-side enrollments, so
/// `list_enrollments` reflects what has been acknowledged.
///
/// While paused, every call is recorded and then parked until
/// [`MockRemote::resume`].
#[derive(Default)]
pub struct MockRemote {
    calls: Mutex<Vec<RemoteCall>>,
    enrollments: Mutex<Vec<Course>>,
    failure: Mutex<Option<RemoteError>>,
    course_failures: Mutex<HashMap<String, RemoteError>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    entered: Notify,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Makes every call fail with `err` (or succeed again with `None`).
    pub fn set_failure(&self, err: Option<RemoteError>) {
        *self.failure.lock().unwrap() = err;
    }

    /// Makes mutations of one course fail with `err`.
    pub fn fail_course(&self, course_id: &str, err: RemoteError) {
        self.course_failures.lock().unwrap().insert(course_id.to_string(), err);
    }

    pub fn set_enrollments(&self, courses: Vec<Course>) {
        *self.enrollments.lock().unwrap() = courses;
    }

    pub fn enrollments(&self) -> Vec<Course> {
        self.enrollments.lock().unwrap().clone()
    }

    /// Parks every following call until [`MockRemote::resume`].
    pub fn pause(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Releases parked calls and lets later calls through.
    pub fn resume(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.close();
        }
    }

    /// Waits until a call has been parked by [`MockRemote::pause`].
    pub async fn wait_parked(&self) {
        self.entered.notified().await;
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            // Closed on resume
            let _ = gate.acquire().await;
        }
    }

    async fn respond(&self, call: RemoteCall, course_id: Option<&str>) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(call);
        self.pass_gate().await;
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        if let Some(id) = course_id {
            if let Some(err) = self.course_failures.lock().unwrap().get(id) {
                return Err(err.clone());
            }
        }
        Ok(())
    }

    fn with_server_course(&self, course_id: &str, f: impl FnOnce(&mut Course)) {
        let mut enrollments = self.enrollments.lock().unwrap();
        if let Some(course) = enrollments.iter_mut().find(|c| c.id == course_id) {
            f(course);
        }
    }
}

impl RemoteCourseService for MockRemote {
    fn enroll<'a>(&'a self, course: &'a Course) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.respond(RemoteCall::Enroll(course.id.clone()), Some(&course.id)).await?;
            let mut enrollments = self.enrollments.lock().unwrap();
            if !enrollments.iter().any(|c| c.id == course.id) {
                enrollments.push(course.clone());
            }
            Ok(())
        })
    }

    fn update_progress<'a>(&'a self, course_id: &'a str, progress: u8) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let call = RemoteCall::UpdateProgress(course_id.to_string(), progress);
            self.respond(call, Some(course_id)).await?;
            self.with_server_course(course_id, |c| c.set_progress(progress));
            Ok(())
        })
    }

    fn complete_module<'a>(
        &'a self,
        course_id: &'a str,
        module_id: &'a str,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.respond(
                RemoteCall::CompleteModule(course_id.to_string(), module_id.to_string()),
                Some(course_id),
            )
            .await?;
            self.with_server_course(course_id, |c| {
                c.complete_module(module_id);
            });
            Ok(())
        })
    }

    fn list_enrollments(&self) -> RemoteFuture<'_, Vec<Course>> {
        Box::pin(async move {
            self.respond(RemoteCall::ListEnrollments, None).await?;
            Ok(self.enrollments())
        })
    }
}
