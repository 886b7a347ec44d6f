// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote course service abstraction.
//!
//! The authoritative store of enrollments and progress lives behind this
//! trait. Production code plugs in an HTTP client; tests use an in-memory
//! mock. All calls are safe to retry from the engine's point of view.

use std::future::Future;
use std::pin::Pin;

use crate::course::Course;
use crate::op::OpKind;

/// Error returned by the remote course service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The service could not be reached. Worth retrying later.
    #[error("network error: {0}")]
    Network(String),

    /// The service was reached and refused the request. Retrying the same
    /// request will not help.
    #[error("rejected ({code}): {message}")]
    Rejected { code: u16, message: String },
}

impl RemoteError {
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        RemoteError::Rejected { code, message: message.into() }
    }

    /// Returns true if the failure may go away on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Network(_))
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by remote calls.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// The remote system of record for enrollments and progress.
pub trait RemoteCourseService: Send + Sync {
    /// Enroll the signed-in learner in a course.
    fn enroll<'a>(&'a self, course: &'a Course) -> RemoteFuture<'a, ()>;

    /// Set the progress percentage of an enrolled course.
    fn update_progress<'a>(&'a self, course_id: &'a str, progress: u8) -> RemoteFuture<'a, ()>;

    /// Mark a module of an enrolled course completed.
    fn complete_module<'a>(&'a self, course_id: &'a str, module_id: &'a str)
        -> RemoteFuture<'a, ()>;

    /// List the learner's enrollments in server order.
    fn list_enrollments(&self) -> RemoteFuture<'_, Vec<Course>>;
}

impl<R: RemoteCourseService + ?Sized> RemoteCourseService for std::sync::Arc<R> {
    fn enroll<'a>(&'a self, course: &'a Course) -> RemoteFuture<'a, ()> {
        (**self).enroll(course)
    }

    fn update_progress<'a>(&'a self, course_id: &'a str, progress: u8) -> RemoteFuture<'a, ()> {
        (**self).update_progress(course_id, progress)
    }

    fn complete_module<'a>(
        &'a self,
        course_id: &'a str,
        module_id: &'a str,
    ) -> RemoteFuture<'a, ()> {
        (**self).complete_module(course_id, module_id)
    }

    fn list_enrollments(&self) -> RemoteFuture<'_, Vec<Course>> {
        (**self).list_enrollments()
    }
}

/// Sends one queued mutation to the matching remote call.
pub async fn dispatch<R>(remote: &R, kind: &OpKind) -> RemoteResult<()>
where
    R: RemoteCourseService + ?Sized,
{
    match kind {
        OpKind::Enrollment { course } => remote.enroll(course).await,
        OpKind::ProgressUpdate { course_id, progress } => {
            remote.update_progress(course_id, *progress).await
        }
        OpKind::ModuleCompletion { course_id, module_id } => {
            remote.complete_module(course_id, module_id).await
        }
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
