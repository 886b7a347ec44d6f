// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lsync-core operations.

use std::fmt;

use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in lsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "not signed in\n  hint: enrolling and recording progress require an authenticated learner"
    )]
    Auth,

    #[error("network unavailable: {0}")]
    Network(String),

    #[error("remote rejected request: {0}")]
    Remote(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error taxonomy used to decide how a failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No authenticated identity; fatal to the action, never retried.
    Auth,
    /// Remote unreachable; triggers the queue fallback.
    Network,
    /// Remote reachable but refused the request.
    Remote,
    /// Durable persistence failed; fatal to the triggering call.
    Storage,
    /// Caller supplied something that does not exist or is out of range.
    Input,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Auth => "auth",
            ErrorCategory::Network => "network",
            ErrorCategory::Remote => "remote",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Input => "input",
        };
        write!(f, "{s}")
    }
}

impl Error {
    /// Returns the taxonomy kind of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Auth => ErrorCategory::Auth,
            Error::Network(_) => ErrorCategory::Network,
            Error::Remote(_) => ErrorCategory::Remote,
            Error::Storage(_) | Error::Database(_) | Error::Io(_) | Error::Json(_) => {
                ErrorCategory::Storage
            }
            Error::CourseNotFound(_) | Error::InvalidConfig(_) => ErrorCategory::Input,
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(msg) => Error::Network(msg),
            rejected @ RemoteError::Rejected { .. } => Error::Remote(rejected.to_string()),
        }
    }
}

/// A specialized Result type for lsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
