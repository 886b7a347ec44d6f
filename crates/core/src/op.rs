// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending operations awaiting acknowledgement by the remote service.
//!
//! Every mutation the learner makes while the remote cannot be reached is
//! recorded as a [`PendingOperation`]. Operations are ordered by their
//! creation [`Stamp`] and must be replayed in that order, since later
//! operations may depend on earlier ones (progress on a course depends on
//! the enrollment that created it server side).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::clock::Stamp;
use crate::course::Course;

/// The mutation carried by a pending operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpKind {
    /// Enroll the learner in a course.
    Enrollment { course: Course },

    /// Set the progress percentage of a course.
    ProgressUpdate { course_id: String, progress: u8 },

    /// Mark a module of a course completed.
    ModuleCompletion { course_id: String, module_id: String },
}

impl OpKind {
    pub fn enrollment(course: Course) -> Self {
        OpKind::Enrollment { course }
    }

    pub fn progress_update(course_id: impl Into<String>, progress: u8) -> Self {
        OpKind::ProgressUpdate { course_id: course_id.into(), progress }
    }

    pub fn module_completion(course_id: impl Into<String>, module_id: impl Into<String>) -> Self {
        OpKind::ModuleCompletion { course_id: course_id.into(), module_id: module_id.into() }
    }

    /// Returns the course affected by this operation.
    pub fn course_id(&self) -> &str {
        match self {
            OpKind::Enrollment { course } => &course.id,
            OpKind::ProgressUpdate { course_id, .. } => course_id,
            OpKind::ModuleCompletion { course_id, .. } => course_id,
        }
    }

    /// Short tag naming the operation type.
    pub fn tag(&self) -> &'static str {
        match self {
            OpKind::Enrollment { .. } => "enrollment",
            OpKind::ProgressUpdate { .. } => "progress_update",
            OpKind::ModuleCompletion { .. } => "module_completion",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Enrollment { course } => write!(f, "enroll {}", course.id),
            OpKind::ProgressUpdate { course_id, progress } => {
                write!(f, "progress {course_id} -> {progress}%")
            }
            OpKind::ModuleCompletion { course_id, module_id } => {
                write!(f, "complete {course_id}/{module_id}")
            }
        }
    }
}

/// A mutation that has been applied locally but not yet acknowledged remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingOperation {
    /// Unique identifier used for idempotent removal.
    pub id: String,
    pub created_at: Stamp,
    pub kind: OpKind,
    /// Number of failed replay attempts.
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl PendingOperation {
    /// Creates a new operation, deriving its id from the stamp and payload.
    pub fn new(created_at: Stamp, kind: OpKind) -> Self {
        let id = generate_op_id(&created_at, &kind);
        PendingOperation { id, created_at, kind, attempts: 0, last_error: None }
    }

    pub fn course_id(&self) -> &str {
        self.kind.course_id()
    }
}

impl PartialOrd for PendingOperation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingOperation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.created_at.cmp(&other.created_at).then_with(|| self.id.cmp(&other.id))
    }
}

/// An operation that was taken out of replay because it cannot succeed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadLetter {
    pub op: PendingOperation,
    pub reason: String,
    pub dead_at: DateTime<Utc>,
}

/// Generate an operation ID from its stamp and payload.
/// Format: `op-{hash}` where hash is the first 16 hex chars of SHA256(stamp + tag + payload).
pub fn generate_op_id(created_at: &Stamp, kind: &OpKind) -> String {
    let payload = serde_json::to_string(kind).unwrap_or_default();
    let input = format!("{}{}{}", created_at, kind.tag(), payload);
    let hash = Sha256::digest(input.as_bytes());
    format!("op-{}", hex::encode(&hash[..8]))
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
