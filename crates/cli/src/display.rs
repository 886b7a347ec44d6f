// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use lsync_core::{Course, DeadLetter, PendingOperation};

/// Format a timestamp for human output.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format the last sync time, or "never".
pub fn format_last_sync(at: Option<&DateTime<Utc>>) -> String {
    at.map(format_time).unwrap_or_else(|| "never".to_string())
}

/// Format a course as a single line: `{progress:>3}% {id}: {title}`.
pub fn format_course_line(course: &Course) -> String {
    format!("{:>3}% {}: {}", course.progress, course.id, course.title)
}

/// Format a course with its modules, one per line.
pub fn format_course_detail(course: &Course) -> String {
    let mut out = format!("{}: {}\n", course.id, course.title);
    if course.modules.is_empty() {
        out.push_str(&format!("Progress: {}%\n", course.progress));
    } else {
        out.push_str(&format!(
            "Progress: {}% ({}/{} modules)\n",
            course.progress,
            course.completed_count(),
            course.modules.len()
        ));
    }
    if let Some(level) = &course.level {
        out.push_str(&format!("Level: {level}\n"));
    }
    if let Some(duration) = &course.duration {
        out.push_str(&format!("Duration: {duration}\n"));
    }
    if !course.modules.is_empty() {
        out.push_str("\nModules:\n");
        for module in &course.modules {
            let mark = if module.completed { "x" } else { " " };
            out.push_str(&format!("  [{mark}] {}: {}\n", module.id, module.title));
        }
    }
    out
}

/// Format a pending operation: `{id} {stamp} {kind}`, with retry details
/// once it has failed.
pub fn format_pending_line(op: &PendingOperation) -> String {
    let mut line = format!("{} {} {}", op.id, op.created_at, op.kind);
    if op.attempts > 0 {
        line.push_str(&format!(" (attempts: {}", op.attempts));
        if let Some(err) = &op.last_error {
            line.push_str(&format!(", last error: {err}"));
        }
        line.push(')');
    }
    line
}

/// Format a dead letter: `{id} {kind}: {reason}` followed by when it died.
pub fn format_dead_letter_line(dead: &DeadLetter) -> String {
    format!(
        "{} {}: {} [{}]",
        dead.op.id,
        dead.op.kind,
        dead.reason,
        format_time(&dead.dead_at)
    )
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
