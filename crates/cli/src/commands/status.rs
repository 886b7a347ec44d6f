// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use lsync_core::read_last_synced_at;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::display::format_last_sync;
use crate::error::Result;

use super::{write_json, State};

#[derive(Debug, Serialize)]
struct StatusReport {
    enrolled: usize,
    pending: usize,
    dead_letters: usize,
    last_synced_at: Option<DateTime<Utc>>,
    max_attempts: u32,
}

pub fn run(state: &State, output: OutputFormat) -> Result<()> {
    run_impl(state, output, &mut io::stdout().lock())
}

pub(crate) fn run_impl(state: &State, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let cache = state.cache()?;
    let queue = state.queue()?;
    let report = StatusReport {
        enrolled: cache.enrolled_ids().len(),
        pending: queue.len(),
        dead_letters: queue.dead_letters().len(),
        last_synced_at: read_last_synced_at(&*state.store)?,
        max_attempts: state.config.sync.max_attempts,
    };

    match output {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => {
            writeln!(out, "Enrolled courses: {}", report.enrolled)?;
            writeln!(out, "Pending operations: {}", report.pending)?;
            writeln!(out, "Dead letters: {}", report.dead_letters)?;
            writeln!(out, "Last sync: {}", format_last_sync(report.last_synced_at.as_ref()))?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
