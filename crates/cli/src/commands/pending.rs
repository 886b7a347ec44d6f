// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::display::format_pending_line;
use crate::error::Result;

use super::{write_list, State};

/// Lists pending operations, oldest first.
pub fn list(state: &State, output: OutputFormat) -> Result<()> {
    list_impl(state, output, &mut io::stdout().lock())
}

pub(crate) fn list_impl(state: &State, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let ops = state.queue()?.list();
    write_list(out, &ops, output, "No pending operations", format_pending_line)
}

/// Discards every pending operation.
pub fn clear(state: &State) -> Result<()> {
    clear_impl(state, &mut io::stdout().lock())
}

pub(crate) fn clear_impl(state: &State, out: &mut impl Write) -> Result<()> {
    let mut queue = state.queue()?;
    let count = queue.len();
    queue.clear()?;
    tracing::info!(count, "cleared pending queue");
    writeln!(out, "Cleared {} pending operation(s)", count)?;
    Ok(())
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
