// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::display::format_dead_letter_line;
use crate::error::Result;

use super::{write_list, State};

/// Lists dead letters in the order they were given up on.
pub fn list(state: &State, output: OutputFormat) -> Result<()> {
    list_impl(state, output, &mut io::stdout().lock())
}

pub(crate) fn list_impl(state: &State, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let queue = state.queue()?;
    write_list(out, queue.dead_letters(), output, "No dead letters", format_dead_letter_line)
}

/// Moves every dead letter back into the pending queue.
pub fn retry(state: &State) -> Result<()> {
    retry_impl(state, &mut io::stdout().lock())
}

pub(crate) fn retry_impl(state: &State, out: &mut impl Write) -> Result<()> {
    let count = state.queue()?.retry_dead_letters()?;
    writeln!(out, "Requeued {} dead letter(s)", count)?;
    Ok(())
}

/// Discards every dead letter.
pub fn clear(state: &State) -> Result<()> {
    clear_impl(state, &mut io::stdout().lock())
}

pub(crate) fn clear_impl(state: &State, out: &mut impl Write) -> Result<()> {
    let mut queue = state.queue()?;
    let count = queue.dead_letters().len();
    queue.clear_dead_letters()?;
    tracing::info!(count, "cleared dead letters");
    writeln!(out, "Cleared {} dead letter(s)", count)?;
    Ok(())
}

#[cfg(test)]
#[path = "dead_tests.rs"]
mod tests;
