// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! lsyncrs - operator tooling for the on-device course sync state.
//!
//! This crate backs the `lsync` CLI. It opens the SQLite store written by
//! [`lsync_core::SyncEngine`] and lets an operator inspect the cached
//! courses, the pending queue and the dead letters, or reset them, without
//! contacting the remote course service.
//!
//! ```rust,ignore
//! use clap::Parser;
//! use lsyncrs::{run, Cli};
//!
//! run(Cli::parse_from(["lsync", "--state-dir", "/tmp/state", "pending"]))?;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod env;
pub mod error;

pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

use commands::State;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = config::state_dir(cli.state_dir);
    let state = State::open(&state_dir)?;

    match cli.command {
        Command::Status { output } => commands::status::run(&state, output),
        Command::Courses { output } => commands::courses::list(&state, output),
        Command::Show { course_id, output } => commands::courses::show(&state, &course_id, output),
        Command::Pending { output } => commands::pending::list(&state, output),
        Command::DeadLetters { output } => commands::dead::list(&state, output),
        Command::RetryDead => commands::dead::retry(&state),
        Command::ClearQueue => commands::pending::clear(&state),
        Command::ClearDead => commands::dead::clear(&state),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
