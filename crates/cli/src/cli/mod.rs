// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "lsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and maintain offline course progress sync state")]
#[command(
    long_about = "Inspect and maintain offline course progress sync state.\n\n\
    Reads the on-device course cache and pending operation queue without contacting the remote."
)]
pub struct Cli {
    /// Directory holding lsync.db and config.toml
    #[arg(long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show queue sizes and the last sync time
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List cached enrolled courses
    Courses {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one cached course with its modules
    #[command(arg_required_else_help = true)]
    Show {
        /// Course ID
        course_id: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List operations waiting to be sent, oldest first
    Pending {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List operations that were given up on
    #[command(name = "dead-letters")]
    DeadLetters {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Move every dead letter back into the pending queue
    #[command(name = "retry-dead")]
    RetryDead,

    /// Discard every pending operation
    #[command(name = "clear-queue")]
    ClearQueue,

    /// Discard every dead letter
    #[command(name = "clear-dead")]
    ClearDead,
}
