// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod courses;
pub mod dead;
pub mod pending;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use lsync_core::{EntityCache, PendingQueue, SqliteStore};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::{db_path, Config};
use crate::error::Result;

/// On-device state opened from a state directory.
pub struct State {
    pub store: Arc<SqliteStore>,
    pub config: Config,
}

impl State {
    /// Opens the store and config under `state_dir`, creating the directory
    /// on first use.
    pub fn open(state_dir: &Path) -> Result<Self> {
        let config = Config::load(state_dir)?;
        let path = db_path(state_dir);
        tracing::debug!(path = %path.display(), "opening state");
        let store = Arc::new(SqliteStore::open(&path)?);
        Ok(State { store, config })
    }

    pub fn cache(&self) -> Result<EntityCache<Arc<SqliteStore>>> {
        Ok(EntityCache::open(self.store.clone())?)
    }

    pub fn queue(&self) -> Result<PendingQueue<Arc<SqliteStore>>> {
        Ok(PendingQueue::open(self.store.clone())?)
    }
}

/// Writes `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes items one per line, or `empty` when there are none, or JSON.
fn write_list<T, F>(
    out: &mut impl Write,
    items: &[T],
    output: OutputFormat,
    empty: &str,
    line: F,
) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output {
        OutputFormat::Json => write_json(out, items),
        OutputFormat::Text if items.is_empty() => {
            writeln!(out, "{empty}")?;
            Ok(())
        }
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", line(item))?;
            }
            Ok(())
        }
    }
}
