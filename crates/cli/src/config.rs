// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State directory resolution and configuration loading.
//!
//! All on-device state lives in one directory:
//! - `lsync.db`: SQLite store holding the course cache, pending queue,
//!   dead letters and last sync time
//! - `config.toml`: optional `[sync]` tunables

use std::fs;
use std::path::{Path, PathBuf};

use lsync_core::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "lsync.db";

/// Configuration stored in `config.toml` under the state directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Loads configuration from `state_dir`, falling back to defaults when
    /// no config file exists.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.sync.validate()?;
        Ok(config)
    }

}

/// Picks the state directory from, in order: the `--state-dir` flag,
/// `LSYNC_STATE_DIR`, `$XDG_STATE_HOME/lsync`, `~/.local/state/lsync`.
pub fn resolve_state_dir(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = flag.or(env_dir) {
        return dir;
    }
    if let Some(dir) = xdg_state_home {
        return dir.join("lsync");
    }
    home.map(|h| h.join(".local/state/lsync"))
        .unwrap_or_else(|| PathBuf::from(".local/state/lsync"))
}

/// Resolves the state directory from the flag and the process environment.
pub fn state_dir(flag: Option<PathBuf>) -> PathBuf {
    resolve_state_dir(flag, env::state_dir(), env::xdg_state_home(), dirs::home_dir())
}

/// Path of the SQLite store inside `state_dir`.
pub fn db_path(state_dir: &Path) -> PathBuf {
    state_dir.join(DB_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
