// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables for the sync engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sync engine configuration.
///
/// Every field has a default, so an empty config section is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Failed replays after which an operation is dead-lettered (default: 5).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Interval between reachability probes in milliseconds (default: 5000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_probe_interval_ms() -> u64 {
    5000
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_attempts: default_max_attempts(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }
}

impl SyncConfig {
    /// Checks that values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be at least 1".into()));
        }
        if self.probe_interval_ms == 0 {
            return Err(Error::InvalidConfig("probe_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
