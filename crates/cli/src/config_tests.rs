// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[parameterized(
    flag_wins = { Some("/flag"), Some("/env"), Some("/xdg"), "/flag" },
    env_over_xdg = { None, Some("/env"), Some("/xdg"), "/env" },
    xdg_gets_subdir = { None, None, Some("/xdg"), "/xdg/lsync" },
    home_fallback = { None, None, None, "/home/learner/.local/state/lsync" },
)]
fn test_resolve_state_dir(
    flag: Option<&str>,
    env_dir: Option<&str>,
    xdg: Option<&str>,
    expected: &str,
) {
    let dir = resolve_state_dir(
        flag.map(PathBuf::from),
        env_dir.map(PathBuf::from),
        xdg.map(PathBuf::from),
        Some(PathBuf::from("/home/learner")),
    );
    assert_eq!(dir, PathBuf::from(expected));
}

#[test]
fn test_resolve_state_dir_without_home() {
    let dir = resolve_state_dir(None, None, None, None);
    assert_eq!(dir, PathBuf::from(".local/state/lsync"));
}

#[test]
fn test_db_path() {
    assert_eq!(db_path(Path::new("/state")), PathBuf::from("/state/lsync.db"));
}

#[test]
fn test_load_missing_config_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.sync, SyncConfig::default());
}

#[test]
fn test_load_partial_sync_section() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "[sync]\nmax_attempts = 2\n").unwrap();

    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.sync.max_attempts, 2);
    assert_eq!(config.sync.probe_interval_ms, 5000);
}

#[test]
fn test_load_full_sync_section() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "[sync]\nmax_attempts = 9\nprobe_interval_ms = 250\n",
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.sync.max_attempts, 9);
    assert_eq!(config.sync.probe_interval(), std::time::Duration::from_millis(250));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "[sync\n").unwrap();

    let err = Config::load(temp.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn test_load_rejects_invalid_values() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "[sync]\nmax_attempts = 0\n").unwrap();

    assert!(matches!(
        Config::load(temp.path()),
        Err(Error::Core(lsync_core::Error::InvalidConfig(_)))
    ));
}
