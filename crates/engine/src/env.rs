// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use bk_adapters::HttpOperationConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default pause between consecutive operation calls
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("cannot resolve a state directory: set BK_STATE_DIR or HOME")]
    NoStateDir,
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

/// Minimum interval between operation calls (`BK_MIN_INTERVAL_MS`, default 1000ms).
pub fn min_interval() -> Duration {
    millis("BK_MIN_INTERVAL_MS").unwrap_or(DEFAULT_MIN_INTERVAL)
}

/// Resume from checkpoints unless `BK_RESUME` is `0` or `false`.
pub fn resume_enabled() -> bool {
    match std::env::var("BK_RESUME") {
        Ok(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false"),
        Err(_) => true,
    }
}

/// Resolve state directory: BK_STATE_DIR > XDG_STATE_HOME/bulk > ~/.local/state/bulk
pub fn state_dir() -> Result<PathBuf, EnvError> {
    if let Ok(dir) = std::env::var("BK_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("bulk"));
    }
    let home = dirs::home_dir().ok_or(EnvError::NoStateDir)?;
    Ok(home.join(".local/state/bulk"))
}

/// Per-request deadline for the HTTP operation (`BK_OPERATION_TIMEOUT_MS`, default 30s).
pub fn operation_timeout() -> Duration {
    millis("BK_OPERATION_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

/// HTTP operation settings, when `BK_OPERATION_URL` is set.
pub fn http_operation_config() -> Option<HttpOperationConfig> {
    let endpoint = std::env::var("BK_OPERATION_URL").ok().filter(|s| !s.is_empty())?;
    let mut config = HttpOperationConfig::new(endpoint).timeout(operation_timeout());
    if let Some(token) = std::env::var("BK_OPERATION_TOKEN").ok().filter(|s| !s.is_empty()) {
        config = config.bearer_token(token);
    }
    Some(config)
}

/// Knobs of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub min_interval: Duration,
    /// Record outcomes and skip already-recorded targets on restart
    pub resume: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { min_interval: DEFAULT_MIN_INTERVAL, resume: true }
    }
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self { min_interval: min_interval(), resume: resume_enabled() }
    }

    bk_core::setters! {
        set { min_interval: Duration, resume: bool }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
