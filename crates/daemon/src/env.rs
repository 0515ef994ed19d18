// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: DWELL_STATE_DIR > XDG_STATE_HOME/dwell > ~/.local/state/dwell
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("DWELL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("dwell"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/dwell"))
}

/// Config file override
pub fn config_path() -> Option<PathBuf> {
    std::env::var("DWELL_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Poll interval override, in milliseconds
pub fn poll_override() -> Option<Duration> {
    std::env::var("DWELL_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
