// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: state paths, the single-writer lock, and runtime wiring.

mod run;
pub use run::Daemon;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dwell_adapters::{OutboxSink, TrelloExportSource};
use dwell_core::{Clock, Member, SystemClock};
use dwell_engine::{EngineError, Runtime, RuntimeDeps};
use dwell_storage::{FileStore, KvStore, StoreError};
use fs2::FileExt;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};

/// Daemon runtime with concrete adapter types
pub type DaemonRuntime = Runtime<FileStore, TrelloExportSource, OutboxSink, SystemClock>;

/// Fixed locations under the state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root state directory (e.g. ~/.local/state/dwell)
    pub state_dir: PathBuf,
    pub lock_path: PathBuf,
    pub store_path: PathBuf,
    pub outbox_path: PathBuf,
    pub logs_path: PathBuf,
    pub default_config_path: PathBuf,
}

impl Paths {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            lock_path: state_dir.join("dwelld.pid"),
            store_path: state_dir.join("store.json"),
            outbox_path: state_dir.join("outbox"),
            logs_path: state_dir.join("logs"),
            default_config_path: state_dir.join("dwell.toml"),
            state_dir,
        }
    }

    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::new(crate::env::state_dir()?))
    }

    /// `--config` > `DWELL_CONFIG` > `<state_dir>/dwell.toml`
    pub fn config_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(crate::env::config_path)
            .unwrap_or_else(|| self.default_config_path.clone())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: dwelld already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Take the exclusive lock on `path` and record our pid in it.
///
/// Released when the returned file is dropped.
pub fn acquire_lock(path: &Path) -> Result<File, LifecycleError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Opened without truncation so a running daemon's pid survives a failed attempt.
    let mut lock_file =
        std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// An opened runtime plus the lock that makes this process its only writer.
pub struct Opened {
    pub runtime: DaemonRuntime,
    // NOTE(lifetime): held to keep the exclusive lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

/// Lock the state directory, open the store, and install board settings.
pub fn open(config: &Config, paths: &Paths) -> Result<Opened, LifecycleError> {
    let lock_file = acquire_lock(&paths.lock_path)?;
    std::fs::create_dir_all(&paths.outbox_path)?;

    let store = FileStore::open(&paths.store_path)?;
    let source = TrelloExportSource::new(config.exports());
    let sink = OutboxSink::new(&paths.outbox_path, &config.sender);
    let poller = Member::new("poller", config.poller_name.as_str());

    let runtime = Runtime::new(RuntimeDeps { store, source, sink }, SystemClock, poller);
    install_boards(&runtime, config)?;

    info!(
        state_dir = %paths.state_dir.display(),
        boards = config.boards.len(),
        "state opened"
    );
    Ok(Opened { runtime, lock_file })
}

/// Write each configured board's settings into its board scope.
pub fn install_boards<S, Src, K, C>(
    runtime: &Runtime<S, Src, K, C>,
    config: &Config,
) -> Result<(), EngineError>
where
    S: KvStore,
    Src: dwell_adapters::StageSource,
    K: dwell_adapters::ReportSink,
    C: Clock,
{
    for board in &config.boards {
        runtime.install_settings(&board.id, &board.settings)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
