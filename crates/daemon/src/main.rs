// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dwelld: polls boards, tracks stage dwell time, and mails daily reports.

mod config;
mod env;
mod exit_error;
mod lifecycle;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dwell_core::{parse_duration, BoardId, ItemId};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::exit_error::{ExitError, EXIT_CONFIG, EXIT_LOCKED, EXIT_UNKNOWN_BOARD};
use crate::lifecycle::{Daemon, LifecycleError, Paths};

#[derive(Parser)]
#[command(name = "dwelld", version, about = "Track how long cards dwell in each board stage")]
struct Cli {
    /// Config file (default: $DWELL_CONFIG, then <state_dir>/dwell.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll every configured board and send the daily reports
    Run,
    /// Poll one board once
    Refresh { board: String },
    /// Compile and deliver a report for one board now
    Report {
        board: String,
        /// Only count movements inside this trailing window (e.g. 24h)
        #[arg(long, value_parser = parse_duration)]
        since: Option<Duration>,
        /// Period label used in the subject line
        #[arg(long, default_value = "Manual")]
        period: String,
    },
    /// Print the refreshed board snapshot as JSON
    Show { board: String },
    /// Forget everything tracked for one item
    Purge { item: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<ExitError>().map(|x| x.code).unwrap_or(1);
            let message = format!("{e:#}");
            if !message.is_empty() {
                eprintln!("dwelld: {message}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let paths = Paths::load().map_err(|e| ExitError::new(EXIT_CONFIG, e.to_string()))?;
    let config_path = paths.config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)
        .map_err(|e| ExitError::new(EXIT_CONFIG, e.to_string()))?;
    if let Some(interval) = env::poll_override() {
        config.poll_interval = interval;
    }

    let log_dir = matches!(cli.command, Command::Run).then_some(paths.logs_path.as_path());
    let _log_guard = logging::init(log_dir).context("failed to set up logging")?;

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(execute(cli.command, &config, &paths))
}

async fn execute(command: Command, config: &Config, paths: &Paths) -> anyhow::Result<()> {
    let opened = lifecycle::open(config, paths).map_err(|e| match e {
        LifecycleError::LockFailed(_) => anyhow::Error::new(ExitError::new(
            EXIT_LOCKED,
            format!("{} is locked by another dwelld", paths.state_dir.display()),
        )),
        other => anyhow::Error::new(other),
    })?;
    let runtime = opened.runtime;

    match command {
        Command::Run => {
            let boards = config.boards.iter().map(|b| b.id.clone()).collect();
            let daemon = Daemon::new(runtime, boards, config.poll_interval, config.report_time);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, stopping");
                }
                on_signal.cancel();
            });

            info!(pid = std::process::id(), "dwelld started");
            daemon.run(cancel).await;
        }
        Command::Refresh { board } => {
            let board = known_board(config, &board)?;
            let snapshot = runtime.refresh(&board).await?;
            println!(
                "{}: {} items, {} movements, {} failures",
                snapshot.board_name,
                snapshot.items.len(),
                snapshot.movement_count(),
                snapshot.failures.len()
            );
        }
        Command::Report { board, since, period } => {
            let board = known_board(config, &board)?;
            let outcome = runtime.report(&board, &period, since).await?;
            println!("{} -> {}", outcome.document.subject(), outcome.delivered.location);
        }
        Command::Show { board } => {
            let board = known_board(config, &board)?;
            let snapshot = runtime.refresh(&board).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Purge { item } => {
            runtime.purge(&ItemId::new(item.as_str()))?;
            println!("purged {item}");
        }
    }
    Ok(())
}

fn known_board(config: &Config, board: &str) -> Result<BoardId, ExitError> {
    let id = BoardId::new(board);
    match config.board(&id) {
        Some(_) => Ok(id),
        None => Err(ExitError::new(EXIT_UNKNOWN_BOARD, format!("unknown board: {board}"))),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
