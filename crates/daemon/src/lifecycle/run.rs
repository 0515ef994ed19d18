// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The poll/report loop.

use std::time::Duration;

use dwell_adapters::{ReportSink, StageSource};
use dwell_core::{BoardId, Clock, TimerId, TimerKind};
use dwell_engine::{DailySchedule, EngineError, Runtime, Scheduler};
use dwell_storage::KvStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Period label for scheduled reports
pub const DAILY_PERIOD: &str = "Daily";

/// Upper bound on a single sleep when nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_secs(60);

/// Drives one poll timer per board and one daily report timer per board.
pub struct Daemon<S, Src, K, C> {
    runtime: Runtime<S, Src, K, C>,
    boards: Vec<BoardId>,
    poll_interval: Duration,
    report_time: DailySchedule,
    scheduler: Scheduler,
}

impl<S, Src, K, C> Daemon<S, Src, K, C>
where
    S: KvStore,
    Src: StageSource,
    K: ReportSink,
    C: Clock,
{
    pub fn new(
        runtime: Runtime<S, Src, K, C>,
        boards: Vec<BoardId>,
        poll_interval: Duration,
        report_time: DailySchedule,
    ) -> Self {
        Self { runtime, boards, poll_interval, report_time, scheduler: Scheduler::new() }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Arm an immediate poll and the next daily report for every board.
    pub fn seed(&mut self) {
        let now = self.runtime.clock().now();
        let report_in = self.report_time.delay_from(self.runtime.clock().utc());
        for board in &self.boards {
            self.scheduler.set_timer(TimerId::poll(board), Duration::ZERO, now);
            self.scheduler.set_timer(TimerId::report(board), report_in, now);
        }
        info!(
            boards = self.boards.len(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            report_time = %self.report_time,
            "timers armed"
        );
    }

    /// Handle every due timer and return their ids.
    pub async fn tick(&mut self) -> Vec<TimerId> {
        let fired = self.scheduler.fired_timers(self.runtime.clock().now());
        for id in &fired {
            self.on_timer(id).await;
        }
        fired
    }

    async fn on_timer(&mut self, id: &TimerId) {
        match id.kind() {
            Some(TimerKind::Poll { board }) => {
                let board = BoardId::new(board);
                self.poll(&board).await;
                let now = self.runtime.clock().now();
                self.scheduler.set_timer(TimerId::poll(&board), self.poll_interval, now);
            }
            Some(TimerKind::Report { board }) => {
                let board = BoardId::new(board);
                self.report(&board).await;
                let now = self.runtime.clock().now();
                let next = self.report_time.delay_from(self.runtime.clock().utc());
                self.scheduler.set_timer(TimerId::report(&board), next, now);
            }
            None => warn!(timer = %id, "ignoring unknown timer"),
        }
    }

    async fn poll(&self, board: &BoardId) {
        match self.runtime.refresh(board).await {
            Ok(snapshot) => debug!(
                board = %board,
                items = snapshot.items.len(),
                failures = snapshot.failures.len(),
                movements = snapshot.movement_count(),
                "poll complete"
            ),
            Err(e) => error!(board = %board, error = %e, "poll cycle failed"),
        }
    }

    async fn report(&self, board: &BoardId) {
        match self.runtime.report(board, DAILY_PERIOD, None).await {
            Ok(outcome) => {
                debug!(board = %board, subject = %outcome.document.subject(), "daily report sent")
            }
            Err(EngineError::MissingReportAddress(name)) => {
                warn!(board = %board, board_name = %name, "no report address configured, skipping")
            }
            Err(e) => error!(board = %board, error = %e, "report cycle failed"),
        }
    }

    /// Run until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        self.seed();
        loop {
            self.tick().await;

            let now = self.runtime.clock().now();
            let wait = self
                .scheduler
                .next_deadline()
                .map(|at| at.saturating_duration_since(now))
                .unwrap_or(IDLE_WAIT);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }
        info!("poll loop stopped");
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
