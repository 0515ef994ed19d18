// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The refresh → compile → deliver pipeline.

use crate::aggregator::BoardAggregator;
use crate::compiler::compile;
use crate::error::EngineError;
use crate::snapshot::BoardSnapshot;
use dwell_adapters::{Delivered, ReportSink, StageSource};
use dwell_core::{BoardId, BoardSettings, Clock, ItemId, Member, ReportDocument};
use dwell_storage::{BoardRepo, ItemRepo, KvStore};
use std::time::Duration;

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, Src, K> {
    pub store: S,
    pub source: Src,
    pub sink: K,
}

/// Result of a delivered report
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub document: ReportDocument,
    pub delivered: Delivered,
}

/// Entry point for scheduled and on-demand cycles.
///
/// Holds no state beyond its collaborators; everything per-board is read
/// from the store on each call.
pub struct Runtime<S, Src, K, C> {
    store: S,
    source: Src,
    sink: K,
    clock: C,
    poller: Member,
}

impl<S, Src, K, C> Runtime<S, Src, K, C>
where
    S: KvStore,
    Src: StageSource,
    K: ReportSink,
    C: Clock,
{
    pub fn new(deps: RuntimeDeps<S, Src, K>, clock: C, poller: Member) -> Self {
        Self { store: deps.store, source: deps.source, sink: deps.sink, clock, poller }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn install_settings(
        &self,
        board: &BoardId,
        settings: &BoardSettings,
    ) -> Result<(), EngineError> {
        BoardRepo::new(&self.store, board).save_settings(settings)?;
        Ok(())
    }

    pub fn settings(&self, board: &BoardId) -> Result<BoardSettings, EngineError> {
        BoardRepo::new(&self.store, board)
            .settings()?
            .ok_or_else(|| EngineError::UnknownBoard(board.to_string()))
    }

    pub async fn refresh(&self, board: &BoardId) -> Result<BoardSnapshot, EngineError> {
        BoardAggregator::new(&self.store, &self.source, &self.clock, &self.poller)
            .refresh(board)
            .await
    }

    /// Refresh, compile, and deliver a report for `board`.
    ///
    /// With `window`, only movements inside the trailing window count.
    /// A missing report address fails before anything is polled.
    pub async fn report(
        &self,
        board: &BoardId,
        period_label: &str,
        window: Option<Duration>,
    ) -> Result<ReportOutcome, EngineError> {
        let settings = self.settings(board)?;
        let address = settings
            .report_address()
            .ok_or_else(|| EngineError::MissingReportAddress(settings.board_name.clone()))?
            .to_string();

        let mut snapshot = self.refresh(board).await?;
        if let Some(window) = window {
            let cutoff = snapshot.taken_at_ms.saturating_sub(window.as_millis() as u64);
            snapshot = snapshot.since(cutoff);
        }

        let document = compile(&snapshot, period_label);
        let delivered = self.sink.deliver(&document, &address).await.map_err(|e| {
            tracing::error!(board = %board, to = %address, error = %e, "report delivery failed");
            EngineError::from(e)
        })?;
        tracing::info!(
            board = %board,
            to = %address,
            location = %delivered.location,
            items = document.summary.total_items,
            "report delivered"
        );
        Ok(ReportOutcome { document, delivered })
    }

    /// Remove everything tracked for `item`.
    pub fn purge(&self, item: &ItemId) -> Result<(), EngineError> {
        ItemRepo::new(&self.store, item).purge()?;
        tracing::info!(item = %item, "item purged");
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
