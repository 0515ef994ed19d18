// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board aggregation: poll every item, detect movements, match milestones,
//! and fold the results into a snapshot.

use crate::detector::MovementDetector;
use crate::error::EngineError;
use crate::matcher::match_rule;
use crate::snapshot::{BoardSnapshot, ItemFailure, SnapshotItem};
use dwell_adapters::StageSource;
use dwell_core::{
    BoardId, BoardSettings, Clock, ItemId, Member, MilestoneRule, MovementRecord, StatusFlag,
};
use dwell_storage::{BoardRepo, ItemRepo, KvStore};
use std::collections::BTreeMap;

pub struct BoardAggregator<'a, S, Src, C> {
    store: &'a S,
    source: &'a Src,
    clock: &'a C,
    poller: &'a Member,
}

impl<'a, S, Src, C> BoardAggregator<'a, S, Src, C>
where
    S: KvStore,
    Src: StageSource,
    C: Clock,
{
    pub fn new(store: &'a S, source: &'a Src, clock: &'a C, poller: &'a Member) -> Self {
        Self { store, source, clock, poller }
    }

    /// Refresh every item on `board` and return the resulting snapshot.
    ///
    /// Per-item failures are logged and listed on the snapshot. Failing to
    /// read settings, to list the board, or to reach the store at all
    /// aborts the refresh.
    pub async fn refresh(&self, board: &BoardId) -> Result<BoardSnapshot, EngineError> {
        let settings = BoardRepo::new(self.store, board)
            .settings()?
            .ok_or_else(|| EngineError::UnknownBoard(board.to_string()))?;
        let rules: Vec<MilestoneRule> = settings.rules_for_board().cloned().collect();

        let listed = self.source.list_board_items(board).await?;
        let mut items = Vec::with_capacity(listed.len());
        let mut failures = Vec::new();

        for listed_item in &listed {
            match self.refresh_item(&settings, &rules, &listed_item.id).await {
                Ok(item) => items.push(item),
                Err(e) if e.is_systemic() => {
                    tracing::error!(board = %board, item = %listed_item.id, error = %e, "refresh aborted");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(board = %board, item = %listed_item.id, error = %e, "item skipped");
                    failures.push(ItemFailure { item_id: listed_item.id.clone(), error: e.to_string() });
                }
            }
        }

        tracing::info!(
            board = %board,
            items = items.len(),
            failed = failures.len(),
            "board refreshed"
        );
        Ok(BoardSnapshot {
            board_id: board.clone(),
            board_name: settings.board_name.clone(),
            taken_at_ms: self.clock.epoch_ms(),
            rules,
            items,
            failures,
        })
    }

    async fn refresh_item(
        &self,
        settings: &BoardSettings,
        rules: &[MilestoneRule],
        id: &ItemId,
    ) -> Result<SnapshotItem, EngineError> {
        let item = self.source.get_item(id).await?;
        let current = self.source.current_stage(id).await?;

        let detector = MovementDetector::new(self.store, self.clock, self.poller);
        let repo = ItemRepo::new(self.store, id);

        detector.detect(&settings.board_name, &item, &current)?;
        let movements = repo.movements()?;
        let flags = self.reconcile_flags(&repo, settings, rules, &movements)?;

        let now = self.clock.epoch_ms();
        let pointer = repo.pointer()?.map(|p| p.value);
        Ok(SnapshotItem {
            item_id: id.clone(),
            name: item.name.clone(),
            members: item.member_names(),
            current_stage: pointer.as_ref().map(|p| p.stage_name.clone()),
            current_stage_ms: pointer.as_ref().map_or(0, |p| now.saturating_sub(p.observed_at_ms)),
            ledger: repo.ledger()?,
            movements,
            flags,
        })
    }

    /// Flag every milestone the log shows the item entering and that has no
    /// flag yet, marked by the earliest such movement.
    ///
    /// Runs on every refresh, so a flag write lost to a failed cycle is
    /// made up by the next one.
    fn reconcile_flags(
        &self,
        repo: &ItemRepo<'_, S>,
        settings: &BoardSettings,
        rules: &[MilestoneRule],
        movements: &[MovementRecord],
    ) -> Result<BTreeMap<String, StatusFlag>, EngineError> {
        let mut flags: BTreeMap<_, _> = repo.flags()?.into_iter().collect();
        for movement in movements {
            let Some(rule) = match_rule(rules, &settings.board_name, &movement.to_stage) else {
                continue;
            };
            if flags.contains_key(&rule.flag_key) {
                continue;
            }
            let flag = StatusFlag {
                marked_at_ms: movement.timestamp_ms,
                members: movement.assigned_members.clone(),
                label: rule.label.clone(),
                board_name: settings.board_name.clone(),
            };
            if repo.mark_flag(&rule.flag_key, &flag)? {
                tracing::info!(item = %movement.item_id, flag = %rule.flag_key, stage = %movement.to_stage, "milestone reached");
                flags.insert(rule.flag_key.clone(), flag);
            } else if let Some(stored) = repo.flag(&rule.flag_key)? {
                flags.insert(rule.flag_key.clone(), stored);
            }
        }
        Ok(flags)
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
