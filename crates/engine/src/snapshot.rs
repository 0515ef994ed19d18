// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board snapshots: derived, never persisted.

use dwell_core::{BoardId, DurationLedger, ItemId, MilestoneRule, MovementRecord, StatusFlag};
use serde::Serialize;
use std::collections::BTreeMap;

/// One item's state as of a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub item_id: ItemId,
    pub name: String,
    pub members: Vec<String>,
    pub current_stage: Option<String>,
    /// Time spent in the current stage so far
    pub current_stage_ms: u64,
    pub ledger: DurationLedger,
    pub movements: Vec<MovementRecord>,
    /// Status flags keyed by flag key
    pub flags: BTreeMap<String, StatusFlag>,
}

impl SnapshotItem {
    pub fn total_ms(&self) -> u64 {
        self.ledger.total()
    }

    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    /// Items without any movement are left out of reports.
    pub fn has_activity(&self) -> bool {
        !self.movements.is_empty()
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// An item that could not be refreshed this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub item_id: ItemId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub board_id: BoardId,
    pub board_name: String,
    pub taken_at_ms: u64,
    /// Rules in effect, in configured order
    pub rules: Vec<MilestoneRule>,
    pub items: Vec<SnapshotItem>,
    pub failures: Vec<ItemFailure>,
}

impl BoardSnapshot {
    /// Stage name to total milliseconds across every item.
    pub fn stage_totals(&self) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        for item in &self.items {
            for (stage, ms) in item.ledger.durations() {
                let slot: &mut u64 = totals.entry(stage.clone()).or_default();
                *slot = slot.saturating_add(*ms);
            }
        }
        totals
    }

    pub fn total_ms(&self) -> u64 {
        self.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.total_ms()))
    }

    pub fn movement_count(&self) -> usize {
        self.items.iter().map(SnapshotItem::movement_count).sum()
    }

    /// Active flagged items grouped by flag key.
    pub fn milestone_buckets(&self) -> BTreeMap<&str, Vec<&SnapshotItem>> {
        let mut buckets: BTreeMap<&str, Vec<&SnapshotItem>> = BTreeMap::new();
        for item in self.items.iter().filter(|i| i.has_activity()) {
            for key in item.flags.keys() {
                buckets.entry(key.as_str()).or_default().push(item);
            }
        }
        buckets
    }

    /// Active items carrying no flag.
    pub fn regular_items(&self) -> impl Iterator<Item = &SnapshotItem> {
        self.items.iter().filter(|i| i.has_activity() && !i.is_flagged())
    }

    /// Historical slice: only movements at or after `cutoff_ms` remain, and
    /// items left without movements drop out. Ledgers and flags are kept
    /// whole.
    pub fn since(&self, cutoff_ms: u64) -> BoardSnapshot {
        let items = self
            .items
            .iter()
            .filter_map(|item| {
                let movements: Vec<_> =
                    item.movements.iter().filter(|m| m.timestamp_ms >= cutoff_ms).cloned().collect();
                (!movements.is_empty()).then(|| SnapshotItem { movements, ..item.clone() })
            })
            .collect();
        BoardSnapshot { items, ..self.clone() }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
