// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured report document produced from a board snapshot.
//!
//! Rendering (HTML, plain text, JSON) is left to consumers; the document
//! carries only data.

use crate::item::ItemId;
use crate::movement::MovementRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which partition a report group represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GroupKind {
    /// Items with activity and no milestone flag
    Regular,
    /// Items carrying the flag `flag_key`
    #[serde(rename_all = "camelCase")]
    Milestone { flag_key: String },
}

impl GroupKind {
    pub fn is_milestone(&self) -> bool {
        matches!(self, GroupKind::Milestone { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub item_id: ItemId,
    pub name: String,
    pub members: Vec<String>,
    pub stage_durations: BTreeMap<String, u64>,
    pub total_ms: u64,
    pub current_stage: Option<String>,
    pub current_stage_ms: u64,
    pub movement_count: usize,
    /// Most recent movements, oldest first
    pub recent_movements: Vec<MovementRecord>,
    /// When the group's milestone was first reached (milestone groups only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_at_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    #[serde(flatten)]
    pub kind: GroupKind,
    pub label: String,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Distinct items across all groups
    pub total_items: usize,
    /// Item count keyed by group label
    pub items_per_group: BTreeMap<String, usize>,
    /// Movements across regular items
    pub total_movements: usize,
    /// Size of the union of all items' assigned members
    pub active_members: usize,
    /// Ledger totals across all distinct items
    pub total_tracked_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub board_name: String,
    pub period_label: String,
    pub generated_at_ms: u64,
    /// Milestone groups in rule order, followed by the regular group.
    /// Groups without items are omitted.
    pub groups: Vec<ReportGroup>,
    pub summary: ReportSummary,
}

impl ReportDocument {
    pub fn subject(&self) -> String {
        format!("{} Card Activity Report - {}", self.period_label, self.board_name)
    }

    pub fn regular(&self) -> Option<&ReportGroup> {
        self.groups.iter().find(|g| g.kind == GroupKind::Regular)
    }

    pub fn milestone(&self, flag_key: &str) -> Option<&ReportGroup> {
        self.groups.iter().find(
            |g| matches!(&g.kind, GroupKind::Milestone { flag_key: k } if k == flag_key),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.items.is_empty())
    }
}
