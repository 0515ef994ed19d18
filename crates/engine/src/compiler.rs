// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report compilation: a pure transform from snapshot to document.

use crate::snapshot::{BoardSnapshot, SnapshotItem};
use dwell_core::{GroupKind, ReportDocument, ReportGroup, ReportItem, ReportSummary};
use std::collections::{BTreeMap, BTreeSet};

/// Movements carried per report item, newest last.
pub const RECENT_MOVEMENTS: usize = 5;

const REGULAR_LABEL: &str = "Card Activity";

fn report_item(item: &SnapshotItem, marked_at_ms: Option<u64>) -> ReportItem {
    let skip = item.movements.len().saturating_sub(RECENT_MOVEMENTS);
    ReportItem {
        item_id: item.item_id.clone(),
        name: item.name.clone(),
        members: item.members.clone(),
        stage_durations: item.ledger.durations().clone(),
        total_ms: item.total_ms(),
        current_stage: item.current_stage.clone(),
        current_stage_ms: item.current_stage_ms,
        movement_count: item.movement_count(),
        recent_movements: item.movements[skip..].to_vec(),
        marked_at_ms,
    }
}

/// Milestone flag keys in rule order, then any flags no longer backed by a
/// rule in key order.
fn flag_order(snapshot: &BoardSnapshot, present: &BTreeSet<&str>) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for rule in &snapshot.rules {
        if present.contains(rule.flag_key.as_str()) && !order.contains(&rule.flag_key) {
            order.push(rule.flag_key.clone());
        }
    }
    for key in present {
        if !order.iter().any(|k| k == key) {
            order.push((*key).to_string());
        }
    }
    order
}

/// Compile `snapshot` into a report labelled `period_label`.
///
/// Only items with at least one movement appear. An item carrying several
/// flags appears in each of those milestone groups; items with no flag form
/// the regular group. Identical input yields an identical document.
pub fn compile(snapshot: &BoardSnapshot, period_label: &str) -> ReportDocument {
    let buckets = snapshot.milestone_buckets();
    let present: BTreeSet<&str> = buckets.keys().copied().collect();

    let mut groups = Vec::new();
    for flag_key in flag_order(snapshot, &present) {
        let Some(items) = buckets.get(flag_key.as_str()) else {
            continue;
        };
        let label = snapshot
            .rules
            .iter()
            .find(|r| r.flag_key == flag_key)
            .map(|r| r.label.clone())
            .or_else(|| items.iter().find_map(|i| i.flags.get(&flag_key)).map(|f| f.label.clone()))
            .unwrap_or_else(|| flag_key.clone());
        let items = items
            .iter()
            .map(|item| report_item(item, item.flags.get(&flag_key).map(|f| f.marked_at_ms)))
            .collect();
        groups.push(ReportGroup { kind: GroupKind::Milestone { flag_key }, label, items });
    }

    let regular: Vec<&SnapshotItem> = snapshot.regular_items().collect();
    if !regular.is_empty() {
        groups.push(ReportGroup {
            kind: GroupKind::Regular,
            label: REGULAR_LABEL.to_string(),
            items: regular.iter().map(|item| report_item(item, None)).collect(),
        });
    }

    let active: Vec<&SnapshotItem> = snapshot.items.iter().filter(|i| i.has_activity()).collect();
    let members: BTreeSet<&str> =
        active.iter().flat_map(|i| i.members.iter().map(String::as_str)).collect();
    let items_per_group: BTreeMap<String, usize> =
        groups.iter().map(|g| (g.label.clone(), g.items.len())).collect();

    let summary = ReportSummary {
        total_items: active.len(),
        items_per_group,
        total_movements: regular.iter().map(|i| i.movement_count()).sum(),
        active_members: members.len(),
        total_tracked_ms: active.iter().fold(0u64, |acc, i| acc.saturating_add(i.total_ms())),
    };

    ReportDocument {
        board_name: snapshot.board_name.clone(),
        period_label: period_label.to_string(),
        generated_at_ms: snapshot.taken_at_ms,
        groups,
        summary,
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
