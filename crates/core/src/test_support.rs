// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Item, ItemId, MatchMode, Member, MilestoneRule, Stage};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use proptest::prelude::*;

    /// Stage ids used by [`arb_stage_walk`]; names are the same strings.
    pub const WALK_STAGES: [&str; 4] = ["Backlog", "Doing", "Review", "Done"];

    /// A sequence of polls: (index into [`WALK_STAGES`], ms since previous poll).
    ///
    /// Consecutive polls frequently repeat a stage so idle polls are covered.
    pub fn arb_stage_walk() -> impl Strategy<Value = Vec<(usize, u64)>> {
        prop::collection::vec((0..WALK_STAGES.len(), 1u64..500_000), 1..40)
    }
}

// ── Factory functions ───────────────────────────────────────────────────

pub fn stage(name: &str) -> Stage {
    Stage::new(name.to_lowercase().replace(' ', "-"), name)
}

pub fn member(name: &str) -> Member {
    Member::new(name.to_lowercase().replace(' ', "-"), name)
}

pub fn item(id: &str, name: &str, stage_name: &str) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.to_string(),
        stage: stage(stage_name),
        members: Vec::new(),
        last_mover: None,
    }
}

pub fn item_with_members(id: &str, name: &str, stage_name: &str, members: &[&str]) -> Item {
    Item { members: members.iter().map(|m| member(m)).collect(), ..item(id, name, stage_name) }
}

pub fn wildcard_rule(board: &str, pattern: &str, label: &str, flag_key: &str) -> MilestoneRule {
    MilestoneRule::builder()
        .board_name(board)
        .mode(MatchMode::Wildcard)
        .pattern(pattern)
        .label(label)
        .flag_key(flag_key)
        .build()
}

pub fn exact_rule(board: &str, pattern: &str, label: &str, flag_key: &str) -> MilestoneRule {
    MilestoneRule::builder()
        .board_name(board)
        .mode(MatchMode::Exact)
        .pattern(pattern)
        .label(label)
        .flag_key(flag_key)
        .build()
}
