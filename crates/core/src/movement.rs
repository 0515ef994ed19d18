// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Movement records: the append-only history of stage changes.

use crate::item::{ItemId, Stage};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of one detected transition.
    ///
    /// Derived from the pointer that was replaced, so at most one
    /// transition can leave a given pointer and every poller that reads the
    /// same pointer derives the same id.
    pub struct MovementId;
}

impl MovementId {
    pub fn departing(observed_at_ms: u64) -> Self {
        Self::new(format!("mv-{observed_at_ms}"))
    }
}

/// One detected stage change. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    pub id: MovementId,
    pub item_id: ItemId,
    pub item_name: String,
    pub member_id: String,
    pub member_name: String,
    pub from_stage: String,
    pub to_stage: String,
    #[serde(default)]
    pub to_stage_id: String,
    pub timestamp_ms: u64,
    pub board_name: String,
    /// Display names of the members assigned at the time of the move
    #[serde(default)]
    pub assigned_members: Vec<String>,
}

impl MovementRecord {
    /// The stage the item entered.
    pub fn destination(&self) -> Stage {
        Stage::new(self.to_stage_id.clone(), self.to_stage.clone())
    }
}

crate::builder! {
    pub struct MovementRecordBuilder => MovementRecord {
        into {
            id: MovementId = "mv-0",
            item_id: ItemId = "item-1",
            item_name: String = "Card",
            member_id: String = "poller",
            member_name: String = "Poller",
            from_stage: String = "Backlog",
            to_stage: String = "Doing",
            to_stage_id: String = "doing",
            board_name: String = "Board",
        }
        set {
            timestamp_ms: u64 = 1_000,
            assigned_members: Vec<String> = Vec::new(),
        }
    }
}
