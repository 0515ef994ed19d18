// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-item "last known stage" pointer.

use crate::item::Stage;
use serde::{Deserialize, Serialize};

/// As of the last successful poll, the item was in `stage_id` since
/// `observed_at_ms`.
///
/// Exactly one pointer exists per observed item. It is replaced on every
/// detected movement and only removed together with the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePointer {
    pub stage_id: String,
    pub stage_name: String,
    pub observed_at_ms: u64,
    /// When the item was first observed at all; carried across movements
    pub first_observed_at_ms: u64,
}

impl StagePointer {
    /// Pointer for an item seen for the first time.
    pub fn first(stage: &Stage, now_ms: u64) -> Self {
        Self {
            stage_id: stage.id.clone(),
            stage_name: stage.name.clone(),
            observed_at_ms: now_ms,
            first_observed_at_ms: now_ms,
        }
    }

    /// Successor pointer after a movement into `stage` at `at_ms`.
    pub fn advance(&self, stage: &Stage, at_ms: u64) -> Self {
        Self {
            stage_id: stage.id.clone(),
            stage_name: stage.name.clone(),
            observed_at_ms: at_ms,
            first_observed_at_ms: self.first_observed_at_ms,
        }
    }

    /// Stage identity is by id; a renamed list is still the same stage.
    pub fn is_in(&self, stage: &Stage) -> bool {
        self.stage_id == stage.id
    }
}
