// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-board settings persisted in the board scope.

use crate::milestone::MilestoneRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSettings {
    pub board_name: String,
    #[serde(default)]
    pub report_address: Option<String>,
    #[serde(default)]
    pub milestone_rules: Vec<MilestoneRule>,
}

impl BoardSettings {
    pub fn new(board_name: impl Into<String>) -> Self {
        Self { board_name: board_name.into(), ..Self::default() }
    }

    /// The configured report address, if non-blank.
    pub fn report_address(&self) -> Option<&str> {
        self.report_address.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Rules that apply to this board, in configured order.
    pub fn rules_for_board(&self) -> impl Iterator<Item = &MilestoneRule> {
        self.milestone_rules.iter().filter(move |r| r.board_name == self.board_name)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
