// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Milestone rules and the status flags they produce.

use serde::{Deserialize, Serialize};

/// How a rule's pattern is compared against a stage name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    /// Pattern up to the first `*` is a case-insensitive prefix
    Wildcard,
}

crate::simple_display! {
    MatchMode {
        Exact => "exact",
        Wildcard => "wildcard",
    }
}

/// A configured mapping from (board, stage pattern) to a status flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRule {
    pub board_name: String,
    #[serde(rename = "matchMode")]
    pub mode: MatchMode,
    pub pattern: String,
    #[serde(rename = "reportGroupLabel")]
    pub label: String,
    pub flag_key: String,
    /// Exact matches compare case-sensitively unless this is set
    #[serde(default)]
    pub case_insensitive: bool,
}

crate::builder! {
    pub struct MilestoneRuleBuilder => MilestoneRule {
        into {
            board_name: String = "Board",
            pattern: String = "Done",
            label: String = "Done",
            flag_key: String = "done",
        }
        set {
            mode: MatchMode = MatchMode::Exact,
            case_insensitive: bool = false,
        }
    }
}

/// Per-item marker that a milestone rule matched. Written once; later
/// movements never overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFlag {
    pub marked_at_ms: u64,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(rename = "reportGroupLabel")]
    pub label: String,
    pub board_name: String,
}
