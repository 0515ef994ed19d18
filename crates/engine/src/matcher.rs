// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Milestone matching.

use dwell_core::{MatchMode, MilestoneRule};

/// Whether `rule` matches a movement into `stage_name` on `board_name`.
///
/// Exact rules compare the whole name, case-sensitively unless the rule is
/// marked case-insensitive. Wildcard rules compare the pattern text before
/// the first `*` as a case-insensitive prefix; a wildcard pattern without
/// `*` must equal the stage name, ignoring case.
pub fn rule_matches(rule: &MilestoneRule, board_name: &str, stage_name: &str) -> bool {
    if rule.board_name != board_name {
        return false;
    }
    match rule.mode {
        MatchMode::Exact if rule.case_insensitive => {
            stage_name.to_lowercase() == rule.pattern.to_lowercase()
        }
        MatchMode::Exact => stage_name == rule.pattern,
        MatchMode::Wildcard => match rule.pattern.split_once('*') {
            Some((prefix, _)) => stage_name.to_lowercase().starts_with(&prefix.to_lowercase()),
            None => stage_name.to_lowercase() == rule.pattern.to_lowercase(),
        },
    }
}

/// First rule in configured order that matches.
pub fn match_rule<'r>(
    rules: &'r [MilestoneRule],
    board_name: &str,
    stage_name: &str,
) -> Option<&'r MilestoneRule> {
    rules.iter().find(|r| rule_matches(r, board_name, stage_name))
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
