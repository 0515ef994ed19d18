// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-item accumulated time-in-stage.

use crate::movement::MovementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative milliseconds spent in each stage, summed over every visit.
///
/// Values only grow. `last_applied` remembers the transition whose elapsed
/// time was folded in most recently, which makes [`DurationLedger::apply`]
/// safe to retry for the same transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationLedger {
    #[serde(default)]
    durations: BTreeMap<String, u64>,
    #[serde(default)]
    last_applied: Option<MovementId>,
}

impl DurationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed_ms` to `stage_name` on behalf of `transition`.
    ///
    /// Returns false (and leaves the ledger untouched) when this transition
    /// was already applied.
    pub fn apply(&mut self, transition: &MovementId, stage_name: &str, elapsed_ms: u64) -> bool {
        if self.last_applied.as_ref() == Some(transition) {
            return false;
        }
        let slot = self.durations.entry(stage_name.to_string()).or_insert(0);
        *slot = slot.saturating_add(elapsed_ms);
        self.last_applied = Some(transition.clone());
        true
    }

    pub fn get(&self, stage_name: &str) -> u64 {
        self.durations.get(stage_name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.durations.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn durations(&self) -> &BTreeMap<String, u64> {
        &self.durations
    }

    pub fn last_applied(&self) -> Option<&MovementId> {
        self.last_applied.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

impl FromIterator<(String, u64)> for DurationLedger {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self { durations: iter.into_iter().collect(), last_applied: None }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
