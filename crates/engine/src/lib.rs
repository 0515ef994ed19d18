// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dwell-engine: movement detection, milestone matching, aggregation, and
//! report compilation

mod aggregator;
mod compiler;
mod detector;
mod error;
mod matcher;
mod pipeline;
mod scheduler;
mod snapshot;

pub use aggregator::BoardAggregator;
pub use compiler::{compile, RECENT_MOVEMENTS};
pub use detector::MovementDetector;
pub use error::EngineError;
pub use matcher::{match_rule, rule_matches};
pub use pipeline::{ReportOutcome, Runtime, RuntimeDeps};
pub use scheduler::{DailySchedule, Scheduler};
pub use snapshot::{BoardSnapshot, ItemFailure, SnapshotItem};

#[cfg(test)]
mod test_helpers;
