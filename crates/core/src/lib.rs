// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dwell-core: domain types for the dwell stage-duration tracker

pub mod macros;

pub mod clock;
pub mod id;
pub mod item;
pub mod ledger;
pub mod milestone;
pub mod movement;
pub mod pointer;
pub mod report;
pub mod settings;
pub mod time_fmt;
pub mod timer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::short;
pub use item::{BoardId, Item, ItemId, Member, Stage};
pub use ledger::DurationLedger;
pub use milestone::{MatchMode, MilestoneRule, StatusFlag};
pub use movement::{MovementId, MovementRecord};
pub use pointer::StagePointer;
pub use report::{GroupKind, ReportDocument, ReportGroup, ReportItem, ReportSummary};
pub use settings::BoardSettings;
pub use time_fmt::{format_duration, format_elapsed_ms, parse_duration};
pub use timer::{TimerId, TimerKind};
