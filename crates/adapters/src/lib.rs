// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dwell-adapters: the board data source and report delivery collaborators

pub mod outbox;
pub mod render;
pub mod sink;
pub mod source;
pub mod trello;

pub use outbox::OutboxSink;
pub use render::render_html;
pub use sink::{Delivered, DeliveryError, ReportSink};
pub use source::{SourceError, StageSource};
pub use trello::TrelloExportSource;

#[cfg(any(test, feature = "test-support"))]
pub use sink::{DeliveryCall, FakeReportSink};
#[cfg(any(test, feature = "test-support"))]
pub use source::{FakeStageSource, SourceCall};
