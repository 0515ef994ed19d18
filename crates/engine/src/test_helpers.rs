// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::pipeline::{Runtime, RuntimeDeps};
use crate::snapshot::SnapshotItem;
use dwell_adapters::{FakeReportSink, FakeStageSource};
use dwell_core::test_support::item_with_members;
use dwell_core::{
    BoardId, BoardSettings, DurationLedger, FakeClock, ItemId, Member, MilestoneRule,
    MovementRecord, StatusFlag,
};
use dwell_storage::MemoryStore;

pub(crate) const BOARD_NAME: &str = "Delivery";

/// Convenience alias for the fully-typed test runtime.
pub(crate) type TestRuntime = Runtime<MemoryStore, FakeStageSource, FakeReportSink, FakeClock>;

pub(crate) struct TestContext {
    pub runtime: TestRuntime,
    pub store: MemoryStore,
    pub source: FakeStageSource,
    pub sink: FakeReportSink,
    pub clock: FakeClock,
    pub board: BoardId,
}

pub(crate) fn poller() -> Member {
    Member::new("poller", "Board poller")
}

/// Runtime over in-memory collaborators with the clock at epoch 0 and
/// board settings installed.
pub(crate) fn setup(rules: Vec<MilestoneRule>, report_address: Option<&str>) -> TestContext {
    let store = MemoryStore::new();
    let source = FakeStageSource::new();
    let sink = FakeReportSink::new();
    let clock = FakeClock::at_epoch_ms(0);
    let board = BoardId::new("b1");

    let runtime = Runtime::new(
        RuntimeDeps { store: store.clone(), source: source.clone(), sink: sink.clone() },
        clock.clone(),
        poller(),
    );
    let settings = BoardSettings {
        board_name: BOARD_NAME.to_string(),
        report_address: report_address.map(String::from),
        milestone_rules: rules,
    };
    runtime.install_settings(&board, &settings).unwrap();

    TestContext { runtime, store, source, sink, clock, board }
}

impl TestContext {
    pub fn add_item(&self, id: &str, stage: &str, members: &[&str]) {
        self.source.add_item(&self.board, item_with_members(id, id, stage, members));
    }

    pub fn move_item(&self, id: &str, stage: &str) {
        self.source.move_item(&ItemId::new(id), dwell_core::test_support::stage(stage), None);
    }

    /// Advance the clock to `at_ms` and run one refresh.
    pub async fn poll_at(&self, at_ms: u64) -> crate::BoardSnapshot {
        self.clock.set_epoch_ms(at_ms);
        self.runtime.refresh(&self.board).await.unwrap()
    }
}

/// Snapshot item with the given ledger, movements at `movement_times`, and
/// flags.
pub(crate) fn snapshot_item(
    id: &str,
    durations: &[(&str, u64)],
    movement_times: &[u64],
    flags: &[&str],
) -> SnapshotItem {
    SnapshotItem {
        item_id: ItemId::new(id),
        name: id.to_string(),
        members: Vec::new(),
        current_stage: None,
        current_stage_ms: 0,
        ledger: durations.iter().map(|(s, ms)| (s.to_string(), *ms)).collect::<DurationLedger>(),
        movements: movement_times
            .iter()
            .map(|t| MovementRecord::builder().id(format!("mv-{t}")).timestamp_ms(*t).build())
            .collect(),
        flags: flags
            .iter()
            .map(|f| {
                (
                    f.to_string(),
                    StatusFlag {
                        marked_at_ms: 1,
                        members: Vec::new(),
                        label: f.to_string(),
                        board_name: BOARD_NAME.to_string(),
                    },
                )
            })
            .collect(),
    }
}
