// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A board world on disk: a Trello export the tests edit, a file store,
//! and an outbox directory.

pub use dwell_core::test_support::{exact_rule, wildcard_rule};
pub use dwell_core::{BoardId, ItemId, MilestoneRule};
pub use dwell_engine::{BoardSnapshot, EngineError, ReportOutcome};

use dwell_adapters::{OutboxSink, TrelloExportSource};
use dwell_core::{BoardSettings, FakeClock, Member};
use dwell_engine::{Runtime, RuntimeDeps};
use dwell_storage::FileStore;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const BOARD_NAME: &str = "Delivery";
pub const HOUR: u64 = 3_600_000;

type SpecRuntime = Runtime<FileStore, TrelloExportSource, OutboxSink, FakeClock>;

struct Card {
    name: String,
    list: String,
    members: Vec<String>,
    closed: bool,
}

pub struct World {
    dir: TempDir,
    pub clock: FakeClock,
    pub board: BoardId,
    cards: BTreeMap<String, Card>,
    lists: Vec<String>,
    runtime: SpecRuntime,
}

impl World {
    pub fn new(rules: Vec<MilestoneRule>, report_address: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::at_epoch_ms(0);
        let board = BoardId::new("b1");
        let runtime = open_runtime(&dir, &clock, &board);
        let settings = BoardSettings {
            board_name: BOARD_NAME.to_string(),
            report_address: report_address.map(String::from),
            milestone_rules: rules,
        };
        runtime.install_settings(&board, &settings).unwrap();

        let world =
            Self { dir, clock, board, cards: BTreeMap::new(), lists: Vec::new(), runtime };
        world.write_export();
        world
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    pub fn outbox_path(&self) -> PathBuf {
        self.dir.path().join("outbox")
    }

    fn export_path(&self) -> PathBuf {
        self.dir.path().join("board.json")
    }

    pub fn card(&mut self, id: &str, list: &str, members: &[&str]) {
        self.ensure_list(list);
        self.cards.insert(
            id.to_string(),
            Card {
                name: format!("Card {id}"),
                list: list.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
                closed: false,
            },
        );
        self.write_export();
    }

    pub fn move_card(&mut self, id: &str, list: &str) {
        self.ensure_list(list);
        if let Some(card) = self.cards.get_mut(id) {
            card.list = list.to_string();
        }
        self.write_export();
    }

    pub fn archive(&mut self, id: &str) {
        if let Some(card) = self.cards.get_mut(id) {
            card.closed = true;
        }
        self.write_export();
    }

    /// Set the clock to `at_ms` and refresh the board.
    pub async fn poll_at(&self, at_ms: u64) -> BoardSnapshot {
        self.clock.set_epoch_ms(at_ms);
        self.runtime.refresh(&self.board).await.unwrap()
    }

    pub async fn report(&self, period: &str) -> Result<ReportOutcome, EngineError> {
        self.runtime.report(&self.board, period, None).await
    }

    pub async fn report_since(&self, period: &str, window: Duration) -> ReportOutcome {
        self.runtime.report(&self.board, period, Some(window)).await.unwrap()
    }

    pub fn purge(&self, id: &str) {
        self.runtime.purge(&ItemId::new(id)).unwrap();
    }

    /// Drop the runtime and open the store again from disk.
    pub fn restart(&mut self) {
        self.runtime = open_runtime(&self.dir, &self.clock, &self.board);
    }

    /// Contents of every delivered message, oldest first.
    pub fn outbox(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.outbox_path()) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|x| x == "eml"))
            .collect();
        paths.sort();
        paths.iter().map(|p| std::fs::read_to_string(p).unwrap()).collect()
    }

    fn ensure_list(&mut self, list: &str) {
        if !self.lists.iter().any(|l| l == list) {
            self.lists.push(list.to_string());
        }
    }

    fn write_export(&self) {
        // List names may differ only by case, so ids come from position.
        let list_id = |name: &str| {
            let idx = self.lists.iter().position(|l| l == name).unwrap_or(0);
            format!("l{idx}")
        };
        let lists: Vec<_> = self
            .lists
            .iter()
            .map(|name| json!({ "id": list_id(name), "name": name, "closed": false }))
            .collect();
        let mut member_names: Vec<&str> =
            self.cards.values().flat_map(|c| c.members.iter().map(String::as_str)).collect();
        member_names.sort_unstable();
        member_names.dedup();
        let members: Vec<_> = member_names
            .iter()
            .map(|name| json!({ "id": format!("m-{}", name.to_lowercase()), "fullName": name }))
            .collect();
        let cards: Vec<_> = self
            .cards
            .iter()
            .map(|(id, card)| {
                let id_members: Vec<String> =
                    card.members.iter().map(|m| format!("m-{}", m.to_lowercase())).collect();
                json!({
                    "id": id,
                    "name": card.name,
                    "idList": list_id(&card.list),
                    "idMembers": id_members,
                    "closed": card.closed,
                })
            })
            .collect();
        let export = json!({
            "id": self.board.as_str(),
            "name": BOARD_NAME,
            "lists": lists,
            "members": members,
            "cards": cards,
            "actions": [],
        });
        std::fs::write(self.export_path(), serde_json::to_vec_pretty(&export).unwrap()).unwrap();
    }
}

fn open_runtime(dir: &TempDir, clock: &FakeClock, board: &BoardId) -> SpecRuntime {
    let store = FileStore::open(dir.path().join("store.json")).unwrap();
    let source = TrelloExportSource::new([(board.clone(), dir.path().join("board.json"))]);
    let sink = OutboxSink::new(dir.path().join("outbox"), "tracker@example.com");
    Runtime::new(
        RuntimeDeps { store, source, sink },
        clock.clone(),
        Member::new("poller", "Board poller"),
    )
}
