// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage snapshot source: the read-only, pollable view of the host board.

use async_trait::async_trait;
use dwell_core::{BoardId, Item, ItemId, Stage};
use thiserror::Error;

/// Errors from the board data source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("source unavailable: {0}")]
    Transient(String),
    #[error("malformed board data: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Worth retrying on the next poll cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Transient(_))
    }
}

/// Pollable source of item identity, stage, and membership.
#[async_trait]
pub trait StageSource: Clone + Send + Sync + 'static {
    /// Every open item on the board.
    async fn list_board_items(&self, board: &BoardId) -> Result<Vec<Item>, SourceError>;

    /// Fresh identity and membership for one item.
    async fn get_item(&self, item: &ItemId) -> Result<Item, SourceError>;

    /// The stage the item occupies right now.
    async fn current_stage(&self, item: &ItemId) -> Result<Stage, SourceError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{SourceError, StageSource};
    use async_trait::async_trait;
    use dwell_core::{BoardId, Item, ItemId, Member, Stage};
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    /// Recorded source call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SourceCall {
        ListBoardItems { board: BoardId },
        GetItem { item: ItemId },
        CurrentStage { item: ItemId },
    }

    #[derive(Default)]
    struct FakeSourceState {
        boards: HashMap<BoardId, Vec<ItemId>>,
        items: HashMap<ItemId, Item>,
        failing: HashSet<ItemId>,
        unavailable: bool,
        calls: Vec<SourceCall>,
    }

    /// In-memory board for tests. Items keep insertion order per board.
    #[derive(Clone, Default)]
    pub struct FakeStageSource {
        inner: Arc<Mutex<FakeSourceState>>,
    }

    impl FakeStageSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_item(&self, board: &BoardId, item: Item) {
            let mut state = self.inner.lock();
            let ids = state.boards.entry(board.clone()).or_default();
            if !ids.contains(&item.id) {
                ids.push(item.id.clone());
            }
            state.items.insert(item.id.clone(), item);
        }

        /// Move an item, optionally attributing the move to `mover`.
        pub fn move_item(&self, item: &ItemId, stage: Stage, mover: Option<Member>) {
            if let Some(it) = self.inner.lock().items.get_mut(item) {
                it.stage = stage;
                it.last_mover = mover;
            }
        }

        pub fn set_members(&self, item: &ItemId, members: Vec<Member>) {
            if let Some(it) = self.inner.lock().items.get_mut(item) {
                it.members = members;
            }
        }

        /// Delete an item from the board and the item table.
        pub fn remove_item(&self, item: &ItemId) {
            let mut state = self.inner.lock();
            state.items.remove(item);
            for ids in state.boards.values_mut() {
                ids.retain(|id| id != item);
            }
        }

        /// Make calls for `item` fail transiently.
        pub fn fail_item(&self, item: &ItemId) {
            self.inner.lock().failing.insert(item.clone());
        }

        /// Keep `item` listed but answer per-item calls with `NotFound`,
        /// as if it was deleted between listing and polling.
        pub fn vanish_item(&self, item: &ItemId) {
            self.inner.lock().items.remove(item);
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.inner.lock().unavailable = unavailable;
        }

        pub fn calls(&self) -> Vec<SourceCall> {
            self.inner.lock().calls.clone()
        }

        fn lookup(&self, item: &ItemId, call: SourceCall) -> Result<Item, SourceError> {
            let mut state = self.inner.lock();
            state.calls.push(call);
            if state.unavailable || state.failing.contains(item) {
                return Err(SourceError::Transient(format!("injected failure for {item}")));
            }
            state.items.get(item).cloned().ok_or_else(|| SourceError::NotFound(item.to_string()))
        }
    }

    #[async_trait]
    impl StageSource for FakeStageSource {
        async fn list_board_items(&self, board: &BoardId) -> Result<Vec<Item>, SourceError> {
            let mut state = self.inner.lock();
            state.calls.push(SourceCall::ListBoardItems { board: board.clone() });
            if state.unavailable {
                return Err(SourceError::Transient("injected outage".into()));
            }
            let ids = state
                .boards
                .get(board)
                .ok_or_else(|| SourceError::NotFound(format!("board {board}")))?;
            Ok(ids
                .iter()
                .map(|id| {
                    state.items.get(id).cloned().unwrap_or_else(|| Item {
                        id: id.clone(),
                        name: id.to_string(),
                        stage: Stage::new("", ""),
                        members: Vec::new(),
                        last_mover: None,
                    })
                })
                .collect())
        }

        async fn get_item(&self, item: &ItemId) -> Result<Item, SourceError> {
            self.lookup(item, SourceCall::GetItem { item: item.clone() })
        }

        async fn current_stage(&self, item: &ItemId) -> Result<Stage, SourceError> {
            self.lookup(item, SourceCall::CurrentStage { item: item.clone() }).map(|it| it.stage)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStageSource, SourceCall};

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
