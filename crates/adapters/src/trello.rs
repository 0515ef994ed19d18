// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage source backed by Trello board JSON exports.
//!
//! Each board listing re-reads the export file, so whatever refreshes the
//! export (a cron'd `curl`, a sync job) is the live feed. Item lookups
//! after a listing are answered from the export that listing read. Archived
//! lists and cards are invisible.

use crate::source::{SourceError, StageSource};
use async_trait::async_trait;
use dwell_core::{BoardId, Item, ItemId, Member, Stage};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    #[serde(default)]
    lists: Vec<ExportList>,
    #[serde(default)]
    cards: Vec<ExportCard>,
    #[serde(default)]
    members: Vec<ExportMember>,
    #[serde(default)]
    actions: Vec<ExportAction>,
}

#[derive(Debug, Deserialize)]
struct ExportList {
    id: String,
    name: String,
    #[serde(default)]
    closed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportCard {
    id: String,
    name: String,
    id_list: String,
    #[serde(default)]
    id_members: Vec<String>,
    #[serde(default)]
    closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportMember {
    id: String,
    full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    data: ActionData,
    member_creator: Option<ExportMember>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionData {
    card: Option<ActionRef>,
    list_after: Option<ActionRef>,
}

#[derive(Debug, Deserialize)]
struct ActionRef {
    id: String,
}

impl Export {
    fn open_list(&self, id: &str) -> Option<&ExportList> {
        self.lists.iter().find(|l| l.id == id && !l.closed)
    }

    /// Creator of the most recent list move of `card_id`.
    fn last_mover(&self, card_id: &str) -> Option<Member> {
        self.actions
            .iter()
            .filter(|a| a.kind == "updateCard" && a.data.list_after.is_some())
            .filter(|a| a.data.card.as_ref().is_some_and(|c| c.id == card_id))
            .max_by(|a, b| a.date.cmp(&b.date))
            .and_then(|a| a.member_creator.as_ref())
            .map(|m| Member::new(&m.id, &m.full_name))
    }

    fn to_item(&self, card: &ExportCard) -> Result<Item, SourceError> {
        let list = self.open_list(&card.id_list).ok_or_else(|| {
            SourceError::Malformed(format!("card {} is in unknown list {}", card.id, card.id_list))
        })?;
        let members = card
            .id_members
            .iter()
            .filter_map(|id| self.members.iter().find(|m| &m.id == id))
            .map(|m| Member::new(&m.id, &m.full_name))
            .collect();
        Ok(Item {
            id: ItemId::new(card.id.as_str()),
            name: card.name.clone(),
            stage: Stage::new(&list.id, &list.name),
            members,
            last_mover: self.last_mover(&card.id),
        })
    }

    fn open_cards(&self) -> impl Iterator<Item = &ExportCard> {
        self.cards.iter().filter(|c| !c.closed && self.open_list(&c.id_list).is_some())
    }

    fn open_card(&self, item: &ItemId) -> Option<&ExportCard> {
        self.open_cards().find(|c| c.id == item.as_str())
    }
}

/// Exports read by the latest listing of each board, and which board each
/// listed item came from.
#[derive(Default)]
struct Listed {
    exports: HashMap<BoardId, Arc<Export>>,
    boards: HashMap<ItemId, BoardId>,
}

/// Reads one export file per configured board.
#[derive(Clone, Default)]
pub struct TrelloExportSource {
    boards: Arc<HashMap<BoardId, PathBuf>>,
    listed: Arc<Mutex<Listed>>,
}

impl TrelloExportSource {
    pub fn new(boards: impl IntoIterator<Item = (BoardId, PathBuf)>) -> Self {
        Self { boards: Arc::new(boards.into_iter().collect()), listed: Arc::default() }
    }

    async fn load(&self, board: &BoardId) -> Result<Export, SourceError> {
        let path = self
            .boards
            .get(board)
            .ok_or_else(|| SourceError::NotFound(format!("board {board}")))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SourceError::Transient(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Malformed(format!("{}: {e}", path.display())))
    }

    fn listed_export(&self, item: &ItemId) -> Option<Arc<Export>> {
        let listed = self.listed.lock();
        listed.boards.get(item).and_then(|board| listed.exports.get(board)).cloned()
    }

    /// Look `item` up in its board's listed export, else scan every board.
    ///
    /// A board whose export cannot be read is skipped so it cannot fail
    /// items that live on other boards.
    async fn find(&self, item: &ItemId) -> Result<Item, SourceError> {
        if let Some(export) = self.listed_export(item) {
            if let Some(card) = export.open_card(item) {
                return export.to_item(card);
            }
        }
        for board in self.boards.keys() {
            let export = match self.load(board).await {
                Ok(export) => export,
                Err(e) => {
                    tracing::warn!(board = %board, item = %item, error = %e, "export skipped");
                    continue;
                }
            };
            if let Some(card) = export.open_card(item) {
                return export.to_item(card);
            }
        }
        Err(SourceError::NotFound(format!("item {item}")))
    }
}

#[async_trait]
impl StageSource for TrelloExportSource {
    async fn list_board_items(&self, board: &BoardId) -> Result<Vec<Item>, SourceError> {
        let export = Arc::new(self.load(board).await?);
        let items: Vec<Item> =
            export.open_cards().filter_map(|card| export.to_item(card).ok()).collect();

        let mut listed = self.listed.lock();
        listed.boards.retain(|_, b| b != board);
        listed.boards.extend(items.iter().map(|item| (item.id.clone(), board.clone())));
        listed.exports.insert(board.clone(), export);
        drop(listed);

        tracing::debug!(board = %board, items = items.len(), "loaded board export");
        Ok(items)
    }

    async fn get_item(&self, item: &ItemId) -> Result<Item, SourceError> {
        self.find(item).await
    }

    async fn current_stage(&self, item: &ItemId) -> Result<Stage, SourceError> {
        self.find(item).await.map(|it| it.stage)
    }
}

#[cfg(test)]
#[path = "trello_tests.rs"]
mod tests;
