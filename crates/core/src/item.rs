// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Items (cards), stages (lists), and members as observed from the host board.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Host-assigned board identifier.
    pub struct BoardId;
}

crate::define_id! {
    /// Host-assigned item (card) identifier.
    pub struct ItemId;
}

/// A board member who may be assigned to items or move them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub full_name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self { id: id.into(), full_name: full_name.into() }
    }
}

/// A stage (list) an item can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A tracked unit of work as reported by the host provider.
///
/// The provider owns items; the tracker only observes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Stage the provider last listed the item in
    pub stage: Stage,
    #[serde(default)]
    pub members: Vec<Member>,
    /// Member behind the most recent move, when the provider knows it
    #[serde(default)]
    pub last_mover: Option<Member>,
}

impl Item {
    /// Display names of the assigned members, in provider order.
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.full_name.clone()).collect()
    }
}
