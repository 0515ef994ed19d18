// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The key-value persistence contract.

use dwell_core::{BoardId, ItemId};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Storage scope. Keys in different scopes never collide, and nothing
/// spans more than one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Item(ItemId),
    Board(BoardId),
}

impl Scope {
    pub fn item(id: &ItemId) -> Self {
        Scope::Item(id.clone())
    }

    pub fn board(id: &BoardId) -> Self {
        Scope::Board(id.clone())
    }

    /// Stable string form used as the persisted scope key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Item(id) => write!(f, "item:{id}"),
            Scope::Board(id) => write!(f, "board:{id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write conflict on {scope}/{key}")]
    Conflict { scope: String, key: String },
}

impl StoreError {
    /// Whether the store as a whole is unusable (as opposed to one value
    /// being corrupt or contended).
    pub fn is_systemic(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

/// Scoped key-value store.
///
/// Each call is individually durable. There are no transactions across
/// keys; [`KvStore::compare_and_set`] is the only conditional write.
pub trait KvStore: Clone + Send + Sync + 'static {
    fn get(&self, scope: &Scope, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(&self, scope: &Scope, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, scope: &Scope, key: &str) -> Result<(), StoreError>;

    /// Write `new` only if the current value equals `expected`
    /// (`None` meaning absent). Returns whether the write happened.
    fn compare_and_set(
        &self,
        scope: &Scope,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError>;

    /// Keys present in `scope`, sorted.
    fn keys(&self, scope: &Scope) -> Result<Vec<String>, StoreError>;

    /// Remove every key in `scope`.
    fn remove_scope(&self, scope: &Scope) -> Result<(), StoreError>;
}
