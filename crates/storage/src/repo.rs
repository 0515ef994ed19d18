// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed access to one item's or one board's keys.
//!
//! Each write touches exactly one key. Read-modify-write updates go
//! through compare-and-set and retry on contention, so concurrent pollers
//! never lose each other's writes.

use crate::kv::{KvStore, Scope, StoreError};
use dwell_core::{
    BoardId, BoardSettings, DurationLedger, ItemId, MovementId, MovementRecord, StagePointer,
    StatusFlag,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Persisted key names.
pub mod keys {
    pub const STAGE_POINTER: &str = "stagePointer";
    pub const LIST_DURATIONS: &str = "listDurations";
    pub const MOVEMENT_ENTRIES: &str = "movementEntries";
    pub const CARD_MEMBERS: &str = "cardMembers";
    pub const FLAG_PREFIX: &str = "flag:";
    pub const SETTINGS: &str = "settings";

    pub fn flag(flag_key: &str) -> String {
        format!("{FLAG_PREFIX}{flag_key}")
    }
}

const MAX_CAS_ATTEMPTS: usize = 8;

/// A decoded value together with the raw value it was read from, for use as
/// the `expected` side of a later compare-and-set.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    raw: Value,
}

impl<T> Versioned<T> {
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(raw)?)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(value)?)
}

/// Repository over one item's scope.
pub struct ItemRepo<'a, S> {
    store: &'a S,
    scope: Scope,
}

impl<'a, S: KvStore> ItemRepo<'a, S> {
    pub fn new(store: &'a S, item: &ItemId) -> Self {
        Self { store, scope: Scope::item(item) }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.store.get(&self.scope, key)?.map(decode).transpose()
    }

    /// Read-modify-write `key` until the compare-and-set lands.
    ///
    /// `f` returns false to leave the value unchanged; the result reports
    /// whether a write happened.
    fn update<T, F>(&self, key: &str, mut f: F) -> Result<bool, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnMut(&mut T) -> bool,
    {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let raw = self.store.get(&self.scope, key)?;
            let mut value: T = match &raw {
                Some(v) => decode(v.clone())?,
                None => T::default(),
            };
            if !f(&mut value) {
                return Ok(false);
            }
            if self.store.compare_and_set(&self.scope, key, raw.as_ref(), encode(&value)?)? {
                return Ok(true);
            }
            tracing::debug!(scope = %self.scope, key, "compare-and-set lost, retrying");
        }
        Err(StoreError::Conflict { scope: self.scope.key(), key: key.to_string() })
    }

    pub fn pointer(&self) -> Result<Option<Versioned<StagePointer>>, StoreError> {
        match self.store.get(&self.scope, keys::STAGE_POINTER)? {
            Some(raw) => Ok(Some(Versioned { value: decode(raw.clone())?, raw })),
            None => Ok(None),
        }
    }

    /// Write the first pointer. Returns false if another poller already did.
    pub fn init_pointer(&self, pointer: &StagePointer) -> Result<bool, StoreError> {
        self.store.compare_and_set(&self.scope, keys::STAGE_POINTER, None, encode(pointer)?)
    }

    /// Replace the pointer only if it still equals `previous`.
    pub fn advance_pointer(
        &self,
        previous: &Versioned<StagePointer>,
        next: &StagePointer,
    ) -> Result<bool, StoreError> {
        self.store.compare_and_set(
            &self.scope,
            keys::STAGE_POINTER,
            Some(previous.raw()),
            encode(next)?,
        )
    }

    pub fn ledger(&self) -> Result<DurationLedger, StoreError> {
        Ok(self.read(keys::LIST_DURATIONS)?.unwrap_or_default())
    }

    /// Fold `elapsed_ms` into the ledger once per transition.
    pub fn apply_elapsed(
        &self,
        transition: &MovementId,
        stage_name: &str,
        elapsed_ms: u64,
    ) -> Result<bool, StoreError> {
        self.update(keys::LIST_DURATIONS, |ledger: &mut DurationLedger| {
            ledger.apply(transition, stage_name, elapsed_ms)
        })
    }

    pub fn movements(&self) -> Result<Vec<MovementRecord>, StoreError> {
        Ok(self.read(keys::MOVEMENT_ENTRIES)?.unwrap_or_default())
    }

    pub fn movement(&self, id: &MovementId) -> Result<Option<MovementRecord>, StoreError> {
        Ok(self.movements()?.into_iter().find(|r| &r.id == id))
    }

    /// Append `record` unless a record with the same id is already logged.
    pub fn append_movement(&self, record: &MovementRecord) -> Result<bool, StoreError> {
        self.update(keys::MOVEMENT_ENTRIES, |log: &mut Vec<MovementRecord>| {
            if log.iter().any(|r| r.id == record.id) {
                return false;
            }
            log.push(record.clone());
            true
        })
    }

    pub fn members(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read(keys::CARD_MEMBERS)?.unwrap_or_default())
    }

    pub fn set_members(&self, members: &[String]) -> Result<(), StoreError> {
        self.store.set(&self.scope, keys::CARD_MEMBERS, encode(&members)?)
    }

    pub fn flag(&self, flag_key: &str) -> Result<Option<StatusFlag>, StoreError> {
        self.read(&keys::flag(flag_key))
    }

    /// Write-once: an existing flag is never overwritten.
    pub fn mark_flag(&self, flag_key: &str, flag: &StatusFlag) -> Result<bool, StoreError> {
        self.store.compare_and_set(&self.scope, &keys::flag(flag_key), None, encode(flag)?)
    }

    /// All flags on the item keyed by flag key, sorted by key.
    pub fn flags(&self) -> Result<Vec<(String, StatusFlag)>, StoreError> {
        let mut out = Vec::new();
        for key in self.store.keys(&self.scope)? {
            if let Some(flag_key) = key.strip_prefix(keys::FLAG_PREFIX) {
                if let Some(flag) = self.read(&key)? {
                    out.push((flag_key.to_string(), flag));
                }
            }
        }
        Ok(out)
    }

    /// Remove everything stored for the item.
    pub fn purge(&self) -> Result<(), StoreError> {
        self.store.remove_scope(&self.scope)
    }
}

/// Repository over one board's scope.
pub struct BoardRepo<'a, S> {
    store: &'a S,
    scope: Scope,
}

impl<'a, S: KvStore> BoardRepo<'a, S> {
    pub fn new(store: &'a S, board: &BoardId) -> Self {
        Self { store, scope: Scope::board(board) }
    }

    pub fn settings(&self) -> Result<Option<BoardSettings>, StoreError> {
        self.store.get(&self.scope, keys::SETTINGS)?.map(decode).transpose()
    }

    pub fn save_settings(&self, settings: &BoardSettings) -> Result<(), StoreError> {
        self.store.set(&self.scope, keys::SETTINGS, encode(settings)?)
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
