// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store.

use crate::kv::{KvStore, Scope, StoreError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) type Scopes = BTreeMap<String, BTreeMap<String, Value>>;

/// Volatile store shared between clones. Used by tests and one-shot runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Scopes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty scopes.
    pub fn scope_count(&self) -> usize {
        self.inner.lock().len()
    }
}

/// Compare-and-set against an in-memory scope map. Shared with the file store.
pub(crate) fn cas_in(
    scopes: &mut Scopes,
    scope: &Scope,
    key: &str,
    expected: Option<&Value>,
    new: Value,
) -> bool {
    let current = scopes.get(&scope.key()).and_then(|s| s.get(key));
    if current != expected {
        return false;
    }
    scopes.entry(scope.key()).or_default().insert(key.to_string(), new);
    true
}

pub(crate) fn remove_in(scopes: &mut Scopes, scope: &Scope, key: &str) {
    let scope_key = scope.key();
    if let Some(entries) = scopes.get_mut(&scope_key) {
        entries.remove(key);
        if entries.is_empty() {
            scopes.remove(&scope_key);
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, scope: &Scope, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.inner.lock().get(&scope.key()).and_then(|s| s.get(key)).cloned())
    }

    fn set(&self, scope: &Scope, key: &str, value: Value) -> Result<(), StoreError> {
        self.inner.lock().entry(scope.key()).or_default().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, scope: &Scope, key: &str) -> Result<(), StoreError> {
        remove_in(&mut self.inner.lock(), scope, key);
        Ok(())
    }

    fn compare_and_set(
        &self,
        scope: &Scope,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        Ok(cas_in(&mut self.inner.lock(), scope, key, expected, new))
    }

    fn keys(&self, scope: &Scope) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .lock()
            .get(&scope.key())
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn remove_scope(&self, scope: &Scope) -> Result<(), StoreError> {
        self.inner.lock().remove(&scope.key());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
