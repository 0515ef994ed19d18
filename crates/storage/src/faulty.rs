// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-injecting store wrapper for tests.

use crate::kv::{KvStore, Scope, StoreError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Default)]
struct Faults {
    unavailable: bool,
    failing_writes: HashSet<String>,
    write_count: usize,
}

/// Wraps a store and fails selected calls.
#[derive(Clone)]
pub struct FaultyStore<S> {
    inner: S,
    faults: Arc<Mutex<Faults>>,
}

impl<S: KvStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, faults: Arc::default() }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail every call with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.lock().unavailable = unavailable;
    }

    /// Fail writes (set, compare-and-set, remove) to `key` in any scope.
    pub fn fail_writes_to(&self, key: &str) {
        self.faults.lock().failing_writes.insert(key.to_string());
    }

    pub fn clear_faults(&self) {
        let mut faults = self.faults.lock();
        faults.unavailable = false;
        faults.failing_writes.clear();
    }

    /// Successful writes that reached the inner store.
    pub fn write_count(&self) -> usize {
        self.faults.lock().write_count
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.faults.lock().unavailable {
            return Err(StoreError::Unavailable("injected outage".into()));
        }
        Ok(())
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        let mut faults = self.faults.lock();
        if faults.unavailable {
            return Err(StoreError::Unavailable("injected outage".into()));
        }
        if faults.failing_writes.contains(key) {
            return Err(StoreError::Io(std::io::Error::other(format!(
                "injected write failure for {key}"
            ))));
        }
        faults.write_count += 1;
        Ok(())
    }
}

impl<S: KvStore> KvStore for FaultyStore<S> {
    fn get(&self, scope: &Scope, key: &str) -> Result<Option<Value>, StoreError> {
        self.check_read()?;
        self.inner.get(scope, key)
    }

    fn set(&self, scope: &Scope, key: &str, value: Value) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.set(scope, key, value)
    }

    fn remove(&self, scope: &Scope, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.remove(scope, key)
    }

    fn compare_and_set(
        &self,
        scope: &Scope,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        self.check_write(key)?;
        self.inner.compare_and_set(scope, key, expected, new)
    }

    fn keys(&self, scope: &Scope) -> Result<Vec<String>, StoreError> {
        self.check_read()?;
        self.inner.keys(scope)
    }

    fn remove_scope(&self, scope: &Scope) -> Result<(), StoreError> {
        self.check_read()?;
        self.inner.remove_scope(scope)
    }
}
