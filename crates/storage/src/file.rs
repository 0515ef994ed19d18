// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed store.
//!
//! The whole store is one versioned JSON document. Every mutation is
//! applied to a copy, written to a temp file, renamed over the original,
//! and only then made visible in memory, so a failed write leaves both the
//! file and the in-memory view unchanged.

use crate::kv::{KvStore, Scope, StoreError};
use crate::memory::{cas_in, remove_in, Scopes};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Current store document schema version
pub const CURRENT_STORE_VERSION: u32 = 1;

const MAX_BAK_FILES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "v")]
    version: u32,
    #[serde(default)]
    scopes: Scopes,
}

impl Default for Document {
    fn default() -> Self {
        Self { version: CURRENT_STORE_VERSION, scopes: Scopes::new() }
    }
}

#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    doc: Arc<Mutex<Document>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A document that cannot be parsed is moved aside to a rotated `.bak`
    /// path and the store starts empty. A document written by a newer
    /// version is refused.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let doc = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Document>(&bytes) {
                Ok(doc) if doc.version > CURRENT_STORE_VERSION => {
                    return Err(StoreError::Unavailable(format!(
                        "{} has schema version {} (supported: {})",
                        path.display(),
                        doc.version,
                        CURRENT_STORE_VERSION
                    )));
                }
                Ok(doc) => doc,
                Err(e) => {
                    let bak = rotate_bak_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        backup = %bak.display(),
                        error = %e,
                        "store document is corrupt, moving aside and starting empty"
                    );
                    fs::rename(&path, &bak)?;
                    Document::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, doc: Arc::new(Mutex::new(doc)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the document, persist it, then publish it.
    fn mutate(&self, f: impl FnOnce(&mut Scopes)) -> Result<(), StoreError> {
        self.mutate_if(|scopes| {
            f(scopes);
            true
        })
        .map(|_| ())
    }

    /// Like [`FileStore::mutate`], but `f` reports whether it changed
    /// anything and an unchanged document is not written.
    fn mutate_if(&self, f: impl FnOnce(&mut Scopes) -> bool) -> Result<bool, StoreError> {
        let mut guard = self.doc.lock();
        let mut next = guard.clone();
        if !f(&mut next.scopes) {
            return Ok(false);
        }
        self.write(&next)?;
        *guard = next;
        Ok(true)
    }

    fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(doc)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, scope: &Scope, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.doc.lock().scopes.get(&scope.key()).and_then(|s| s.get(key)).cloned())
    }

    fn set(&self, scope: &Scope, key: &str, value: Value) -> Result<(), StoreError> {
        self.mutate(|scopes| {
            scopes.entry(scope.key()).or_default().insert(key.to_string(), value);
        })
    }

    fn remove(&self, scope: &Scope, key: &str) -> Result<(), StoreError> {
        self.mutate(|scopes| remove_in(scopes, scope, key))
    }

    fn compare_and_set(
        &self,
        scope: &Scope,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        {
            let guard = self.doc.lock();
            let current = guard.scopes.get(&scope.key()).and_then(|s| s.get(key));
            if current != expected {
                return Ok(false);
            }
        }
        self.mutate_if(|scopes| cas_in(scopes, scope, key, expected, new))
    }

    fn keys(&self, scope: &Scope) -> Result<Vec<String>, StoreError> {
        Ok(self
            .doc
            .lock()
            .scopes
            .get(&scope.key())
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn remove_scope(&self, scope: &Scope) -> Result<(), StoreError> {
        self.mutate(|scopes| {
            scopes.remove(&scope.key());
        })
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
