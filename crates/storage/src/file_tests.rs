// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dwell_core::ItemId;
use serde_json::json;
use tempfile::tempdir;

fn scope() -> Scope {
    Scope::item(&ItemId::new("c1"))
}

#[test]
fn values_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.set(&scope(), "stagePointer", json!({"stageId": "l1"})).unwrap();
    assert!(store.compare_and_set(&scope(), "flag:done", None, json!(1)).unwrap());
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        reopened.get(&scope(), "stagePointer").unwrap(),
        Some(json!({"stageId": "l1"}))
    );
    assert_eq!(reopened.keys(&scope()).unwrap(), vec!["flag:done", "stagePointer"]);
}

#[test]
fn document_is_versioned() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.set(&scope(), "k", json!(1)).unwrap();

    let raw: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["v"], json!(CURRENT_STORE_VERSION));
    assert_eq!(raw["scopes"]["item:c1"]["k"], json!(1));
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn corrupt_document_is_moved_aside() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, b"{ not json").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(&scope(), "k").unwrap(), None);
    assert_eq!(fs::read(path.with_extension("bak")).unwrap(), b"{ not json");
}

#[test]
fn newer_version_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, br#"{"v": 99, "scopes": {}}"#).unwrap();

    let err = FileStore::open(&path).err().unwrap();
    assert!(err.is_systemic());
}

#[test]
fn failed_cas_does_not_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.set(&scope(), "k", json!(1)).unwrap();
    let before = fs::read(&path).unwrap();

    assert!(!store.compare_and_set(&scope(), "k", Some(&json!(2)), json!(3)).unwrap());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn cas_lost_after_precheck_does_not_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.set(&scope(), "k", json!(1)).unwrap();
    fs::remove_file(&path).unwrap();

    // As if another writer landed after the unlocked check
    let changed = store.mutate_if(|scopes| cas_in(scopes, &scope(), "k", Some(&json!(2)), json!(3)));
    assert!(!changed.unwrap());
    assert!(!path.exists());
    assert_eq!(store.get(&scope(), "k").unwrap(), Some(json!(1)));

    assert!(store.mutate_if(|scopes| cas_in(scopes, &scope(), "k", Some(&json!(1)), json!(3))).unwrap());
    assert!(path.exists());
    assert_eq!(store.get(&scope(), "k").unwrap(), Some(json!(3)));
}

#[test]
fn write_failure_leaves_memory_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub").join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.set(&scope(), "k", json!(1)).unwrap();

    fs::remove_dir_all(dir.path().join("sub")).unwrap();
    assert!(store.set(&scope(), "k", json!(2)).is_err());
    assert_eq!(store.get(&scope(), "k").unwrap(), Some(json!(1)));
}

#[test]
fn rotate_bak_keeps_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    for i in 0..4 {
        let bak = rotate_bak_path(&path);
        fs::write(&bak, format!("{i}")).unwrap();
    }

    assert_eq!(fs::read_to_string(path.with_extension("bak")).unwrap(), "3");
    assert_eq!(fs::read_to_string(path.with_extension("bak.2")).unwrap(), "2");
    assert_eq!(fs::read_to_string(path.with_extension("bak.3")).unwrap(), "1");
    assert!(!path.with_extension("bak.4").exists());
}
