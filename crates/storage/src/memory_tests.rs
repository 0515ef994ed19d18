// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dwell_core::{BoardId, ItemId};
use serde_json::json;

fn item_scope() -> Scope {
    Scope::item(&ItemId::new("c1"))
}

#[test]
fn get_set_remove() {
    let store = MemoryStore::new();
    let scope = item_scope();
    assert_eq!(store.get(&scope, "k").unwrap(), None);

    store.set(&scope, "k", json!(1)).unwrap();
    assert_eq!(store.get(&scope, "k").unwrap(), Some(json!(1)));

    store.remove(&scope, "k").unwrap();
    assert_eq!(store.get(&scope, "k").unwrap(), None);
    assert_eq!(store.scope_count(), 0);
}

#[test]
fn scopes_do_not_collide() {
    let store = MemoryStore::new();
    let item = Scope::item(&ItemId::new("x"));
    let board = Scope::board(&BoardId::new("x"));
    store.set(&item, "settings", json!("item")).unwrap();
    store.set(&board, "settings", json!("board")).unwrap();

    assert_eq!(store.get(&item, "settings").unwrap(), Some(json!("item")));
    assert_eq!(store.get(&board, "settings").unwrap(), Some(json!("board")));
}

#[test]
fn compare_and_set_absent_then_present() {
    let store = MemoryStore::new();
    let scope = item_scope();

    assert!(store.compare_and_set(&scope, "k", None, json!(1)).unwrap());
    assert!(!store.compare_and_set(&scope, "k", None, json!(2)).unwrap());
    assert!(!store.compare_and_set(&scope, "k", Some(&json!(5)), json!(2)).unwrap());
    assert!(store.compare_and_set(&scope, "k", Some(&json!(1)), json!(2)).unwrap());
    assert_eq!(store.get(&scope, "k").unwrap(), Some(json!(2)));
}

#[test]
fn clones_share_state() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.set(&item_scope(), "k", json!(true)).unwrap();
    assert_eq!(other.get(&item_scope(), "k").unwrap(), Some(json!(true)));
}

#[test]
fn keys_and_remove_scope() {
    let store = MemoryStore::new();
    let scope = item_scope();
    store.set(&scope, "b", json!(1)).unwrap();
    store.set(&scope, "a", json!(1)).unwrap();
    assert_eq!(store.keys(&scope).unwrap(), vec!["a", "b"]);

    store.remove_scope(&scope).unwrap();
    assert!(store.keys(&scope).unwrap().is_empty());
}

#[test]
fn scope_display() {
    assert_eq!(Scope::item(&ItemId::new("c1")).to_string(), "item:c1");
    assert_eq!(Scope::board(&BoardId::new("b1")).key(), "board:b1");
}
