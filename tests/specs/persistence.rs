// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence specs: tracked state survives restarts and can be purged.

use crate::prelude::*;

fn c1(snapshot: &BoardSnapshot) -> &dwell_engine::SnapshotItem {
    snapshot.items.iter().find(|i| i.item_id == "c1").unwrap()
}

#[tokio::test]
async fn pointer_survives_restart() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.poll_at(0).await;

    world.restart();
    world.move_card("c1", "Doing");
    let snap = world.poll_at(10_000).await;
    assert_eq!(c1(&snap).ledger.get("Backlog"), 10_000);

    world.restart();
    let snap = world.poll_at(20_000).await;
    assert_eq!(c1(&snap).movements.len(), 1);
    assert_eq!(c1(&snap).ledger.total(), 10_000);
    assert_eq!(c1(&snap).current_stage_ms, 10_000);
}

#[tokio::test]
async fn store_document_uses_scoped_keys() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &["Ana"]);
    world.poll_at(0).await;
    world.move_card("c1", "Doing");
    world.poll_at(1_000).await;

    let doc: serde_json::Value =
        serde_json::from_slice(&std::fs::read(world.store_path()).unwrap()).unwrap();
    assert_eq!(doc["v"], 1);

    let item = &doc["scopes"]["item:c1"];
    assert_eq!(item["stagePointer"]["stageName"], "Doing");
    assert_eq!(item["listDurations"]["durations"]["Backlog"], 1_000);
    assert_eq!(item["movementEntries"][0]["toStage"], "Doing");
    assert_eq!(item["cardMembers"][0], "Ana");
    assert_eq!(doc["scopes"]["board:b1"]["settings"]["boardName"], BOARD_NAME);
}

#[tokio::test]
async fn purge_forgets_item_history() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.poll_at(0).await;
    world.move_card("c1", "Doing");
    world.poll_at(1_000).await;

    world.purge("c1");
    world.restart();

    // The next poll is a first sighting again.
    let snap = world.poll_at(2_000).await;
    assert!(c1(&snap).movements.is_empty());
    assert!(c1(&snap).ledger.is_empty());
    assert_eq!(c1(&snap).current_stage.as_deref(), Some("Doing"));
}
