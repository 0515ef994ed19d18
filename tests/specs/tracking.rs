// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage tracking specs: movement detection and milestone flags through a
//! board export on disk.

use crate::prelude::*;

fn item<'a>(snapshot: &'a BoardSnapshot, id: &str) -> &'a dwell_engine::SnapshotItem {
    snapshot.items.iter().find(|i| i.item_id == id).unwrap()
}

#[tokio::test]
async fn first_sighting_then_move_records_time_in_previous_stage() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);

    let snap = world.poll_at(0).await;
    assert!(item(&snap, "c1").movements.is_empty());

    let snap = world.poll_at(5_000).await;
    assert!(item(&snap, "c1").movements.is_empty());
    assert!(item(&snap, "c1").ledger.is_empty());
    assert_eq!(item(&snap, "c1").current_stage_ms, 5_000);

    world.move_card("c1", "Doing");
    let snap = world.poll_at(10_000).await;
    let c1 = item(&snap, "c1");
    assert_eq!(c1.movements.len(), 1);
    assert_eq!(c1.movements[0].from_stage, "Backlog");
    assert_eq!(c1.movements[0].to_stage, "Doing");
    assert_eq!(c1.movements[0].member_name, "Board poller");
    assert_eq!(c1.ledger.get("Backlog"), 10_000);
    assert_eq!(c1.current_stage.as_deref(), Some("Doing"));
}

#[tokio::test]
async fn repeated_polls_never_double_count() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.poll_at(0).await;
    world.move_card("c1", "Doing");

    for t in [1_000, 1_000, 2_000, 3_000] {
        world.poll_at(t).await;
    }
    let snap = world.poll_at(4_000).await;
    let c1 = item(&snap, "c1");
    assert_eq!(c1.movements.len(), 1);
    assert_eq!(c1.ledger.total(), 1_000);
}

#[tokio::test]
async fn revisited_stage_accumulates() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.poll_at(0).await;

    world.move_card("c1", "Doing");
    world.poll_at(HOUR).await;
    world.move_card("c1", "Backlog");
    world.poll_at(3 * HOUR).await;
    world.move_card("c1", "Doing");
    let snap = world.poll_at(4 * HOUR).await;

    let c1 = item(&snap, "c1");
    assert_eq!(c1.ledger.get("Backlog"), 2 * HOUR);
    assert_eq!(c1.ledger.get("Doing"), 2 * HOUR);
    assert_eq!(c1.movements.len(), 3);
}

#[tokio::test]
async fn milestone_flag_keeps_first_match() {
    let rule = wildcard_rule(BOARD_NAME, "Complete *", "Fully Complete", "completeFlag");
    let mut world = World::new(vec![rule], None);
    world.card("c1", "Doing", &["Ana"]);
    world.poll_at(0).await;

    world.move_card("c1", "Complete - QA");
    let snap = world.poll_at(HOUR).await;
    let flag = &item(&snap, "c1").flags["completeFlag"];
    assert_eq!(flag.marked_at_ms, HOUR);
    assert_eq!(flag.label, "Fully Complete");
    assert_eq!(flag.members, vec!["Ana".to_string()]);

    world.move_card("c1", "Complete - Archived");
    let snap = world.poll_at(2 * HOUR).await;
    let c1 = item(&snap, "c1");
    assert_eq!(c1.movements.len(), 2);
    assert_eq!(c1.flags["completeFlag"].marked_at_ms, HOUR);
}

#[tokio::test]
async fn wildcard_ignores_stages_that_only_contain_the_pattern() {
    let rule = wildcard_rule(BOARD_NAME, "Complete *", "Fully Complete", "completeFlag");
    let mut world = World::new(vec![rule], None);
    world.card("c1", "Doing", &[]);
    world.poll_at(0).await;

    world.move_card("c1", "Almost Complete");
    let snap = world.poll_at(HOUR).await;
    assert!(!item(&snap, "c1").is_flagged());

    world.move_card("c1", "complete - done");
    let snap = world.poll_at(2 * HOUR).await;
    assert!(item(&snap, "c1").is_flagged());
}

#[tokio::test]
async fn archived_cards_leave_the_snapshot() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.card("c2", "Backlog", &[]);
    world.poll_at(0).await;

    world.archive("c2");
    let snap = world.poll_at(1_000).await;
    let ids: Vec<&str> = snap.items.iter().map(|i| i.item_id.as_str()).collect();
    assert_eq!(ids, vec!["c1"]);
    assert!(snap.failures.is_empty());
}

#[tokio::test]
async fn exact_rule_is_case_sensitive() {
    let rule = exact_rule(BOARD_NAME, "Done", "Shipped", "shipped");
    let mut world = World::new(vec![rule], None);
    world.card("c1", "Doing", &[]);
    world.poll_at(0).await;

    world.move_card("c1", "done");
    let snap = world.poll_at(HOUR).await;
    assert!(!item(&snap, "c1").is_flagged());

    world.move_card("c1", "Done");
    let snap = world.poll_at(2 * HOUR).await;
    assert_eq!(item(&snap, "c1").flags["shipped"].label, "Shipped");
}
