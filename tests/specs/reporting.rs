// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report specs: compile a board and deliver it to the outbox.

use crate::prelude::*;
use std::time::Duration;

/// c1 makes two regular moves, c2 reaches a milestone, c3 never moves.
async fn busy_board() -> World {
    let rule = wildcard_rule(BOARD_NAME, "Complete *", "Fully Complete", "completeFlag");
    let mut world = World::new(vec![rule], Some("ops@example.com"));
    world.card("c1", "Backlog", &["Ana", "Bo"]);
    world.card("c2", "Doing", &["Bo", "Cy"]);
    world.card("c3", "Backlog", &["Dee"]);
    world.poll_at(0).await;

    world.move_card("c1", "Doing");
    world.move_card("c2", "Complete - QA");
    world.poll_at(HOUR).await;

    world.move_card("c1", "Review");
    world.poll_at(3 * HOUR).await;
    world
}

#[tokio::test]
async fn report_groups_milestones_before_regular_items() {
    let world = busy_board().await;
    let outcome = world.report("Daily").await.unwrap();
    let doc = &outcome.document;

    let labels: Vec<&str> = doc.groups.iter().map(|g| g.label.as_str()).collect();
    similar_asserts::assert_eq!(labels, vec!["Fully Complete", "Card Activity"]);

    let milestone = doc.milestone("completeFlag").unwrap();
    assert_eq!(milestone.items.len(), 1);
    assert_eq!(milestone.items[0].item_id, "c2");
    assert_eq!(milestone.items[0].marked_at_ms, Some(HOUR));

    let regular = doc.regular().unwrap();
    assert_eq!(regular.items.len(), 1);
    assert_eq!(regular.items[0].item_id, "c1");
    assert_eq!(regular.items[0].total_ms, 3 * HOUR);
    assert_eq!(regular.items[0].movement_count, 2);

    assert_eq!(doc.summary.total_items, 2);
    assert_eq!(doc.summary.total_movements, 2);
    assert_eq!(doc.summary.active_members, 3);
}

#[tokio::test]
async fn items_without_movement_are_left_out() {
    let world = busy_board().await;
    let doc = world.report("Daily").await.unwrap().document;
    let ids: Vec<&str> =
        doc.groups.iter().flat_map(|g| g.items.iter()).map(|i| i.item_id.as_str()).collect();
    assert!(!ids.contains(&"c3"));
}

#[tokio::test]
async fn delivered_report_lands_in_outbox() {
    let world = busy_board().await;
    let outcome = world.report("Daily").await.unwrap();

    let messages = world.outbox();
    assert_eq!(messages.len(), 1);
    assert!(outcome.delivered.location.ends_with(".eml"));

    let message = &messages[0];
    assert!(message.contains("To: ops@example.com\r\n"));
    assert!(message.contains("Subject: Daily Card Activity Report - Delivery\r\n"));
    assert!(message.contains("Content-Type: text/html"));
    assert!(message.contains("Fully Complete"));
    assert!(message.contains("Card c1"));
    assert!(!message.contains("Card c3"));
}

#[tokio::test]
async fn missing_address_fails_before_delivery() {
    let mut world = World::new(vec![], None);
    world.card("c1", "Backlog", &[]);
    world.poll_at(0).await;

    let err = world.report("Daily").await.unwrap_err();
    assert!(matches!(err, EngineError::MissingReportAddress(ref name) if name == BOARD_NAME));
    assert!(world.outbox().is_empty());
}

#[tokio::test]
async fn window_keeps_only_recent_movements() {
    let world = busy_board().await;
    world.clock.set_epoch_ms(4 * HOUR);

    // Only c1's second move (at 3h) is inside the last two hours.
    let doc = world.report_since("Recent", Duration::from_millis(2 * HOUR)).await.document;
    let ids: Vec<&str> =
        doc.groups.iter().flat_map(|g| g.items.iter()).map(|i| i.item_id.as_str()).collect();
    similar_asserts::assert_eq!(ids, vec!["c1"]);
    assert_eq!(doc.summary.total_movements, 1);
}
