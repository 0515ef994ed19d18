// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dwell_core::{ItemId, MovementRecord, ReportSummary};

fn report_item(name: &str, movements: usize) -> ReportItem {
    ReportItem {
        item_id: ItemId::new(name),
        name: name.to_string(),
        members: vec!["Ana".into()],
        stage_durations: [("Backlog".to_string(), 3_600_000), ("Doing".to_string(), 1_500_000)]
            .into_iter()
            .collect(),
        total_ms: 5_100_000,
        current_stage: Some("Review".into()),
        current_stage_ms: 120_000,
        movement_count: movements,
        recent_movements: (0..movements)
            .map(|i| {
                MovementRecord::builder()
                    .id(format!("mv-{i}"))
                    .from_stage(format!("S{i}"))
                    .to_stage(format!("S{}", i + 1))
                    .timestamp_ms(i as u64 * 1000)
                    .build()
            })
            .collect(),
        marked_at_ms: None,
    }
}

fn document(groups: Vec<ReportGroup>) -> ReportDocument {
    ReportDocument {
        board_name: "Delivery <Ops>".into(),
        period_label: "Daily".into(),
        generated_at_ms: 86_400_000,
        groups,
        summary: ReportSummary { total_items: 1, total_movements: 2, active_members: 1, ..Default::default() },
    }
}

#[test]
fn escapes_markup() {
    assert_eq!(escape(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
}

#[test]
fn renders_header_and_escaped_board_name() {
    let html = render_html(&document(vec![]));
    assert!(html.contains("<h2>Delivery &lt;Ops&gt;</h2>"));
    assert!(html.contains("Generated 1970-01-02 00:00 UTC"));
    assert!(html.contains("No regular card activity found."));
}

#[test]
fn regular_items_show_last_five_movements() {
    let group = ReportGroup {
        kind: GroupKind::Regular,
        label: "Regular".into(),
        items: vec![report_item("Card", 7)],
    };
    let html = render_html(&document(vec![group]));

    assert!(!html.contains("S0 &rarr; S1"));
    assert!(!html.contains("S1 &rarr; S2"));
    assert!(html.contains("S2 &rarr; S3"));
    assert!(html.contains("S6 &rarr; S7"));
    assert!(html.contains("<li>Backlog: 1h 0m</li>"));
    assert!(html.contains("Current Status Duration:</strong> 2m in Review"));
}

#[test]
fn milestone_group_shows_since_and_total() {
    let mut item = report_item("Shipped", 1);
    item.marked_at_ms = Some(86_400_000);
    let group = ReportGroup {
        kind: GroupKind::Milestone { flag_key: "completeFlag".into() },
        label: "Fully Complete".into(),
        items: vec![item],
    };
    let html = render_html(&document(vec![group]));

    assert!(html.contains("<h2 data-flag=\"completeFlag\">Fully Complete</h2>"));
    assert!(html.contains("<strong>Since:</strong> 1970-01-02 00:00 UTC"));
    assert!(html.contains("Total Time Tracked:</strong> 1h 25m"));
}
