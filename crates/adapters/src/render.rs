// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML rendering of report documents for e-mail delivery.

use chrono::DateTime;
use dwell_core::{format_duration, GroupKind, ReportDocument, ReportGroup, ReportItem};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Regular items show at most this many of their latest movements.
pub const RECENT_MOVEMENT_LIMIT: usize = 5;

const STYLE: &str = "body{font-family:-apple-system,'Segoe UI',Roboto,sans-serif;background:#f8f9fa;padding:20px}\
.container{max-width:800px;margin:0 auto;background:#fff;padding:30px;border-radius:8px}\
.header{text-align:center;border-bottom:2px solid #0079bf;margin-bottom:30px}\
.summary{background:#f4f5f7;padding:20px;border-radius:5px;margin-bottom:30px}\
.stat{display:inline-block;margin-right:30px}\
.stat-value{font-size:24px;font-weight:bold;color:#0079bf}\
.stat-label{font-size:14px;color:#6c757d}\
.item{margin-bottom:20px;padding:15px;border:1px solid #ddd;border-radius:5px}\
.milestone{border-color:#28a745;background:#f8fff9}";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn members_or_none(members: &[String]) -> String {
    if members.is_empty() {
        "None assigned".to_string()
    } else {
        escape(&members.join(", "))
    }
}

/// Render `report` as a standalone HTML document.
pub fn render_html(report: &ReportDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_document(&mut out, report);
    out
}

fn write_document(out: &mut String, report: &ReportDocument) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", escape(&report.subject()))?;
    writeln!(out, "<style>{STYLE}</style></head><body><div class=\"container\">")?;

    writeln!(out, "<div class=\"header\">")?;
    writeln!(out, "<h1>{} Activity Report</h1>", escape(&report.period_label))?;
    writeln!(out, "<h2>{}</h2>", escape(&report.board_name))?;
    writeln!(out, "<p>Generated {}</p>", timestamp(report.generated_at_ms))?;
    writeln!(out, "</div>")?;

    write_summary(out, report)?;

    for group in report.groups.iter().filter(|g| g.kind.is_milestone()) {
        write_milestone_group(out, group)?;
    }

    writeln!(out, "<h2>Card Activity Details</h2>")?;
    match report.regular() {
        Some(group) if !group.items.is_empty() => {
            for item in &group.items {
                write_regular_item(out, item)?;
            }
        }
        _ => writeln!(out, "<p><em>No regular card activity found.</em></p>")?,
    }

    writeln!(out, "</div></body></html>")
}

fn write_stat(out: &mut String, value: impl fmt::Display, label: &str) -> fmt::Result {
    writeln!(
        out,
        "<div class=\"stat\"><div class=\"stat-value\">{value}</div><div class=\"stat-label\">{}</div></div>",
        escape(label)
    )
}

fn write_summary(out: &mut String, report: &ReportDocument) -> fmt::Result {
    let summary = &report.summary;
    writeln!(out, "<div class=\"summary\"><h3>Summary</h3>")?;
    write_stat(out, summary.total_items, "Cards with Activity")?;
    write_stat(out, summary.total_movements, "Card Movements")?;
    for group in report.groups.iter().filter(|g| g.kind.is_milestone()) {
        write_stat(out, group.items.len(), &group.label)?;
    }
    if summary.active_members > 0 {
        write_stat(out, summary.active_members, "Active Members")?;
    }
    write_stat(out, format_duration(summary.total_tracked_ms), "Time Tracked")?;
    writeln!(out, "</div>")
}

fn write_durations(out: &mut String, heading: &str, durations: &BTreeMap<String, u64>) -> fmt::Result {
    if durations.is_empty() {
        return Ok(());
    }
    writeln!(out, "<h4>{heading}</h4><ul>")?;
    for (stage, ms) in durations {
        writeln!(out, "<li>{}: {}</li>", escape(stage), format_duration(*ms))?;
    }
    writeln!(out, "</ul>")
}

fn write_milestone_group(out: &mut String, group: &ReportGroup) -> fmt::Result {
    let GroupKind::Milestone { flag_key } = &group.kind else {
        return Ok(());
    };
    writeln!(out, "<h2 data-flag=\"{}\">{}</h2>", escape(flag_key), escape(&group.label))?;
    for item in &group.items {
        writeln!(out, "<div class=\"item milestone\">")?;
        writeln!(out, "<h3>{}</h3>", escape(&item.name))?;
        writeln!(out, "<p><strong>Assigned Members:</strong> {}</p>", members_or_none(&item.members))?;
        if let Some(at) = item.marked_at_ms {
            writeln!(out, "<p><strong>Since:</strong> {}</p>", timestamp(at))?;
        }
        write_durations(out, "Time Spent in Each Status:", &item.stage_durations)?;
        writeln!(out, "<p><strong>Total Time Tracked:</strong> {}</p>", format_duration(item.total_ms))?;
        writeln!(out, "</div>")?;
    }
    Ok(())
}

fn write_regular_item(out: &mut String, item: &ReportItem) -> fmt::Result {
    writeln!(out, "<div class=\"item\">")?;
    writeln!(out, "<h3>{}</h3>", escape(&item.name))?;
    if !item.members.is_empty() {
        writeln!(out, "<p><strong>Assigned Members:</strong> {}</p>", members_or_none(&item.members))?;
    }
    write_durations(out, "Time in Each Status:", &item.stage_durations)?;
    if let (Some(stage), true) = (&item.current_stage, item.current_stage_ms > 0) {
        writeln!(
            out,
            "<p><strong>Current Status Duration:</strong> {} in {}</p>",
            format_duration(item.current_stage_ms),
            escape(stage)
        )?;
    }
    let skip = item.recent_movements.len().saturating_sub(RECENT_MOVEMENT_LIMIT);
    let recent = &item.recent_movements[skip..];
    if !recent.is_empty() {
        writeln!(out, "<h4>Recent Movements:</h4><ul>")?;
        for mv in recent {
            write!(
                out,
                "<li>{}: {} &rarr; {} ({})",
                escape(&mv.member_name),
                escape(&mv.from_stage),
                escape(&mv.to_stage),
                timestamp(mv.timestamp_ms)
            )?;
            if !mv.assigned_members.is_empty() {
                write!(out, "<br><em>Assigned: {}</em>", escape(&mv.assigned_members.join(", ")))?;
            }
            writeln!(out, "</li>")?;
        }
        writeln!(out, "</ul>")?;
    }
    writeln!(out, "</div>")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
