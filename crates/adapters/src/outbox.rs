// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbox delivery: one RFC 5322 message file per report.
//!
//! A system mailer (or anything watching the directory) picks the files up.

use crate::render::render_html;
use crate::sink::{Delivered, DeliveryError, ReportSink};
use async_trait::async_trait;
use chrono::DateTime;
use dwell_core::ReportDocument;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct OutboxSink {
    dir: Arc<PathBuf>,
    sender: Arc<str>,
}

impl OutboxSink {
    pub fn new(dir: impl Into<PathBuf>, sender: &str) -> Self {
        Self { dir: Arc::new(dir.into()), sender: Arc::from(sender) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// A bare address: one `@`, non-empty local and domain parts, no
/// whitespace or control characters (which would allow header injection).
pub fn is_plausible_address(addr: &str) -> bool {
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !addr.chars().any(|c| c.is_whitespace() || c.is_control() || c == '<' || c == '>')
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Header values come from board names; fold anything that would break a
/// header line.
fn header_value(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

pub fn compose_message(report: &ReportDocument, from: &str, to: &str) -> String {
    let date = i64::try_from(report.generated_at_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
        .to_rfc2822();
    let mut msg = String::new();
    msg.push_str(&format!("From: {from}\r\n"));
    msg.push_str(&format!("To: {to}\r\n"));
    msg.push_str(&format!("Subject: {}\r\n", header_value(&report.subject())));
    msg.push_str(&format!("Date: {date}\r\n"));
    msg.push_str("MIME-Version: 1.0\r\n");
    msg.push_str("Content-Type: text/html; charset=utf-8\r\n");
    msg.push_str("\r\n");
    msg.push_str(&render_html(report));
    msg
}

#[async_trait]
impl ReportSink for OutboxSink {
    async fn deliver(&self, report: &ReportDocument, to: &str) -> Result<Delivered, DeliveryError> {
        if !is_plausible_address(to) {
            return Err(DeliveryError::Rejected(format!("invalid recipient address: {to:?}")));
        }
        if !is_plausible_address(&self.sender) {
            return Err(DeliveryError::Rejected(format!(
                "invalid sender address: {:?}",
                self.sender
            )));
        }

        tokio::fs::create_dir_all(self.dir.as_path()).await?;
        let stem = format!("{}-{}", report.generated_at_ms, slug(&report.board_name));
        let mut path = self.dir.join(format!("{stem}.eml"));
        let mut n = 1;
        while tokio::fs::try_exists(&path).await? {
            n += 1;
            path = self.dir.join(format!("{stem}-{n}.eml"));
        }

        let tmp = path.with_extension("eml.tmp");
        tokio::fs::write(&tmp, compose_message(report, &self.sender, to)).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(to, path = %path.display(), subject = %report.subject(), "report queued in outbox");
        Ok(Delivered { location: path.display().to_string() })
    }
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
