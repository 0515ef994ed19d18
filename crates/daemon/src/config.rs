// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dwell.toml`: poll cadence, report time, and the tracked boards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dwell_core::{parse_duration, BoardId, BoardSettings, MatchMode, MilestoneRule};
use dwell_engine::DailySchedule;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_REPORT_TIME: &str = "23:00";
const DEFAULT_POLLER_NAME: &str = "Board poller";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid poll_interval {0:?}: {1}")]
    PollInterval(String, String),

    #[error("invalid report_time_utc {0:?}: {1}")]
    ReportTime(String, String),

    #[error("duplicate board id {0}")]
    DuplicateBoard(String),

    #[error("board {0} has an empty {1}")]
    EmptyField(String, &'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    poll_interval: Option<String>,
    report_time_utc: Option<String>,
    sender: Option<String>,
    poller_name: Option<String>,
    #[serde(default, rename = "board")]
    boards: Vec<RawBoard>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBoard {
    id: String,
    name: String,
    export: PathBuf,
    report_address: Option<String>,
    #[serde(default, rename = "milestone")]
    milestones: Vec<RawMilestone>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMilestone {
    pattern: String,
    #[serde(default = "default_mode")]
    mode: MatchMode,
    label: String,
    flag: String,
    #[serde(default)]
    case_insensitive: bool,
}

fn default_mode() -> MatchMode {
    MatchMode::Exact
}

/// One tracked board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub id: BoardId,
    pub export: PathBuf,
    pub settings: BoardSettings,
}

/// Validated daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub poll_interval: Duration,
    pub report_time: DailySchedule,
    pub sender: String,
    pub poller_name: String,
    pub boards: Vec<BoardConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text, path)
    }

    /// Parse config text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: origin.to_path_buf(), source })?;
        raw.validate()
    }

    pub fn board(&self, id: &BoardId) -> Option<&BoardConfig> {
        self.boards.iter().find(|b| &b.id == id)
    }

    /// `(board id, export path)` pairs for the export source.
    pub fn exports(&self) -> impl Iterator<Item = (BoardId, PathBuf)> + '_ {
        self.boards.iter().map(|b| (b.id.clone(), b.export.clone()))
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let poll_interval = match self.poll_interval {
            Some(s) => {
                let d = parse_duration(&s).map_err(|e| ConfigError::PollInterval(s.clone(), e))?;
                if d.is_zero() {
                    return Err(ConfigError::PollInterval(s, "must be positive".into()));
                }
                d
            }
            None => DEFAULT_POLL_INTERVAL,
        };

        let report_raw = self.report_time_utc.unwrap_or_else(|| DEFAULT_REPORT_TIME.to_string());
        let report_time = report_raw
            .parse::<DailySchedule>()
            .map_err(|e| ConfigError::ReportTime(report_raw.clone(), e))?;

        let mut boards: Vec<BoardConfig> = Vec::with_capacity(self.boards.len());
        for raw in self.boards {
            if raw.id.trim().is_empty() {
                return Err(ConfigError::EmptyField(raw.name, "id"));
            }
            if raw.name.trim().is_empty() {
                return Err(ConfigError::EmptyField(raw.id, "name"));
            }
            let id = BoardId::new(raw.id.as_str());
            if boards.iter().any(|b| b.id == id) {
                return Err(ConfigError::DuplicateBoard(raw.id));
            }
            let milestone_rules = raw
                .milestones
                .into_iter()
                .map(|m| MilestoneRule {
                    board_name: raw.name.clone(),
                    mode: m.mode,
                    pattern: m.pattern,
                    label: m.label,
                    flag_key: m.flag,
                    case_insensitive: m.case_insensitive,
                })
                .collect();
            boards.push(BoardConfig {
                id,
                export: raw.export,
                settings: BoardSettings {
                    board_name: raw.name,
                    report_address: raw.report_address,
                    milestone_rules,
                },
            });
        }

        Ok(Config {
            poll_interval,
            report_time,
            sender: self.sender.unwrap_or_else(|| "dwell@localhost".to_string()),
            poller_name: self.poller_name.unwrap_or_else(|| DEFAULT_POLLER_NAME.to_string()),
            boards,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
