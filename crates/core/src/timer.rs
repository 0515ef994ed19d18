// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifiers for the poll and report schedules.

use crate::item::BoardId;

crate::define_id! {
    /// Unique identifier for a scheduled timer.
    pub struct TimerId;
}

impl TimerId {
    pub fn poll(board: &BoardId) -> Self {
        TimerKind::Poll { board: board.as_str() }.to_timer_id()
    }

    pub fn report(board: &BoardId) -> Self {
        TimerKind::Report { board: board.as_str() }.to_timer_id()
    }

    /// Parse this timer ID into a typed `TimerKind`.
    pub fn kind(&self) -> Option<TimerKind<'_>> {
        TimerKind::parse(self.as_str())
    }

    pub fn board_id(&self) -> Option<BoardId> {
        match self.kind()? {
            TimerKind::Poll { board } | TimerKind::Report { board } => Some(BoardId::new(board)),
        }
    }
}

/// Parsed representation of a timer ID for type-safe routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind<'a> {
    Poll { board: &'a str },
    Report { board: &'a str },
}

impl<'a> TimerKind<'a> {
    /// Returns `None` for unrecognized timer ID formats.
    pub fn parse(id: &'a str) -> Option<TimerKind<'a>> {
        if let Some(board) = id.strip_prefix("poll:") {
            return (!board.is_empty()).then_some(TimerKind::Poll { board });
        }
        if let Some(board) = id.strip_prefix("report:") {
            return (!board.is_empty()).then_some(TimerKind::Report { board });
        }
        None
    }

    pub fn to_timer_id(&self) -> TimerId {
        match self {
            TimerKind::Poll { board } => TimerId::new(format!("poll:{board}")),
            TimerKind::Report { board } => TimerId::new(format!("report:{board}")),
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
