// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dwell_adapters::{DeliveryError, SourceError};
use dwell_storage::StoreError;
use thiserror::Error;

/// Errors from refresh and report cycles
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("no report address configured for board {0}")]
    MissingReportAddress(String),
    #[error("unknown board: {0}")]
    UnknownBoard(String),
}

impl EngineError {
    /// Errors that abort a whole cycle rather than a single item.
    pub fn is_systemic(&self) -> bool {
        match self {
            EngineError::Store(e) => e.is_systemic(),
            EngineError::Source(_) | EngineError::Delivery(_) => false,
            EngineError::MissingReportAddress(_) | EngineError::UnknownBoard(_) => true,
        }
    }
}
