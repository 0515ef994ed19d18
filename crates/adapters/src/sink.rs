// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report delivery sink.

use async_trait::async_trait;
use dwell_core::ReportDocument;
use thiserror::Error;

/// Errors from report delivery
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery rejected: {0}")]
    Rejected(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a delivered report ended up (a file path, a message id, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub location: String,
}

/// Accepts a compiled report for one destination address.
///
/// Implementations do not retry; failures are returned to the caller.
#[async_trait]
pub trait ReportSink: Clone + Send + Sync + 'static {
    async fn deliver(&self, report: &ReportDocument, to: &str)
        -> Result<Delivered, DeliveryError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Delivered, DeliveryError, ReportSink};
    use async_trait::async_trait;
    use dwell_core::ReportDocument;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded delivery
    #[derive(Debug, Clone)]
    pub struct DeliveryCall {
        pub to: String,
        pub subject: String,
        pub report: ReportDocument,
    }

    #[derive(Default)]
    struct FakeSinkState {
        calls: Vec<DeliveryCall>,
        reject_with: Option<String>,
    }

    /// Fake sink for testing
    #[derive(Clone, Default)]
    pub struct FakeReportSink {
        inner: Arc<Mutex<FakeSinkState>>,
    }

    impl FakeReportSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reject every delivery with `reason` until cleared with `None`.
        pub fn reject_with(&self, reason: Option<&str>) {
            self.inner.lock().reject_with = reason.map(String::from);
        }

        /// Successful deliveries
        pub fn calls(&self) -> Vec<DeliveryCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl ReportSink for FakeReportSink {
        async fn deliver(
            &self,
            report: &ReportDocument,
            to: &str,
        ) -> Result<Delivered, DeliveryError> {
            let mut state = self.inner.lock();
            if let Some(reason) = &state.reject_with {
                return Err(DeliveryError::Rejected(reason.clone()));
            }
            state.calls.push(DeliveryCall {
                to: to.to_string(),
                subject: report.subject(),
                report: report.clone(),
            });
            Ok(Delivered { location: format!("fake:{}", state.calls.len()) })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{DeliveryCall, FakeReportSink};
