//! Monitoring data types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::batch::ProcessingStatus;

/// A batch under active monitoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedBatch {
    /// Batch ID
    pub id: String,
    /// Last observed status, `Unknown` until the first poll
    pub status: ProcessingStatus,
    /// When the batch was registered
    pub registered_at: DateTime<Utc>,
    /// When the batch was last polled successfully
    pub last_polled_at: Option<DateTime<Utc>>,
}

impl TrackedBatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ProcessingStatus::Unknown,
            registered_at: Utc::now(),
            last_polled_at: None,
        }
    }

    /// Record a successful observation
    pub fn observe(&mut self, status: ProcessingStatus) {
        self.status = status;
        self.last_polled_at = Some(Utc::now());
    }
}

/// A status change of a tracked batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub batch_id: String,
    pub from: ProcessingStatus,
    pub to: ProcessingStatus,
    pub at: DateTime<Utc>,
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollSummary {
    /// Batches polled this cycle
    pub polled: usize,
    /// Batches whose status could not be fetched
    pub failed: usize,
    /// Status changes observed this cycle
    pub transitions: Vec<Transition>,
    /// Batches that reached a terminal status and were handed to the completion handler
    pub completed: Vec<String>,
}

impl PollSummary {
    /// Number of batches whose status changed
    pub fn changed(&self) -> usize {
        self.transitions.len()
    }
}

/// Number of results per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub succeeded: usize,
    pub errored: usize,
    pub canceled: usize,
    pub expired: usize,
    pub other: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.succeeded + self.errored + self.canceled + self.expired + self.other
    }
}

/// Rendered results of an ended batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub batch_id: String,
    /// HTML body, suitable as an email body
    pub html: String,
    pub counts: OutcomeCounts,
}
