//! Status polling

use std::sync::Arc;

use tracing::debug;

use crate::core::batch::{BatchApi, ProcessingStatus};
use crate::utils::error::{MonitorError, Result};

/// Fetches the processing status of tracked batches. No retries: a failed fetch is
/// simply tried again on the next cycle.
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn BatchApi>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn BatchApi>) -> Self {
        Self { api }
    }

    /// Current processing status of a batch
    pub async fn fetch_status(&self, batch_id: &str) -> Result<ProcessingStatus> {
        let batch = self.api.retrieve_batch(batch_id).await.map_err(|e| match e {
            MonitorError::Remote(_) => e,
            other => MonitorError::remote(other.to_string()),
        })?;

        debug!(
            "Batch {} is {} ({} of {} requests processing)",
            batch_id,
            batch.processing_status,
            batch.request_counts.processing,
            batch.request_counts.total()
        );

        Ok(batch.processing_status)
    }
}
