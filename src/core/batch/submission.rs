//! Foreground batch operations
//!
//! Submitting prompts, refreshing a batch's status on demand and fetching results for
//! display. Submission is the only path that registers new batches with the monitor.

use std::sync::Arc;

use futures::TryStreamExt;
use tracing::{info, warn};

use super::client::BatchApi;
use super::types::{
    BatchRequestItem, BatchResultItem, ChatMessage, MessageBatch, MessageParams, ProcessingStatus,
};
use crate::config::SubmissionConfig;
use crate::monitoring::MonitorRegistry;
use crate::storage::BatchStore;
use crate::utils::error::{MonitorError, Result};

/// Correlation id of the `index`-th prompt of a batch
pub fn correlation_id(index: usize) -> String {
    format!("message-{}", index)
}

/// Submission service shared by the CLI commands
pub struct SubmissionService {
    api: Arc<dyn BatchApi>,
    store: Arc<dyn BatchStore>,
    registry: Arc<MonitorRegistry>,
    config: SubmissionConfig,
}

impl SubmissionService {
    /// Create a new submission service
    pub fn new(
        api: Arc<dyn BatchApi>,
        store: Arc<dyn BatchStore>,
        registry: Arc<MonitorRegistry>,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            api,
            store,
            registry,
            config,
        }
    }

    /// Build one request per prompt, in order
    pub fn build_requests<S: AsRef<str>>(&self, prompts: &[S]) -> Result<Vec<BatchRequestItem>> {
        if prompts.is_empty() {
            return Err(MonitorError::validation(
                "A batch must contain at least one message",
            ));
        }

        if prompts.len() > self.config.max_messages {
            return Err(MonitorError::validation(format!(
                "A batch can contain at most {} messages, got {}",
                self.config.max_messages,
                prompts.len()
            )));
        }

        prompts
            .iter()
            .enumerate()
            .map(|(index, prompt)| {
                let prompt = prompt.as_ref();
                if prompt.trim().is_empty() {
                    return Err(MonitorError::validation(format!(
                        "Message {} is empty",
                        index + 1
                    )));
                }

                Ok(BatchRequestItem {
                    custom_id: correlation_id(index),
                    params: MessageParams {
                        model: self.config.model.clone(),
                        max_tokens: self.config.max_tokens,
                        messages: vec![ChatMessage::user(prompt)],
                    },
                })
            })
            .collect()
    }

    /// Submit prompts as one batch, persist it and register it for monitoring
    pub async fn submit_prompts<S: AsRef<str>>(&self, prompts: &[S]) -> Result<MessageBatch> {
        let requests = self.build_requests(prompts)?;
        let batch = self.api.submit_batch(&requests).await?;
        info!(
            "Batch {} created with {} requests ({})",
            batch.id,
            requests.len(),
            batch.processing_status
        );

        // The batch exists remotely at this point, so a storage failure must not hide its id
        let payload = serde_json::to_string(&requests)?;
        if let Err(e) = self.store.persist(&batch.id, &payload).await {
            warn!("Failed to persist batch {}: {}", batch.id, e);
        }

        // Stored before monitored: a poll cycle records status against the existing row
        self.registry.add(&batch.id);

        Ok(batch)
    }

    /// Fetch the current status and record it
    pub async fn refresh_status(&self, batch_id: &str) -> Result<ProcessingStatus> {
        let batch = self.api.retrieve_batch(batch_id).await?;
        self.store
            .update_status(batch_id, &batch.processing_status)
            .await?;
        Ok(batch.processing_status)
    }

    /// Request payload stored for a batch submitted from here
    pub async fn stored_messages(&self, batch_id: &str) -> Result<serde_json::Value> {
        self.store
            .messages_for(batch_id)
            .await?
            .ok_or_else(|| MonitorError::not_found(format!("No stored messages for batch {}", batch_id)))
    }

    /// Fetch every result of an ended batch
    pub async fn fetch_results(&self, batch_id: &str) -> Result<Vec<BatchResultItem>> {
        let stream = self.api.list_results(batch_id).await?;
        stream.try_collect().await
    }
}
