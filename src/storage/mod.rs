//! Storage layer for batch records
//!
//! The monitor and the submission flow only see the `BatchStore` trait; the SeaORM
//! database is the production implementation.

/// Database storage module
pub mod database;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::core::batch::ProcessingStatus;
use crate::utils::error::Result;

pub use database::{Database, DatabaseBackendType};

/// A persisted batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    /// Batch ID
    pub id: String,
    /// Last recorded processing status
    pub status: ProcessingStatus,
    /// Serialized request payload, if the batch was submitted from here
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BatchRecord {
    /// Parsed request payload
    pub fn messages(&self) -> Option<Value> {
        self.payload
            .as_deref()
            .and_then(|payload| serde_json::from_str(payload).ok())
    }
}

/// Persistent batch metadata
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Record a newly submitted batch. Returns `false` if the id was already stored.
    async fn persist(&self, batch_id: &str, payload: &str) -> Result<bool>;

    /// Record the latest status, inserting the batch if it is not stored yet
    async fn update_status(&self, batch_id: &str, status: &ProcessingStatus) -> Result<()>;

    /// All stored batches, newest first
    async fn history(&self) -> Result<Vec<BatchRecord>>;

    /// Request payload of a stored batch
    async fn messages_for(&self, batch_id: &str) -> Result<Option<Value>>;

    /// Stored batches whose last recorded status is not terminal
    async fn unfinished(&self) -> Result<Vec<BatchRecord>> {
        Ok(self
            .history()
            .await?
            .into_iter()
            .filter(|record| !record.status.is_terminal())
            .collect())
    }
}
