//! Message batches
//!
//! This module provides the batch data model, the remote batch API client and the
//! foreground submission flow.

mod client;
mod submission;
mod types;


// Re-export all public types
pub use client::{AnthropicBatchClient, BatchApi, ResultStream};
pub use submission::{SubmissionService, correlation_id};
pub use types::{
    BatchOutcome, BatchRequestItem, BatchResultItem, ChatMessage, ContentBlock, MessageBatch,
    MessageParams, ProcessingStatus, RequestCounts, ResultMessage, error_message,
};
