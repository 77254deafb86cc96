//! Batch submission defaults

use super::*;
use serde::{Deserialize, Serialize};

/// Parameters applied to every request of a prompt batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum output tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum number of prompts in one batch
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_messages: default_max_messages(),
        }
    }
}
