//! Message batch types and data structures
//!
//! Wire shapes follow the Anthropic Message Batches API. Every tagged value coming
//! back from the provider has an explicit fallback variant, so an unrecognised status,
//! result kind or content block is carried through instead of failing the parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Processing status of a batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessingStatus {
    /// Registered locally, never observed remotely
    Unknown,
    /// Accepted by the provider, not yet picked up
    Submitted,
    /// Requests are being processed
    InProgress,
    /// Cancellation requested
    Canceling,
    /// Every request reached a final outcome
    Ended,
    /// Provider-defined status this client does not know
    Other(String),
}

impl ProcessingStatus {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "unknown",
            Self::Submitted => "submitted",
            Self::InProgress => "in_progress",
            Self::Canceling => "canceling",
            Self::Ended => "ended",
            Self::Other(s) => s,
        }
    }

    /// `Ended` is the only status after which nothing changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl From<&str> for ProcessingStatus {
    fn from(value: &str) -> Self {
        match value {
            "unknown" => Self::Unknown,
            "submitted" => Self::Submitted,
            "in_progress" => Self::InProgress,
            "canceling" => Self::Canceling,
            "ended" => Self::Ended,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ProcessingStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ProcessingStatus> for String {
    fn from(status: ProcessingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-outcome request counts reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestCounts {
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub succeeded: u32,
    #[serde(default)]
    pub errored: u32,
    #[serde(default)]
    pub canceled: u32,
    #[serde(default)]
    pub expired: u32,
}

impl RequestCounts {
    pub fn total(&self) -> u32 {
        self.processing + self.succeeded + self.errored + self.canceled + self.expired
    }
}

/// A message batch as returned by create/retrieve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBatch {
    /// Batch ID
    pub id: String,
    /// Object type (always "message_batch")
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Processing status
    pub processing_status: ProcessingStatus,
    /// Request counts
    #[serde(default)]
    pub request_counts: RequestCounts,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Expiration timestamp
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Time processing ended
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Where the JSONL results can be downloaded once the batch has ended
    #[serde(default)]
    pub results_url: Option<String>,
}

/// One chat message inside a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Model parameters of one request (non-streaming)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageParams {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// Individual request in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequestItem {
    /// Correlation id, echoed back on the matching result
    pub custom_id: String,
    /// Request parameters
    pub params: MessageParams,
}

/// A content block of a succeeded message
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text { text: String },
    /// Any non-text block (tool use, thinking, ...), kept verbatim
    Other { kind: String, raw: Value },
}

impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        if kind == "text" {
            if let Some(text) = value.get("text").and_then(Value::as_str) {
                return Self::Text {
                    text: text.to_string(),
                };
            }
        }

        Self::Other { kind, raw: value }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// The assistant message of a succeeded request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultMessage {
    pub id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawOutcome")]
pub enum BatchOutcome {
    Succeeded(ResultMessage),
    /// Error detail as sent by the provider
    Errored(Value),
    Canceled,
    Expired,
    /// Result kind this client does not know, carried by name
    Other(String),
}

#[derive(Deserialize)]
struct RawOutcome {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: Option<ResultMessage>,
    #[serde(default)]
    error: Option<Value>,
}

impl TryFrom<RawOutcome> for BatchOutcome {
    type Error = String;

    fn try_from(raw: RawOutcome) -> std::result::Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "succeeded" => raw
                .message
                .map(Self::Succeeded)
                .ok_or_else(|| "succeeded result without a message".to_string()),
            "errored" => Ok(Self::Errored(raw.error.unwrap_or(Value::Null))),
            "canceled" => Ok(Self::Canceled),
            "expired" => Ok(Self::Expired),
            _ => Ok(Self::Other(raw.kind)),
        }
    }
}

impl BatchOutcome {
    /// Result kind as named on the wire
    pub fn kind(&self) -> &str {
        match self {
            Self::Succeeded(_) => "succeeded",
            Self::Errored(_) => "errored",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Other(kind) => kind,
        }
    }
}

/// One line of a batch's results
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchResultItem {
    /// Correlation id of the originating request
    pub custom_id: String,
    /// Outcome
    pub result: BatchOutcome,
}

/// Human-readable text of a provider error detail.
///
/// Errored results nest the interesting part as `{"error": {"type", "message"}}`;
/// anything else falls back to the raw JSON.
pub fn error_message(detail: &Value) -> String {
    let nested = detail
        .pointer("/error/message")
        .or_else(|| detail.get("message"))
        .and_then(Value::as_str);

    match (nested, detail) {
        (Some(message), _) => {
            let kind = detail
                .pointer("/error/type")
                .or_else(|| detail.get("type"))
                .and_then(Value::as_str);
            match kind {
                Some(kind) if kind != "error" => format!("{}: {}", kind, message),
                _ => message.to_string(),
            }
        }
        (None, Value::String(s)) => s.clone(),
        (None, Value::Null) => "no error detail provided".to_string(),
        (None, other) => other.to_string(),
    }
}
