//! Batch API response fixtures
//!
//! JSON bodies shaped like the Anthropic Message Batches API.

use serde_json::{Value, json};

/// A message batch object
pub fn batch_json(id: &str, status: &str, results_url: Option<&str>) -> Value {
    let ended = status == "ended";
    let (processing, finished) = if ended { (0, 1) } else { (2, 0) };
    let ended_at = if ended {
        json!("2024-09-24T18:39:24.100435Z")
    } else {
        Value::Null
    };

    json!({
        "id": id,
        "type": "message_batch",
        "processing_status": status,
        "request_counts": {
            "processing": processing,
            "succeeded": finished,
            "errored": finished,
            "canceled": 0,
            "expired": 0
        },
        "created_at": "2024-09-24T18:37:24.100435Z",
        "expires_at": "2024-09-25T18:37:24.100435Z",
        "ended_at": ended_at,
        "results_url": results_url
    })
}

/// Result line of a succeeded request with one text block
pub fn succeeded_line(custom_id: &str, text: &str) -> String {
    json!({
        "custom_id": custom_id,
        "result": {
            "type": "succeeded",
            "message": {
                "id": format!("msg_{}", custom_id),
                "type": "message",
                "role": "assistant",
                "model": "claude-3-5-sonnet-20241022",
                "content": [{"type": "text", "text": text}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 3}
            }
        }
    })
    .to_string()
}

/// Result line of an errored request
pub fn errored_line(custom_id: &str, message: &str) -> String {
    json!({
        "custom_id": custom_id,
        "result": {
            "type": "errored",
            "error": {
                "type": "error",
                "error": {"type": "rate_limit_error", "message": message}
            }
        }
    })
    .to_string()
}

/// Join result lines into a JSONL body
pub fn jsonl(lines: &[String]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}
