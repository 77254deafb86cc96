//! Remote batch API
//!
//! `BatchApi` is the narrow contract the monitor needs from the provider;
//! `AnthropicBatchClient` implements it over HTTP with reqwest.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::types::{BatchRequestItem, BatchResultItem, MessageBatch, error_message};
use crate::config::AnthropicConfig;
use crate::utils::error::{MonitorError, Result};

/// Lazily parsed sequence of batch results, in provider order
pub type ResultStream = Pin<Box<dyn Stream<Item = Result<BatchResultItem>> + Send>>;

/// Remote batch API operations used by the monitor and the submission flow
#[async_trait]
pub trait BatchApi: Send + Sync {
    /// Create a batch from an ordered list of requests
    async fn submit_batch(&self, requests: &[BatchRequestItem]) -> Result<MessageBatch>;

    /// Fetch a batch's current state. Not-found and transport failures are `Remote` errors.
    async fn retrieve_batch(&self, batch_id: &str) -> Result<MessageBatch>;

    /// Open the result stream of an ended batch
    async fn list_results(&self, batch_id: &str) -> Result<ResultStream>;
}

/// Anthropic Message Batches client
#[derive(Debug, Clone)]
pub struct AnthropicBatchClient {
    config: AnthropicConfig,
    http_client: Client,
}

impl AnthropicBatchClient {
    /// Create
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| MonitorError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| MonitorError::config(format!("Invalid API key header: {}", e)))?;
        headers.insert("x-api-key", api_key);

        let version = HeaderValue::from_str(&self.config.api_version)
            .map_err(|e| MonitorError::config(format!("Invalid API version header: {}", e)))?;
        headers.insert("anthropic-version", version);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("batchwatch/", env!("CARGO_PKG_VERSION"))),
        );

        Ok(headers)
    }

    async fn send_get(&self, url: &str) -> Result<Response> {
        let response = self
            .http_client
            .get(url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| MonitorError::remote(format!("Network error: {}", e)))?;

        check_status(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| MonitorError::remote(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&text)
            .map_err(|e| MonitorError::remote(format!("Failed to parse response JSON: {}", e)))
    }
}

#[async_trait]
impl BatchApi for AnthropicBatchClient {
    async fn submit_batch(&self, requests: &[BatchRequestItem]) -> Result<MessageBatch> {
        debug!("Submitting batch with {} requests", requests.len());

        let response = self
            .http_client
            .post(self.endpoint("/v1/messages/batches"))
            .headers(self.build_headers()?)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| MonitorError::remote(format!("Network error: {}", e)))?;

        Self::parse_json(check_status(response).await?).await
    }

    async fn retrieve_batch(&self, batch_id: &str) -> Result<MessageBatch> {
        debug!("Retrieving batch {}", batch_id);

        let url = self.endpoint(&format!("/v1/messages/batches/{}", batch_id));
        Self::parse_json(self.send_get(&url).await?).await
    }

    async fn list_results(&self, batch_id: &str) -> Result<ResultStream> {
        let batch = self.retrieve_batch(batch_id).await?;

        let results_url = batch.results_url.ok_or_else(|| {
            MonitorError::remote(format!(
                "Results for batch {} are not available (status {})",
                batch_id, batch.processing_status
            ))
        })?;

        debug!("Streaming results for batch {} from {}", batch_id, results_url);
        let response = self.send_get(&results_url).await?;

        Ok(Box::pin(result_lines(response)))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());
    Err(map_http_error(status.as_u16(), &body))
}

fn map_http_error(status: u16, body: &str) -> MonitorError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .map(|value| error_message(&value))
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => MonitorError::remote(format!("Authentication failed ({}): {}", status, detail)),
        404 => MonitorError::remote(format!("Batch not found: {}", detail)),
        429 => MonitorError::remote(format!("Rate limited: {}", detail)),
        500..=599 => MonitorError::remote(format!("Server error ({}): {}", status, detail)),
        _ => MonitorError::remote(format!("API error ({}): {}", status, detail)),
    }
}

fn parse_result_line(line: &[u8], line_no: usize) -> Result<Option<BatchResultItem>> {
    let line = std::str::from_utf8(line)
        .map_err(|e| MonitorError::remote(format!("Result line {} is not UTF-8: {}", line_no, e)))?
        .trim();

    if line.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| MonitorError::remote(format!("Malformed result line {}: {}", line_no, e)))
}

/// Split a JSONL body into results as bytes arrive
fn result_lines(response: Response) -> impl Stream<Item = Result<BatchResultItem>> + Send {
    async_stream::stream! {
        let mut bytes = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut line_no = 0usize;
        let mut failed = false;

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    buffer.extend_from_slice(&chunk);
                    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buffer.drain(..=pos).collect();
                        line_no += 1;
                        if let Some(item) = parse_result_line(&line, line_no).transpose() {
                            yield item;
                        }
                    }
                }
                Err(e) => {
                    yield Err(MonitorError::remote(format!("Failed to read results: {}", e)));
                    failed = true;
                    break;
                }
            }
        }

        if !failed && !buffer.is_empty() {
            line_no += 1;
            if let Some(item) = parse_result_line(&buffer, line_no).transpose() {
                yield item;
            }
        }
    }
}
