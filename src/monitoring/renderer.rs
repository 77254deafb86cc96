//! HTML rendering of batch results

use std::fmt::Write as _;
use std::sync::Arc;

use futures::TryStreamExt;
use tracing::debug;

use super::types::{OutcomeCounts, Report};
use crate::core::batch::{BatchApi, BatchOutcome, BatchResultItem, ContentBlock, error_message};
use crate::utils::error::{MonitorError, Result};
use crate::utils::escape_html;

/// Fetches the results of an ended batch and renders them as one HTML report
#[derive(Clone)]
pub struct ResultRenderer {
    api: Arc<dyn BatchApi>,
}

impl ResultRenderer {
    pub fn new(api: Arc<dyn BatchApi>) -> Self {
        Self { api }
    }

    /// Fetch every result of `batch_id` and render the report
    pub async fn render(&self, batch_id: &str) -> Result<Report> {
        let stream = self.api.list_results(batch_id).await.map_err(|e| {
            MonitorError::render(format!("Failed to fetch results of {}: {}", batch_id, e))
        })?;

        let items: Vec<BatchResultItem> = stream.try_collect().await.map_err(|e| {
            MonitorError::render(format!("Failed to read results of {}: {}", batch_id, e))
        })?;

        debug!("Rendering {} results for batch {}", items.len(), batch_id);
        Ok(render_report(batch_id, &items))
    }
}

/// Render already fetched results
pub fn render_report(batch_id: &str, items: &[BatchResultItem]) -> Report {
    let mut counts = OutcomeCounts::default();
    let mut html = String::from(
        r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto;">
<h2 style="color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px;">Batch Processing Results</h2>
"#,
    );

    for (idx, item) in items.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div style="margin: 20px 0;">
<h3 style="color: #2c3e50; margin-bottom: 10px;">Message {} (ID: {})</h3>
"#,
            idx + 1,
            escape_html(&item.custom_id)
        );

        match &item.result {
            BatchOutcome::Succeeded(message) => {
                counts.succeeded += 1;
                let _ = write!(
                    html,
                    r#"<div style="background-color: #f8f9fa; border-left: 4px solid #2ecc71; padding: 15px; border-radius: 4px; margin: 10px 0;">
<div style="margin-bottom: 10px;"><strong style="color: #2c3e50;">Message ID:</strong> <span style="color: #7f8c8d;">{}</span></div>
<div style="background-color: white; padding: 15px; border-radius: 4px; margin-top: 10px; line-height: 1.6;">
<strong style="color: #2c3e50; display: block; margin-bottom: 10px;">Content:</strong>
<div style="color: #34495e;">{}</div>
</div>
</div>
"#,
                    escape_html(&message.id),
                    format_content(&message.content)
                );
            }
            BatchOutcome::Errored(detail) => {
                counts.errored += 1;
                let _ = write!(
                    html,
                    r#"<div style="background-color: #fff5f5; border-left: 4px solid #e74c3c; padding: 15px; border-radius: 4px; margin: 10px 0;">
<strong style="color: #c0392b;">Error:</strong> <span style="color: #7f8c8d;">{}</span>
</div>
"#,
                    escape_html(&error_message(detail))
                );
            }
            other => {
                match other {
                    BatchOutcome::Canceled => counts.canceled += 1,
                    BatchOutcome::Expired => counts.expired += 1,
                    _ => counts.other += 1,
                }
                let _ = write!(
                    html,
                    r#"<div style="background-color: #fff9e6; border-left: 4px solid #f1c40f; padding: 15px; border-radius: 4px; margin: 10px 0;">
<strong style="color: #f39c12;">Status:</strong> <span style="color: #7f8c8d;">{}</span>
</div>
"#,
                    escape_html(other.kind())
                );
            }
        }

        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");

    Report {
        batch_id: batch_id.to_string(),
        html,
        counts,
    }
}

/// Render content blocks, one paragraph each
pub fn format_content(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => format_text(text),
            ContentBlock::Other { raw, .. } => {
                format!("<p>{}</p>", escape_html(&raw.to_string()))
            }
        })
        .collect()
}

/// Escape text and keep its line breaks and indentation visible in HTML
pub fn format_text(text: &str) -> String {
    let text = escape_html(text)
        .replace('\n', "<br>")
        .replace("  ", "&nbsp;&nbsp;");
    format!(r#"<p style="margin: 8px 0;">{}</p>"#, text)
}
