//! Anthropic batch client tests against a mock HTTP server

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{batch_json, errored_line, jsonl, succeeded_line};
    use batchwatch::config::AnthropicConfig;
    use batchwatch::core::batch::{
        AnthropicBatchClient, BatchApi, BatchOutcome, BatchRequestItem, ChatMessage,
        MessageParams,
    };
    use batchwatch::{MonitorError, ProcessingStatus};
    use futures::StreamExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnthropicBatchClient {
        let config = AnthropicConfig::new("test-key").with_base_url(server.uri());
        AnthropicBatchClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_batch_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/messages/batches/msgbatch_1"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(batch_json("msgbatch_1", "in_progress", None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let batch = client_for(&server)
            .retrieve_batch("msgbatch_1")
            .await
            .unwrap();

        assert_eq!(batch.id, "msgbatch_1");
        assert_eq!(batch.processing_status, ProcessingStatus::InProgress);
        assert_eq!(batch.request_counts.processing, 2);
    }

    #[tokio::test]
    async fn test_submit_batch_posts_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages/batches"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(batch_json("msgbatch_new", "in_progress", None)),
            )
            .mount(&server)
            .await;

        let requests = vec![BatchRequestItem {
            custom_id: "message-0".to_string(),
            params: MessageParams {
                model: "claude-3-5-sonnet-20241022".to_string(),
                max_tokens: 1024,
                messages: vec![ChatMessage::user("Hello")],
            },
        }];

        let batch = client_for(&server).submit_batch(&requests).await.unwrap();
        assert_eq!(batch.id, "msgbatch_new");

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["requests"][0]["custom_id"], "message-0");
        assert_eq!(body["requests"][0]["params"]["messages"][0]["content"], "Hello");
    }

    #[tokio::test]
    async fn test_not_found_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "not_found_error", "message": "Batch msgbatch_x not found"}
            })))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .retrieve_batch("msgbatch_x")
            .await
            .unwrap_err();

        assert!(matches!(&error, MonitorError::Remote(msg) if msg.contains("not found")));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_list_results_streams_jsonl() {
        let server = MockServer::start().await;
        let results_url = format!("{}/v1/messages/batches/msgbatch_1/results", server.uri());

        Mock::given(method("GET"))
            .and(path("/v1/messages/batches/msgbatch_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch_json("msgbatch_1", "ended", Some(&results_url))),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/messages/batches/msgbatch_1/results"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(jsonl(&[
                succeeded_line("message-0", "hi"),
                errored_line("message-1", "rate limited"),
            ])))
            .mount(&server)
            .await;

        let stream = client_for(&server).list_results("msgbatch_1").await.unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        let first = items[0].as_ref().unwrap();
        assert_eq!(first.custom_id, "message-0");
        assert!(matches!(first.result, BatchOutcome::Succeeded(_)));
        let second = items[1].as_ref().unwrap();
        assert_eq!(second.custom_id, "message-1");
        assert!(matches!(second.result, BatchOutcome::Errored(_)));
    }

    #[tokio::test]
    async fn test_malformed_result_line_is_an_error_item() {
        let server = MockServer::start().await;
        let results_url = format!("{}/results", server.uri());

        Mock::given(method("GET"))
            .and(path("/v1/messages/batches/msgbatch_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch_json("msgbatch_1", "ended", Some(&results_url))),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "{}\n{{\"custom_id\": \n",
                succeeded_line("message-0", "hi")
            )))
            .mount(&server)
            .await;

        let stream = client_for(&server).list_results("msgbatch_1").await.unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(&items[1], Err(MonitorError::Remote(_))));
    }

    #[tokio::test]
    async fn test_list_results_before_end_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/messages/batches/msgbatch_1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(batch_json("msgbatch_1", "in_progress", None)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).list_results("msgbatch_1").await;
        assert!(matches!(result, Err(MonitorError::Remote(_))));
    }
}
