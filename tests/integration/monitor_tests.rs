//! Monitor pipeline tests over HTTP
//!
//! The batch API and the webhook receiver are both served by `wiremock`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::common::TestDatabase;
    use crate::common::fixtures::{batch_json, errored_line, jsonl, succeeded_line};
    use batchwatch::config::{AnthropicConfig, MonitorConfig, WebhookConfig};
    use batchwatch::monitoring::notify::{NotificationChannel, Notifier, WebhookChannel};
    use batchwatch::{
        AnthropicBatchClient, BatchApi, BatchStore, MonitorRegistry, ProcessingStatus,
        RenderAndNotify, ResultRenderer,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_batch_sequence(server: &MockServer, batch_id: &str) {
        let batch_path = format!("/v1/messages/batches/{}", batch_id);
        let results_url = format!("{}{}/results", server.uri(), batch_path);

        // First retrieve sees the batch running, every later one sees it ended
        Mock::given(method("GET"))
            .and(path(batch_path.as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(batch_json(batch_id, "in_progress", None)),
            )
            .up_to_n_times(1)
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(batch_path.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch_json(batch_id, "ended", Some(&results_url))),
            )
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("{}/results", batch_path)))
            .respond_with(ResponseTemplate::new(200).set_body_string(jsonl(&[
                succeeded_line("message-0", "hi"),
                errored_line("message-1", "rate limited"),
            ])))
            .mount(server)
            .await;
    }

    fn registry_for(api_server: &MockServer, hook_server: &MockServer) -> MonitorRegistry {
        let api: Arc<dyn BatchApi> = Arc::new(
            AnthropicBatchClient::new(AnthropicConfig::new("test-key").with_base_url(api_server.uri()))
                .unwrap(),
        );
        let webhook = WebhookChannel::new(&WebhookConfig {
            url: format!("{}/hook", hook_server.uri()),
        })
        .unwrap();
        let notifier = Notifier::new(vec![Arc::new(webhook) as Arc<dyn NotificationChannel>]);
        let handler = RenderAndNotify::new(ResultRenderer::new(api.clone()), notifier);

        MonitorRegistry::new(api, Arc::new(handler), MonitorConfig::default())
    }

    #[tokio::test]
    async fn test_completed_batch_is_reported_once() {
        let api_server = MockServer::start().await;
        let hook_server = MockServer::start().await;
        mount_batch_sequence(&api_server, "msgbatch_1").await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&hook_server)
            .await;

        let test_db = TestDatabase::new().await;
        let registry = registry_for(&api_server, &hook_server).with_store(test_db.db_arc());
        registry.add("msgbatch_1");

        let first = registry.poll_once().await;
        assert!(first.completed.is_empty());
        assert_eq!(registry.status_of("msgbatch_1"), Some(ProcessingStatus::InProgress));

        let second = registry.poll_once().await;
        assert_eq!(second.completed, vec!["msgbatch_1".to_string()]);
        assert_eq!(second.changed(), 1);
        assert!(!registry.contains("msgbatch_1"));

        let third = registry.poll_once().await;
        assert_eq!(third.polled, 0);

        let hooks = hook_server.received_requests().await.unwrap();
        assert_eq!(hooks.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&hooks[0].body).unwrap();
        assert_eq!(body["subject"], "Batch Processing Complete - msgbatch_1");
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("message-0"));
        assert!(html.contains(">hi</p>"));
        assert!(html.contains("message-1"));
        assert!(html.contains("rate limited"));

        let record = test_db.db().find_batch("msgbatch_1").await.unwrap().unwrap();
        assert_eq!(record.status, ProcessingStatus::Ended);
        assert!(test_db.db().unfinished().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_webhook_still_removes_batch() {
        let api_server = MockServer::start().await;
        let hook_server = MockServer::start().await;
        mount_batch_sequence(&api_server, "msgbatch_2").await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&hook_server)
            .await;

        let registry = registry_for(&api_server, &hook_server);
        registry.add("msgbatch_2");

        registry.poll_once().await;
        let summary = registry.poll_once().await;

        assert_eq!(summary.completed, vec!["msgbatch_2".to_string()]);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_keeps_batch() {
        let api_server = MockServer::start().await;
        let hook_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&api_server)
            .await;

        let registry = registry_for(&api_server, &hook_server);
        registry.add("msgbatch_3");

        let summary = registry.poll_once().await;
        assert_eq!(summary.failed, 1);
        assert!(registry.contains("msgbatch_3"));
        assert!(hook_server.received_requests().await.unwrap().is_empty());
    }
}
