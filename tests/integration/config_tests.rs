//! Configuration loading tests

#[cfg(test)]
mod tests {
    use std::io::Write;

    use batchwatch::{Config, MonitorError};

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_full_yaml() {
        let file = write_config(
            r#"
anthropic:
  api_key: sk-ant-test
monitor:
  poll_interval: 120
  check_interval: 30
storage:
  database:
    url: "sqlite::memory:"
    max_connections: 1
notification:
  email:
    server: smtp.example.com
    port: 2525
    password: secret
    sender: monitor@example.com
    recipients: [ops@example.com]
  webhook:
    url: https://hooks.example.com/batches
submission:
  model: claude-3-5-haiku-20241022
  max_tokens: 256
logging:
  level: debug
  json: true
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.require_api_key().unwrap(), "sk-ant-test");
        assert_eq!(config.monitor.poll_interval().as_secs(), 120);
        assert_eq!(config.monitor.check_interval().as_secs(), 30);
        assert!(config.monitor.poll_on_start);
        assert_eq!(config.storage.database.url, "sqlite::memory:");

        let email = config.notification.email.as_ref().unwrap();
        assert_eq!(email.port, 2525);
        assert_eq!(email.login(), "monitor@example.com");
        assert!(config.notification.has_channels());

        assert_eq!(config.submission.max_tokens, 256);
        assert_eq!(config.submission.max_messages, 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn test_empty_yaml_uses_defaults() {
        let file = write_config("{}\n");
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.anthropic.base_url, "https://api.anthropic.com");
        assert_eq!(config.monitor.poll_interval, 300);
        assert_eq!(config.monitor.check_interval, 60);
        assert!(!config.notification.has_channels());
        assert!(config.require_api_key().is_err());
    }

    #[tokio::test]
    async fn test_check_interval_above_poll_interval_is_rejected() {
        let file = write_config("monitor:\n  poll_interval: 30\n  check_interval: 60\n");
        let error = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(error, MonitorError::Config(_)));
    }

    #[tokio::test]
    async fn test_incomplete_email_is_rejected() {
        let file = write_config(
            "notification:\n  email:\n    server: smtp.example.com\n    sender: monitor@example.com\n    recipients: []\n",
        );
        let error = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(error, MonitorError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let error = Config::from_file("/nonexistent/batchwatch.yaml")
            .await
            .unwrap_err();
        assert!(matches!(error, MonitorError::Config(_)));
    }

    #[tokio::test]
    async fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        let file = write_config(&yaml);

        let reloaded = Config::from_file(file.path()).await.unwrap();
        assert_eq!(reloaded.monitor.poll_interval, config.monitor.poll_interval);
        assert_eq!(reloaded.storage.database.url, config.storage.database.url);
    }
}
