//! Database integration tests
//!
//! Tests database operations using real SQLite databases.

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use batchwatch::config::DatabaseConfig;
    use batchwatch::storage::{BatchStore, Database, DatabaseBackendType};
    use batchwatch::ProcessingStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_database_migration_is_repeatable() {
        let db = Database::new(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create database");

        assert!(db.migrate().await.is_ok());
        assert!(db.migrate().await.is_ok());
        assert_eq!(db.backend_type(), DatabaseBackendType::SQLite);
    }

    #[tokio::test]
    async fn test_batch_lifecycle() {
        let test_db = TestDatabase::new().await;
        let db = test_db.db();
        let payload = json!([
            {"custom_id": "message-0", "params": {"model": "m", "max_tokens": 8, "messages": [{"role": "user", "content": "hi"}]}}
        ]);

        let inserted = crate::assert_ok!(db.persist("msgbatch_1", &payload.to_string()).await);
        assert!(inserted);

        db.update_status("msgbatch_1", &ProcessingStatus::InProgress)
            .await
            .unwrap();
        db.update_status("msgbatch_1", &ProcessingStatus::Ended)
            .await
            .unwrap();

        let history = db.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "msgbatch_1");
        assert_eq!(history[0].status, ProcessingStatus::Ended);
        assert_eq!(history[0].messages(), Some(payload.clone()));
        assert_eq!(db.messages_for("msgbatch_1").await.unwrap(), Some(payload));
    }

    #[tokio::test]
    async fn test_unrecognised_status_round_trips() {
        let test_db = TestDatabase::new().await;
        let store = test_db.db_arc();

        store
            .update_status("msgbatch_1", &ProcessingStatus::Other("paused".to_string()))
            .await
            .unwrap();

        let record = store.find_batch("msgbatch_1").await.unwrap().unwrap();
        assert_eq!(record.status, ProcessingStatus::Other("paused".to_string()));
        assert_eq!(store.unfinished().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!(
                "sqlite://{}?mode=rwc",
                dir.path().join("data").join("batches.db").display()
            ),
            max_connections: 1,
            connection_timeout: 5,
        };

        let db = Database::open(&config).await.unwrap();
        db.persist("msgbatch_1", "[]").await.unwrap();
        db.close().await.unwrap();

        let reopened = Database::open(&config).await.unwrap();
        let record = reopened.find_batch("msgbatch_1").await.unwrap();
        assert!(record.is_some());
        assert_eq!(record.unwrap().status, ProcessingStatus::Submitted);
    }
}
