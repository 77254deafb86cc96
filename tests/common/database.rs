//! Test database utilities
//!
//! Provides in-memory SQLite databases for testing without external dependencies.
//! Each test gets an isolated, migrated database instance.

use batchwatch::config::DatabaseConfig;
use batchwatch::storage::Database;
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    /// Create a new migrated in-memory database
    pub async fn new() -> Self {
        let db = Database::open(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory test database");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Get reference to the underlying database
    pub fn db(&self) -> &Database {
        &self.inner
    }

    /// Get Arc to the underlying database
    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }
}
