use crate::config::DatabaseConfig;
use crate::utils::error::{MonitorError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Create a new database connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = DatabaseBackendType::from_url(&config.url);
        if backend_type == DatabaseBackendType::SQLite {
            ensure_sqlite_dir(&config.url)?;
        }

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        // In-memory SQLite lives exactly as long as its one connection
        if !is_sqlite_memory(&config.url) {
            opt.idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        let db = Database::connect(opt)
            .await
            .map_err(MonitorError::Database)?;

        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            MonitorError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Connect and migrate in one step
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let db = Self::new(config).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        debug!("Closing database connection");
        self.db.close().await.map_err(MonitorError::Database)
    }
}

fn is_sqlite_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Path of the database file named by a SQLite URL, if any
fn sqlite_file_path(url: &str) -> Option<&str> {
    if is_sqlite_memory(url) {
        return None;
    }

    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);

    (!path.is_empty()).then_some(path)
}

/// Create the directory holding the SQLite file so `mode=rwc` can create it
fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let Some(parent) = sqlite_file_path(url).and_then(|p| Path::new(p).parent()) else {
        return Ok(());
    };

    if !parent.as_os_str().is_empty() && !parent.exists() {
        debug!("Creating data directory {}", parent.display());
        std::fs::create_dir_all(parent).map_err(|e| {
            MonitorError::internal(format!("Failed to create data directory: {}", e))
        })?;
    }

    Ok(())
}
