use crate::core::batch::ProcessingStatus;
use crate::storage::{BatchRecord, BatchStore};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use serde_json::Value;
use tracing::debug;

use super::super::entities;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Create a batch record unless one already exists.
    ///
    /// A record created earlier by a status update has no payload yet; that payload is
    /// filled in. Returns whether the payload was stored.
    pub async fn create_batch(&self, batch_id: &str, payload: &str) -> Result<bool> {
        debug!("Creating batch: {}", batch_id);

        let now = Utc::now();
        let active_model = entities::batch::ActiveModel {
            id: Set(batch_id.to_string()),
            status: Set(ProcessingStatus::Submitted.to_string()),
            messages: Set(Some(payload.to_string())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let inserted = entities::Batch::insert(active_model)
            .on_conflict(
                sea_query::OnConflict::column(entities::batch::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(MonitorError::Database)?;
        if inserted > 0 {
            return Ok(true);
        }

        let filled = entities::Batch::update_many()
            .col_expr(
                entities::batch::Column::Messages,
                sea_query::Expr::value(payload.to_string()),
            )
            .filter(entities::batch::Column::Id.eq(batch_id))
            .filter(entities::batch::Column::Messages.is_null())
            .exec(&self.db)
            .await
            .map_err(MonitorError::Database)?;

        if filled.rows_affected == 0 {
            debug!("Batch {} already stored", batch_id);
        }
        Ok(filled.rows_affected > 0)
    }

    /// Update batch status, creating a payload-less record for unknown batches
    pub async fn update_batch_status(&self, batch_id: &str, status: &ProcessingStatus) -> Result<()> {
        debug!("Updating batch status: {} -> {}", batch_id, status);

        let now = Utc::now();
        match self.find_model(batch_id).await? {
            Some(model) => {
                let mut active_model: entities::batch::ActiveModel = model.into();
                active_model.status = Set(status.to_string());
                active_model.updated_at = Set(now.into());

                active_model
                    .update(&self.db)
                    .await
                    .map_err(MonitorError::Database)?;
            }
            None => {
                let active_model = entities::batch::ActiveModel {
                    id: Set(batch_id.to_string()),
                    status: Set(status.to_string()),
                    messages: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };

                entities::Batch::insert(active_model)
                    .exec(&self.db)
                    .await
                    .map_err(MonitorError::Database)?;
            }
        }

        Ok(())
    }

    /// Get a batch by ID
    pub async fn find_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>> {
        Ok(self.find_model(batch_id).await?.map(to_record))
    }

    /// List batches, newest first
    pub async fn list_batches(&self, limit: Option<u64>) -> Result<Vec<BatchRecord>> {
        debug!("Listing batches with limit: {:?}", limit);

        let mut query = entities::Batch::find().order_by_desc(entities::batch::Column::CreatedAt);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await.map_err(MonitorError::Database)?;

        Ok(models.into_iter().map(to_record).collect())
    }

    async fn find_model(&self, batch_id: &str) -> Result<Option<entities::batch::Model>> {
        entities::Batch::find_by_id(batch_id)
            .one(&self.db)
            .await
            .map_err(MonitorError::Database)
    }
}

fn to_record(model: entities::batch::Model) -> BatchRecord {
    BatchRecord {
        id: model.id,
        status: ProcessingStatus::from(model.status),
        payload: model.messages,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl BatchStore for SeaOrmDatabase {
    async fn persist(&self, batch_id: &str, payload: &str) -> Result<bool> {
        self.create_batch(batch_id, payload).await
    }

    async fn update_status(&self, batch_id: &str, status: &ProcessingStatus) -> Result<()> {
        self.update_batch_status(batch_id, status).await
    }

    async fn history(&self) -> Result<Vec<BatchRecord>> {
        self.list_batches(None).await
    }

    async fn messages_for(&self, batch_id: &str) -> Result<Option<Value>> {
        let Some(record) = self.find_batch(batch_id).await? else {
            return Ok(None);
        };

        match record.payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}
