use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Submitted batch database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    /// Batch ID assigned by the provider
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Processing status (`submitted`, `in_progress`, `ended`, ...)
    pub status: String,

    /// Request payload as submitted (JSON)
    #[sea_orm(column_type = "Text", nullable)]
    pub messages: Option<String>,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last status change
    pub updated_at: DateTimeWithTimeZone,
}

/// Batch entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
