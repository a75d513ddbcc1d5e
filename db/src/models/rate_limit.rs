// db/models/rate_limit.rs
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

/// One persisted usage-limit observation.
///
/// Rows are append-only: nothing in the service updates or deletes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_limits")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub limit_name: String,
    pub maximum: i64,
    pub remaining: i64,
    pub in_use: i64,
    pub in_use_percent: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Values for a row that has not been stored yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRateLimit {
    pub timestamp: DateTime<Utc>,
    pub limit_name: String,
    pub maximum: i64,
    pub remaining: i64,
    pub in_use: i64,
    pub in_use_percent: f64,
}

impl Model {
    /// Appends one observation and returns the stored row with its assigned id.
    pub async fn create(db: &DatabaseConnection, row: &NewRateLimit) -> Result<Self, DbErr> {
        ActiveModel {
            id: NotSet,
            timestamp: Set(row.timestamp),
            limit_name: Set(row.limit_name.clone()),
            maximum: Set(row.maximum),
            remaining: Set(row.remaining),
            in_use: Set(row.in_use),
            in_use_percent: Set(row.in_use_percent),
        }
        .insert(db)
        .await
    }

    /// Most recent observation by timestamp, or `None` on an empty table.
    pub async fn latest(db: &DatabaseConnection) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .limit(1)
            .one(db)
            .await
    }

    /// All observations newest first, optionally only those at or after `since`.
    pub async fn newest_first(
        db: &DatabaseConnection,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Entity::find();
        if let Some(since) = since {
            query = query.filter(Column::Timestamp.gte(since));
        }
        query
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
