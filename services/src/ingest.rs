//! Fetch-and-persist: one upstream call followed by one insert.

use std::sync::Arc;

use db::models::rate_limit::Model as RateLimitModel;
use sea_orm::{DatabaseConnection, DbErr};

use crate::limits::{LimitsError, LimitsSource};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Upstream(#[from] LimitsError),

    #[error("failed to store observation: {0}")]
    Storage(#[from] DbErr),
}

/// Shared by the poller and the manual-trigger routes.
#[derive(Clone)]
pub struct LimitsIngestor {
    db: DatabaseConnection,
    source: Arc<dyn LimitsSource>,
}

impl LimitsIngestor {
    pub fn new(db: DatabaseConnection, source: Arc<dyn LimitsSource>) -> Self {
        Self { db, source }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Fetches one snapshot and appends it. Nothing is written on upstream failure.
    pub async fn fetch_and_store(&self) -> Result<RateLimitModel, IngestError> {
        let snapshot = self.source.fetch().await.inspect_err(|e| {
            if e.is_schema_error() {
                tracing::error!(error = %e, "limits response did not match the expected shape");
            } else {
                tracing::warn!(error = %e, "limits fetch failed");
            }
        })?;

        let row = RateLimitModel::create(&self.db, &snapshot.to_new_row())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to insert rate limit row"))?;

        tracing::info!(
            id = row.id,
            limit = %row.limit_name,
            maximum = row.maximum,
            remaining = row.remaining,
            in_use = row.in_use,
            in_use_percent = row.in_use_percent,
            "stored limits observation"
        );
        Ok(row)
    }
}
