//! Application state shared across Axum route handlers.

use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use services::LimitsIngestor;

/// Central application state.
///
/// Holds the database connection, the fetch-and-persist ingestor used by the
/// manual-trigger routes, and the zone exported timestamps are shown in.
/// Poller retry state is owned by the poller task, not by this struct.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ingestor: LimitsIngestor,
    display_tz: Tz,
}

impl AppState {
    pub fn new(ingestor: LimitsIngestor, display_tz: Tz) -> Self {
        Self {
            db: ingestor.db().clone(),
            ingestor,
            display_tz,
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ingestor(&self) -> &LimitsIngestor {
        &self.ingestor
    }

    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }
}
