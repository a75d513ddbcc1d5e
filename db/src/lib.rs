pub mod models;
pub mod test_utils;

use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use util::config;

/// Turns `DATABASE_PATH` into a connection URL.
///
/// `sqlite:` DSNs are used as-is and other URL schemes are rejected, since only
/// the SQLite driver is compiled in. Anything else is treated as a SQLite file
/// path that is created on first open.
pub fn database_url(path_or_url: &str) -> Result<String, DbErr> {
    if path_or_url.starts_with("sqlite:") {
        return Ok(path_or_url.to_string());
    }
    if let Some((scheme, _)) = path_or_url.split_once("://") {
        return Err(DbErr::Custom(format!(
            "unsupported database scheme '{scheme}'; only sqlite is available"
        )));
    }

    // SQLite won't create intermediate dirs.
    if let Some(parent) = Path::new(path_or_url).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    Ok(format!("sqlite://{path_or_url}?mode=rwc"))
}

/// Opens the configured store and ensures the `rate_limits` table exists.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    connect_to(&config::database_path()).await
}

/// Same as [`connect`] for an explicit path or DSN.
pub async fn connect_to(path_or_url: &str) -> Result<DatabaseConnection, DbErr> {
    let url = database_url(path_or_url)?;

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    let db = Database::connect(opts).await?;
    Migrator::up(&db, None).await?;

    tracing::info!(path = path_or_url, "database ready, rate_limits schema ensured");
    Ok(db)
}

/// Releases the connection pool. Called once at shutdown.
pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    tracing::info!("database connection closed");
    Ok(())
}
