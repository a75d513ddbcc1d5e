use std::env;
use tempfile::TempDir;

use crate::config::AppConfig;

/// Creates a unique temporary directory and points `DATABASE_PATH` at a SQLite
/// file inside it. The directory is removed when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the database.
pub fn setup_test_database_path() -> (TempDir, String) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let abs = tmp
        .path()
        .canonicalize()
        .unwrap_or_else(|_| tmp.path().to_path_buf());
    let db_path = abs.join("nested").join("limits.sqlite");
    let db_path = db_path.to_string_lossy().into_owned();
    unsafe {
        env::set_var("DATABASE_PATH", &db_path);
    }
    AppConfig::set_database_path(db_path.clone());
    (tmp, db_path)
}
