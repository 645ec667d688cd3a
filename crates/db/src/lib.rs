//! SQLite persistence for render jobs.
//!
//! The store is a single file opened once at startup. The pool holds
//! exactly one connection, so every read and write is serialized through
//! the same handle and always observes the latest committed write.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// How long a statement waits for the connection or a file lock by default.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if missing) the SQLite database at `database_url`.
///
/// Accepts `sqlite://path/to/file.sqlite` or `sqlite::memory:`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    create_pool_with_timeout(database_url, DEFAULT_STORE_TIMEOUT).await
}

/// Like [`create_pool`], but bounds both connection acquisition and
/// SQLite's busy wait by `timeout`.
///
/// A statement that cannot get the connection or the write lock in time
/// fails with an error and changes nothing; one that got both runs to
/// completion.
pub async fn create_pool_with_timeout(
    database_url: &str,
    timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
///
/// Idempotent: already-applied migrations are skipped and the DDL itself
/// uses `IF NOT EXISTS`, so this runs on every startup.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
