//! Database connection pool management
//!
//! Wraps SQLx's `SqlitePool` for the key-value table:
//! - Creates the parent directory of file-backed databases
//! - WAL journal mode and a busy timeout for file-backed databases
//! - Runs the schema migration on every open (idempotent)
//! - In-memory mode for tests

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::CacheError;

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool of SQLite connections holding the LoanDesk key-value table
///
/// A single connection is used throughout: every service operation is a
/// read-modify-write of one key, and in-memory databases only live as long
/// as their connection.
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if needed) the database file at `db_path`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the directory or connection
    /// cannot be created, or `CacheError::MigrationFailed` if the schema
    /// migration fails.
    pub async fn new(db_path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Failed to open database at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::info!(path = %db_path.display(), "Key-value database opened");

        Ok(Self { pool })
    }

    /// Creates a throwaway in-memory database
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be
    /// established, or `CacheError::MigrationFailed` if the migration fails.
    pub async fn in_memory() -> Result<Self, CacheError> {
        // Dropping the only connection would drop the database with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!("Failed to create in-memory database: {}", e))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::debug!("In-memory key-value database opened");

        Ok(Self { pool })
    }

    /// Returns a reference to the underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes all connections, flushing the WAL for file-backed databases
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), CacheError> {
        let migration_sql = include_str!("migrations/20260203_initial.sql");
        sqlx::raw_sql(migration_sql)
            .execute(pool)
            .await
            .map_err(|e| {
                CacheError::MigrationFailed(format!("Failed to create kv_store table: {}", e))
            })?;

        tracing::debug!("Database migrations completed");
        Ok(())
    }
}
