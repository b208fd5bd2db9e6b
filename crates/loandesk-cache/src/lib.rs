//! LoanDesk Cache - Local key-value persistence
//!
//! Adapters for the `IKeyValueStore` port from `loandesk-core`:
//! - SQLite-backed storage for the loan list and audit log
//! - An in-memory map for tests and throwaway sessions
//!
//! ## Architecture
//!
//! This crate is a driven (secondary) adapter in the hexagonal architecture.
//! It stores opaque string values; serialization stays in the services.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteKeyValueStore`] - `IKeyValueStore` over a single SQLite table
//! - [`MemoryKeyValueStore`] - `IKeyValueStore` over a `HashMap`
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use loandesk_cache::{DatabasePool, SqliteKeyValueStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/loandesk/loandesk.db")).await?;
//! let store = SqliteKeyValueStore::new(pool.pool().clone());
//! // Use store as IKeyValueStore...
//! # Ok(())
//! # }
//! ```

pub mod kv_store;
pub mod memory;
pub mod pool;

pub use kv_store::SqliteKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use pool::DatabasePool;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::QueryFailed(e.to_string())
    }
}
