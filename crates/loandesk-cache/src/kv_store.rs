//! SQLite implementation of IKeyValueStore
//!
//! Every key is one row of the `kv_store` table. `set` is an upsert, so a
//! collection rewritten in full replaces its previous row.
//!
//! | Column       | SQL Type | Content                        |
//! |--------------|----------|--------------------------------|
//! | `key`        | TEXT     | storage key (primary key)      |
//! | `value`      | TEXT     | opaque value, usually JSON     |
//! | `updated_at` | TEXT     | RFC 3339 time of the last `set` |

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use loandesk_core::ports::IKeyValueStore;

use crate::CacheError;

/// SQLite-based implementation of the key-value store port
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the stored keys in alphabetical order
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("key").map_err(CacheError::from))
            .collect()
    }
}

#[async_trait::async_trait]
impl IKeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(CacheError::from)?;

        match row {
            Some(row) => Ok(Some(row.try_get::<String, _>("value").map_err(CacheError::from)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(CacheError::from)?;

        tracing::trace!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(CacheError::from)?;

        tracing::trace!(key, "Removed value");
        Ok(())
    }
}
