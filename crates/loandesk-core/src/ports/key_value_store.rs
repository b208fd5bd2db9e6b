//! Key-value store port (driven/secondary port)
//!
//! This module defines the persistence capability the loan store and the
//! audit log are written against. Each collection lives under its own key
//! as one serialized JSON array and is rewritten in full on every mutation.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, in-memory, etc.) and don't need domain-level classification.
//! - Values are opaque strings; serialization is the caller's concern.
//! - There is no compare-and-swap: the last `set` for a key wins.

/// Port trait for key-value persistence
///
/// ## Implementation Notes
///
/// - `get` returns `Ok(None)` for a missing key, never an error.
/// - `set` replaces any previous value for the key.
/// - `remove` on a missing key is a no-op.
#[async_trait::async_trait]
pub trait IKeyValueStore: Send + Sync {
    /// Reads the value stored under `key`
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Deletes the value stored under `key`
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
