//! AuditLog - append-only audit trail service
//!
//! Keeps every audit entry in one JSON array under a single key of an
//! `IKeyValueStore`. Appending reads the whole array, pushes the new entry
//! and writes the whole array back.
//!
//! The `log_*` helpers build the entry for one kind of loan mutation and
//! record it non-fatally: persistence errors are logged via `tracing::warn!`
//! but never propagated, so an audit failure never undoes a loan change.

use std::sync::Arc;

use loandesk_core::{
    domain::{AuditAction, AuditEntry, LoanApplication, LoanId, LoanSnapshot, LoanStatus},
    ports::IKeyValueStore,
};
use thiserror::Error;

/// Errors that can occur while reading or writing the audit log
#[derive(Debug, Error)]
pub enum AuditError {
    /// The key-value store failed to read or write
    #[error("Audit persistence failed: {0}")]
    Persistence(String),

    /// The stored audit log could not be encoded or decoded
    #[error("Audit serialization failed: {0}")]
    Serialization(String),
}

/// Builds an audit entry without persisting it
///
/// `previous_status` and `new_status` are only recorded when both are given.
pub fn build_entry(
    action_type: AuditAction,
    snapshot: LoanSnapshot,
    description: impl Into<String>,
    previous_status: Option<LoanStatus>,
    new_status: Option<LoanStatus>,
) -> AuditEntry {
    let entry = AuditEntry::new(action_type, snapshot, description);
    match (previous_status, new_status) {
        (Some(previous), Some(new)) => entry.with_status_change(previous, new),
        _ => entry,
    }
}

/// Append-only audit log backed by a key-value store.
pub struct AuditLog {
    store: Arc<dyn IKeyValueStore>,
    key: String,
}

impl AuditLog {
    /// Creates an audit log stored under `key` in the given store.
    pub fn new(store: Arc<dyn IKeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key this log is written to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored entries, surfacing read and parse failures.
    ///
    /// A missing key is an empty log, not an error.
    pub async fn try_load(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .map_err(|e| AuditError::Persistence(e.to_string()))?;

        match raw {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| AuditError::Serialization(e.to_string())),
        }
    }

    /// Reads the stored entries in insertion order.
    ///
    /// Unreadable or corrupt data yields an empty log.
    pub async fn load(&self) -> Vec<AuditEntry> {
        match self.try_load().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable audit log");
                Vec::new()
            }
        }
    }

    /// Reads the log as the base of a rewrite.
    ///
    /// Corrupt content is discarded so the log can start over, but a failed
    /// read is returned: writing back an empty log would erase history.
    async fn load_for_write(&self) -> Result<Vec<AuditEntry>, AuditError> {
        match self.try_load().await {
            Err(AuditError::Serialization(e)) => {
                tracing::warn!(key = %self.key, error = %e, "Replacing corrupt audit log");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Appends one entry and rewrites the whole log.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Persistence` if the stored log cannot be read or
    /// written; nothing is written after a failed read.
    pub async fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut entries = self.load_for_write().await?;
        entries.push(entry.clone());

        let json = serde_json::to_string(&entries)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;
        self.store
            .set(&self.key, &json)
            .await
            .map_err(|e| AuditError::Persistence(e.to_string()))?;

        tracing::trace!(
            action = %entry.action_type(),
            loan_id = %entry.loan_id(),
            total = entries.len(),
            "Appended audit entry"
        );
        Ok(())
    }

    /// Entries concerning one loan, oldest first.
    pub async fn trail(&self, loan_id: &LoanId) -> Vec<AuditEntry> {
        self.load()
            .await
            .into_iter()
            .filter(|entry| entry.loan_id() == loan_id)
            .collect()
    }

    /// Erases the whole log. Administrative reset only.
    pub async fn clear(&self) -> Result<(), AuditError> {
        self.store
            .remove(&self.key)
            .await
            .map_err(|e| AuditError::Persistence(e.to_string()))?;
        tracing::info!(key = %self.key, "Audit log cleared");
        Ok(())
    }

    /// Persist an audit entry, swallowing errors with a tracing warning.
    pub async fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.append(entry).await {
            tracing::warn!(error = %e, action = %entry.action_type(), "Failed to save audit entry");
        }
    }

    // ========================================================================
    // Loan lifecycle
    // ========================================================================

    /// Log the creation of a loan application.
    pub async fn log_loan_created(&self, loan: &LoanApplication) {
        let description = format!(
            "Loan application created for {}: {:.2} over {} months at {:.2}% interest",
            loan.applicant_name(),
            loan.amount(),
            loan.term_months(),
            loan.interest_rate() * 100.0
        );
        let entry = build_entry(
            AuditAction::LoanCreated,
            loan.snapshot(),
            description,
            None,
            None,
        );
        self.record(&entry).await;
    }

    /// Log a manual approval or rejection.
    pub async fn log_manual_status_change(
        &self,
        loan: &LoanApplication,
        previous: LoanStatus,
        new: LoanStatus,
    ) {
        let description = format!(
            "Status manually changed from {} to {} for {}",
            previous,
            new,
            loan.applicant_name()
        );
        let entry = build_entry(
            AuditAction::StatusChangedManual,
            loan.snapshot(),
            description,
            Some(previous),
            Some(new),
        );
        self.record(&entry).await;
    }

    /// Log a decision made by the automatic rule.
    pub async fn log_auto_decision(
        &self,
        loan: &LoanApplication,
        previous: LoanStatus,
        new: LoanStatus,
    ) {
        let description = format!(
            "Auto-decision: {} for {} (amount {:.2}, term {} months)",
            new,
            loan.applicant_name(),
            loan.amount(),
            loan.term_months()
        );
        let entry = build_entry(
            AuditAction::StatusChangedAuto,
            loan.snapshot(),
            description,
            Some(previous),
            Some(new),
        );
        self.record(&entry).await;
    }

    /// Log the deletion of a loan application, keeping its last state.
    pub async fn log_loan_deleted(&self, loan: &LoanApplication) {
        let description = format!(
            "Loan application for {} deleted (amount {:.2}, status: {})",
            loan.applicant_name(),
            loan.amount(),
            loan.status()
        );
        let entry = build_entry(
            AuditAction::LoanDeleted,
            loan.snapshot(),
            description,
            None,
            None,
        );
        self.record(&entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use loandesk_cache::MemoryKeyValueStore;

    const KEY: &str = "audit";

    fn make_log() -> (Arc<MemoryKeyValueStore>, AuditLog) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let log = AuditLog::new(store.clone(), KEY);
        (store, log)
    }

    fn loan(name: &str, amount: f64) -> LoanApplication {
        LoanApplication::new(name, amount, 24, 0.08).unwrap()
    }

    #[test]
    fn test_build_entry_with_and_without_status() {
        let snapshot = loan("Jane", 100.0).snapshot();
        let plain = build_entry(AuditAction::LoanCreated, snapshot.clone(), "d", None, None);
        assert!(plain.previous_status().is_none());

        let changed = build_entry(
            AuditAction::StatusChangedAuto,
            snapshot,
            "d",
            Some(LoanStatus::Pending),
            Some(LoanStatus::Approved),
        );
        assert_eq!(changed.previous_status(), Some(LoanStatus::Pending));
        assert_eq!(changed.new_status(), Some(LoanStatus::Approved));
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_log() {
        let (_store, log) = make_log();
        assert!(log.load().await.is_empty());
        assert!(log.try_load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let (_store, log) = make_log();
        let first = build_entry(AuditAction::LoanCreated, loan("A", 1.0).snapshot(), "first", None, None);
        let second = build_entry(AuditAction::LoanDeleted, loan("B", 2.0).snapshot(), "second", None, None);

        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let entries = log.load().await;
        assert_eq!(entries, vec![first, second]);
    }

    #[tokio::test]
    async fn test_corrupt_log_loads_empty() {
        let (store, log) = make_log();
        store.set(KEY, "{not json").await.unwrap();

        assert!(log.load().await.is_empty());
        assert!(matches!(
            log.try_load().await,
            Err(AuditError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_log_helpers_record_action_types() {
        let (_store, log) = make_log();
        let mut application = loan("John Smith", 50_000.0);

        log.log_loan_created(&application).await;
        application.transition_to(LoanStatus::Approved).unwrap();
        log.log_manual_status_change(&application, LoanStatus::Pending, LoanStatus::Approved)
            .await;
        log.log_auto_decision(&application, LoanStatus::Pending, LoanStatus::Approved)
            .await;
        log.log_loan_deleted(&application).await;

        let actions: Vec<_> = log.load().await.iter().map(|e| e.action_type()).collect();
        assert_eq!(actions, AuditAction::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_deleted_entry_mentions_status() {
        let (_store, log) = make_log();
        let mut application = loan("Jane Roe", 9_000.0);
        application.transition_to(LoanStatus::Rejected).unwrap();

        log.log_loan_deleted(&application).await;

        let entries = log.load().await;
        assert!(entries[0].description().contains("status: rejected"));
        assert_eq!(entries[0].applicant_name(), "Jane Roe");
    }

    #[tokio::test]
    async fn test_trail_filters_by_loan() {
        let (_store, log) = make_log();
        let a = loan("A", 1.0);
        let b = loan("B", 2.0);

        log.log_loan_created(&a).await;
        log.log_loan_created(&b).await;
        log.log_loan_deleted(&a).await;

        let trail = log.trail(a.id()).await;
        assert_eq!(trail.len(), 2);
        assert!(trail.iter().all(|e| e.loan_id() == a.id()));
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (store, log) = make_log();
        log.log_loan_created(&loan("A", 1.0)).await;

        log.clear().await.unwrap();

        assert!(log.load().await.is_empty());
        assert!(store.get(KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_log_is_replaced_on_append() {
        let (store, log) = make_log();
        store.set(KEY, "{not json").await.unwrap();

        log.log_loan_created(&loan("A", 1.0)).await;

        assert_eq!(log.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_existing_entries() {
        // Reads fail while `fail_reads` is set; writes go through
        struct LockedReads {
            inner: MemoryKeyValueStore,
            fail_reads: AtomicBool,
        }

        #[async_trait]
        impl IKeyValueStore for LockedReads {
            async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
                if self.fail_reads.swap(false, Ordering::SeqCst) {
                    anyhow::bail!("database is locked");
                }
                self.inner.get(key).await
            }
            async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
                self.inner.set(key, value).await
            }
            async fn remove(&self, key: &str) -> anyhow::Result<()> {
                self.inner.remove(key).await
            }
        }

        let store = Arc::new(LockedReads {
            inner: MemoryKeyValueStore::new(),
            fail_reads: AtomicBool::new(false),
        });
        let log = AuditLog::new(store.clone(), KEY);
        log.log_loan_created(&loan("A", 1.0)).await;
        log.log_loan_created(&loan("B", 2.0)).await;

        store.fail_reads.store(true, Ordering::SeqCst);
        let entry = build_entry(AuditAction::LoanDeleted, loan("C", 3.0).snapshot(), "d", None, None);
        assert!(matches!(
            log.append(&entry).await,
            Err(AuditError::Persistence(_))
        ));

        store.fail_reads.store(true, Ordering::SeqCst);
        log.log_loan_created(&loan("D", 4.0)).await;

        let names: Vec<String> = log
            .load()
            .await
            .iter()
            .map(|e| e.applicant_name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_audit_failure_is_non_fatal() {
        // A store that always fails on write
        struct FailingStore;

        #[async_trait]
        impl IKeyValueStore for FailingStore {
            async fn get(&self, _: &str) -> anyhow::Result<Option<String>> {
                Ok(None)
            }
            async fn set(&self, _: &str, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("Storage quota exceeded")
            }
            async fn remove(&self, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("Storage unavailable")
            }
        }

        let log = AuditLog::new(Arc::new(FailingStore), KEY);
        let application = loan("A", 1.0);

        // This should NOT panic or return an error
        log.log_loan_created(&application).await;
        log.log_loan_deleted(&application).await;

        let entry = build_entry(AuditAction::LoanCreated, application.snapshot(), "d", None, None);
        assert!(matches!(
            log.append(&entry).await,
            Err(AuditError::Persistence(_))
        ));
        assert!(log.clear().await.is_err());
    }
}
