//! Integration test: AuditLog → SQLite key-value store → query back
//!
//! Uses a real in-memory SQLite database to verify the full flow:
//! AuditLog records entries → SqliteKeyValueStore persists the JSON array →
//! load and the query helpers return them.

use std::sync::Arc;

use loandesk_audit::{filter_and_search, AuditLog, AuditQuery};
use loandesk_cache::{DatabasePool, SqliteKeyValueStore};
use loandesk_core::{
    domain::{AuditAction, LoanApplication, LoanStatus},
    ports::IKeyValueStore,
};

const AUDIT_KEY: &str = "loan_audit_logs";

async fn make_store() -> Arc<SqliteKeyValueStore> {
    let pool = DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database");
    Arc::new(SqliteKeyValueStore::new(pool.pool().clone()))
}

#[tokio::test]
async fn test_audit_log_integration_with_sqlite() {
    let kv = make_store().await;
    let log = AuditLog::new(Arc::clone(&kv) as Arc<dyn IKeyValueStore>, AUDIT_KEY);

    let mut loan = LoanApplication::new("Jane Doe", 25_000.0, 36, 0.07).unwrap();
    log.log_loan_created(&loan).await;

    let previous = loan.transition_to(LoanStatus::Approved).unwrap();
    log.log_auto_decision(&loan, previous, LoanStatus::Approved)
        .await;
    log.log_loan_deleted(&loan).await;

    let entries = log.load().await;
    assert_eq!(
        entries.len(),
        3,
        "Expected 3 audit entries (created, auto decision, deleted), got {}",
        entries.len()
    );

    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action_type()).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::LoanCreated,
            AuditAction::StatusChangedAuto,
            AuditAction::LoanDeleted,
        ]
    );

    // Every entry carries the loan snapshot
    for entry in &entries {
        assert_eq!(entry.loan_id(), loan.id());
        assert_eq!(entry.applicant_name(), "Jane Doe");
        assert_eq!(entry.amount(), 25_000.0);
    }

    assert_eq!(entries[1].previous_status(), Some(LoanStatus::Pending));
    assert_eq!(entries[1].new_status(), Some(LoanStatus::Approved));
    assert!(entries[0].previous_status().is_none());
}

#[tokio::test]
async fn test_stored_json_uses_flat_camel_case_shape() {
    let kv = make_store().await;
    let log = AuditLog::new(Arc::clone(&kv) as Arc<dyn IKeyValueStore>, AUDIT_KEY);

    let mut loan = LoanApplication::new("John Smith", 1000.0, 12, 0.05).unwrap();
    let previous = loan.transition_to(LoanStatus::Rejected).unwrap();
    log.log_manual_status_change(&loan, previous, LoanStatus::Rejected)
        .await;

    let raw = kv.get(AUDIT_KEY).await.unwrap().expect("audit key written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];

    assert_eq!(entry["actionType"], "STATUS_CHANGED_MANUAL");
    assert_eq!(entry["loanId"], loan.id().as_str());
    assert_eq!(entry["applicantName"], "John Smith");
    assert_eq!(entry["previousStatus"], "pending");
    assert_eq!(entry["newStatus"], "rejected");
    assert!(entry["timestamp"].is_string());
    assert!(entry["description"]
        .as_str()
        .unwrap()
        .contains("from pending to rejected"));
}

#[tokio::test]
async fn test_query_over_persisted_log() {
    let kv = make_store().await;
    let log = AuditLog::new(Arc::clone(&kv) as Arc<dyn IKeyValueStore>, AUDIT_KEY);

    let jane = LoanApplication::new("Jane Doe", 1000.0, 12, 0.05).unwrap();
    let john = LoanApplication::new("John Smith", 2000.0, 24, 0.05).unwrap();
    log.log_loan_created(&jane).await;
    log.log_loan_created(&john).await;
    log.log_loan_deleted(&john).await;

    let entries = log.load().await;

    let created = filter_and_search(&entries, Some(AuditAction::LoanCreated), None);
    assert_eq!(created.len(), 2);

    let johns = filter_and_search(&entries, None, Some("SMITH"));
    assert_eq!(johns.len(), 2);

    let query = AuditQuery::new()
        .with_action(AuditAction::LoanDeleted)
        .with_text("john");
    let hits = query.apply(&entries);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].loan_id(), john.id());

    let trail = log.trail(jane.id()).await;
    assert_eq!(trail.len(), 1);
}

#[tokio::test]
async fn test_clear_removes_persisted_log() {
    let kv = make_store().await;
    let log = AuditLog::new(Arc::clone(&kv) as Arc<dyn IKeyValueStore>, AUDIT_KEY);

    let loan = LoanApplication::new("Jane Doe", 1000.0, 12, 0.05).unwrap();
    log.log_loan_created(&loan).await;
    assert_eq!(log.load().await.len(), 1);

    log.clear().await.unwrap();

    assert!(kv.get(AUDIT_KEY).await.unwrap().is_none());
    assert!(log.load().await.is_empty());
}
