//! LoanStore - loan application lifecycle service
//!
//! Orchestrates the loan lifecycle over the key-value port:
//! 1. Reads the whole loan list from its storage key
//! 2. Applies one domain operation (create, decide, delete)
//! 3. Writes the whole list back
//! 4. Records the mutation in the audit log
//!
//! Writes are single-shot and non-transactional. If the loan list is saved
//! but the audit append fails, the operation still succeeds and the audit
//! failure is only logged.

use std::sync::Arc;

use loandesk_audit::AuditLog;
use loandesk_core::{
    domain::{LoanApplication, LoanId, LoanStatus},
    ports::IKeyValueStore,
};

use crate::error::LoanError;
use crate::input::LoanApplicationInput;
use crate::stats::LoanStats;

/// Service owning the persisted list of loan applications
pub struct LoanStore {
    store: Arc<dyn IKeyValueStore>,
    key: String,
    audit: AuditLog,
}

impl LoanStore {
    /// Creates a store for the loan list under `key`
    ///
    /// # Arguments
    ///
    /// * `store` - Key-value persistence holding the serialized list
    /// * `key` - Storage key of the loan list
    /// * `audit` - Audit log receiving one entry per successful mutation
    pub fn new(store: Arc<dyn IKeyValueStore>, key: impl Into<String>, audit: AuditLog) -> Self {
        Self {
            store,
            key: key.into(),
            audit,
        }
    }

    /// Creates a store and its audit log over the same key-value store
    pub fn with_keys(
        store: Arc<dyn IKeyValueStore>,
        loans_key: impl Into<String>,
        audit_key: impl Into<String>,
    ) -> Self {
        let audit = AuditLog::new(Arc::clone(&store), audit_key);
        Self::new(store, loans_key, audit)
    }

    /// The audit log this store records into
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Reads the stored list, surfacing read and parse failures
    ///
    /// A missing key is an empty list, not an error.
    pub async fn try_load(&self) -> Result<Vec<LoanApplication>, LoanError> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .map_err(|e| LoanError::Persistence(e.to_string()))?;

        match raw {
            None => Ok(Vec::new()),
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| LoanError::Persistence(e.to_string()))
            }
        }
    }

    /// Reads the stored list
    ///
    /// Unreadable or corrupt data yields an empty list so the application
    /// stays usable.
    pub async fn load(&self) -> Vec<LoanApplication> {
        match self.try_load().await {
            Ok(loans) => loans,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable loan list");
                Vec::new()
            }
        }
    }

    /// Reads the list as the base of a rewrite
    ///
    /// Corrupt content is discarded so the store can start over, but a
    /// failed read is returned: saving after it would erase every stored
    /// application.
    async fn load_for_write(&self) -> Result<Vec<LoanApplication>, LoanError> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .map_err(|e| LoanError::Persistence(e.to_string()))?;

        let Some(json) = raw else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&json) {
            Ok(loans) => Ok(loans),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Replacing corrupt loan list");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrites the stored list with `loans`
    pub async fn save(&self, loans: &[LoanApplication]) -> Result<(), LoanError> {
        let json =
            serde_json::to_string(loans).map_err(|e| LoanError::Persistence(e.to_string()))?;
        self.store
            .set(&self.key, &json)
            .await
            .map_err(|e| LoanError::Persistence(e.to_string()))?;

        tracing::debug!(key = %self.key, count = loans.len(), "Saved loan list");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All applications in creation order
    pub async fn list(&self) -> Vec<LoanApplication> {
        self.load().await
    }

    /// Applications with the given status, in creation order
    pub async fn list_by_status(&self, status: LoanStatus) -> Vec<LoanApplication> {
        self.load()
            .await
            .into_iter()
            .filter(|loan| loan.status() == status)
            .collect()
    }

    /// Looks up one application
    pub async fn get(&self, id: &LoanId) -> Result<LoanApplication, LoanError> {
        self.load()
            .await
            .into_iter()
            .find(|loan| loan.id() == id)
            .ok_or_else(|| LoanError::NotFound(id.clone()))
    }

    /// Summary statistics over the stored applications
    pub async fn stats(&self) -> LoanStats {
        LoanStats::from_loans(&self.load().await)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validates `input` and stores a new pending application
    ///
    /// # Errors
    ///
    /// Returns `LoanError::Validation` for the first failing field, or
    /// `LoanError::Persistence` if the list cannot be read or written.
    pub async fn create(&self, input: &LoanApplicationInput) -> Result<LoanApplication, LoanError> {
        let loan = input.validate()?;

        let mut loans = self.load_for_write().await?;
        loans.push(loan.clone());
        self.save(&loans).await?;

        tracing::info!(
            loan_id = %loan.id(),
            amount = loan.amount(),
            term_months = loan.term_months(),
            "Loan application created"
        );
        self.audit.log_loan_created(&loan).await;
        Ok(loan)
    }

    /// Approves or rejects a pending application by hand
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NotFound` for an unknown id and
    /// `LoanError::InvalidTransition` if the application is already decided
    /// or `new_status` is `Pending`.
    pub async fn update_status(&self, id: &LoanId, new_status: LoanStatus) -> Result<(), LoanError> {
        let (loan, previous) = self.transition(id, |_| new_status).await?;

        tracing::info!(loan_id = %id, from = %previous, to = %new_status, "Loan status changed manually");
        self.audit
            .log_manual_status_change(&loan, previous, new_status)
            .await;
        Ok(())
    }

    /// Decides a pending application with the automatic rule
    ///
    /// Approves when the amount is at most 100000 and the term at most 60
    /// months, rejects otherwise. Returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NotFound` for an unknown id and
    /// `LoanError::InvalidTransition` if the application is already decided.
    pub async fn auto_decide(&self, id: &LoanId) -> Result<LoanStatus, LoanError> {
        let (loan, previous) = self.transition(id, LoanApplication::auto_decision).await?;
        let decided = loan.status();

        tracing::info!(loan_id = %id, status = %decided, "Loan auto-decided");
        self.audit.log_auto_decision(&loan, previous, decided).await;
        Ok(decided)
    }

    /// Removes an application for good
    ///
    /// The audit entry keeps the applicant, amount and last status.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NotFound` for an unknown id.
    pub async fn delete(&self, id: &LoanId) -> Result<(), LoanError> {
        let mut loans = self.load_for_write().await?;
        let index = position(&loans, id)?;
        let removed = loans.remove(index);
        self.save(&loans).await?;

        tracing::info!(loan_id = %id, status = %removed.status(), "Loan application deleted");
        self.audit.log_loan_deleted(&removed).await;
        Ok(())
    }

    /// Loads, applies one status transition, saves.
    ///
    /// Returns the updated application and its previous status.
    async fn transition(
        &self,
        id: &LoanId,
        target: impl FnOnce(&LoanApplication) -> LoanStatus,
    ) -> Result<(LoanApplication, LoanStatus), LoanError> {
        let mut loans = self.load_for_write().await?;
        let index = position(&loans, id)?;

        let loan = &mut loans[index];
        let new_status = target(&*loan);
        let previous = loan.transition_to(new_status)?;
        let updated = loan.clone();

        self.save(&loans).await?;
        Ok((updated, previous))
    }
}

fn position(loans: &[LoanApplication], id: &LoanId) -> Result<usize, LoanError> {
    loans
        .iter()
        .position(|loan| loan.id() == id)
        .ok_or_else(|| LoanError::NotFound(id.clone()))
}
