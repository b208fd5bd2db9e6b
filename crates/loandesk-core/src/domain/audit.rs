//! Audit entry domain entities
//!
//! This module defines the audit types recording every mutation the loan
//! store performs. Entries carry a value snapshot of the loan they concern
//! so history stays readable after the loan itself is deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::loan::LoanStatus;
use super::newtypes::{AuditEntryId, LoanId};

/// Actions that can be recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A loan application was created
    LoanCreated,
    /// A reviewer approved or rejected an application
    StatusChangedManual,
    /// The automatic rule approved or rejected an application
    StatusChangedAuto,
    /// An application was deleted
    LoanDeleted,
}

impl AuditAction {
    /// All actions, in lifecycle order
    pub const ALL: [AuditAction; 4] = [
        AuditAction::LoanCreated,
        AuditAction::StatusChangedManual,
        AuditAction::StatusChangedAuto,
        AuditAction::LoanDeleted,
    ];

    /// Returns the stored action type name
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::LoanCreated => "LOAN_CREATED",
            AuditAction::StatusChangedManual => "STATUS_CHANGED_MANUAL",
            AuditAction::StatusChangedAuto => "STATUS_CHANGED_AUTO",
            AuditAction::LoanDeleted => "LOAN_DELETED",
        }
    }

    /// Returns true for the two status-change actions
    pub fn is_status_change(&self) -> bool {
        matches!(
            self,
            AuditAction::StatusChangedManual | AuditAction::StatusChangedAuto
        )
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        AuditAction::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidAction(s.to_string()))
    }
}

/// Denormalized copy of the loan fields an audit entry keeps
///
/// This is a value, not a reference: it is never updated after the entry is
/// written and outlives the loan it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSnapshot {
    pub loan_id: LoanId,
    pub applicant_name: String,
    pub amount: f64,
}

impl LoanSnapshot {
    pub fn new(loan_id: LoanId, applicant_name: impl Into<String>, amount: f64) -> Self {
        Self {
            loan_id,
            applicant_name: applicant_name.into(),
            amount,
        }
    }
}

/// An audit log entry recording one loan mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique identifier for this audit entry
    id: AuditEntryId,
    /// When the action occurred
    timestamp: DateTime<Utc>,
    /// The type of action that was performed
    action_type: AuditAction,
    /// Loan fields captured at event time
    #[serde(flatten)]
    snapshot: LoanSnapshot,
    /// Status before a status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_status: Option<LoanStatus>,
    /// Status after a status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_status: Option<LoanStatus>,
    /// Human-readable summary
    description: String,
}

impl AuditEntry {
    /// Builds a new entry with a fresh id and the current time
    ///
    /// Building an entry does not persist it; hand it to the audit log for that.
    ///
    /// # Example
    ///
    /// ```
    /// use loandesk_core::domain::{AuditAction, AuditEntry, LoanId, LoanSnapshot, LoanStatus};
    ///
    /// let snapshot = LoanSnapshot::new(LoanId::generate(), "Jane Doe", 12_000.0);
    /// let entry = AuditEntry::new(AuditAction::StatusChangedManual, snapshot, "Status changed")
    ///     .with_status_change(LoanStatus::Pending, LoanStatus::Approved);
    /// assert_eq!(entry.new_status(), Some(LoanStatus::Approved));
    /// ```
    pub fn new(action_type: AuditAction, snapshot: LoanSnapshot, description: impl Into<String>) -> Self {
        Self {
            id: AuditEntryId::generate(),
            timestamp: Utc::now(),
            action_type,
            snapshot,
            previous_status: None,
            new_status: None,
            description: description.into(),
        }
    }

    /// Records the status before and after a status change
    pub fn with_status_change(mut self, previous: LoanStatus, new: LoanStatus) -> Self {
        self.previous_status = Some(previous);
        self.new_status = Some(new);
        self
    }

    pub fn id(&self) -> &AuditEntryId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn action_type(&self) -> AuditAction {
        self.action_type
    }

    pub fn snapshot(&self) -> &LoanSnapshot {
        &self.snapshot
    }

    pub fn loan_id(&self) -> &LoanId {
        &self.snapshot.loan_id
    }

    pub fn applicant_name(&self) -> &str {
        &self.snapshot.applicant_name
    }

    pub fn amount(&self) -> f64 {
        self.snapshot.amount
    }

    pub fn previous_status(&self) -> Option<LoanStatus> {
        self.previous_status
    }

    pub fn new_status(&self) -> Option<LoanStatus> {
        self.new_status
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
