//! LoanApplication domain entity
//!
//! This module defines the loan application record, its decision status
//! and the two pure business rules that operate on it: the automatic
//! decision rule and the flat-interest monthly payment.
//!
//! ## Status Machine
//!
//! ```text
//!                  approve / auto-decide
//!     ┌─────────┐ ─────────────────────► ┌──────────┐
//!     │ Pending │                        │ Approved │
//!     └─────────┘ ─────────────────────► └──────────┘
//!                  reject / auto-decide   ┌──────────┐
//!                                         │ Rejected │
//!                                         └──────────┘
//! ```
//!
//! Approved and Rejected are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audit::LoanSnapshot;
use super::errors::DomainError;
use super::newtypes::LoanId;

/// Largest amount the automatic rule will approve (inclusive)
pub const AUTO_APPROVE_MAX_AMOUNT: f64 = 100_000.0;

/// Longest term in months the automatic rule will approve (inclusive)
pub const AUTO_APPROVE_MAX_TERM_MONTHS: u32 = 60;

// ============================================================================
// LoanStatus
// ============================================================================

/// Decision status of a loan application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Awaiting a decision
    #[default]
    Pending,
    /// Approved manually or by the automatic rule
    Approved,
    /// Rejected manually or by the automatic rule
    Rejected,
}

impl LoanStatus {
    /// All statuses, in display order
    pub const ALL: [LoanStatus; 3] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Rejected,
    ];

    /// Returns the lowercase name used in storage and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        }
    }

    /// Returns true if no decision has been made yet
    pub fn is_pending(&self) -> bool {
        matches!(self, LoanStatus::Pending)
    }

    /// Returns true if the status can no longer change
    pub fn is_decided(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Business rules
// ============================================================================

/// Applies the automatic decision rule
///
/// Approves when `amount <= 100000` and `term_months <= 60`, rejects otherwise.
pub fn auto_decision(amount: f64, term_months: u32) -> LoanStatus {
    if amount <= AUTO_APPROVE_MAX_AMOUNT && term_months <= AUTO_APPROVE_MAX_TERM_MONTHS {
        LoanStatus::Approved
    } else {
        LoanStatus::Rejected
    }
}

/// Flat-interest monthly payment: `amount * (1 + rate) / term_months`
///
/// Total interest over the whole term is spread evenly across the months;
/// this is not an amortization schedule.
pub fn calculate_monthly_payment(loan: &LoanApplication) -> f64 {
    (loan.amount * (1.0 + loan.interest_rate)) / f64::from(loan.term_months)
}

// ============================================================================
// LoanApplication
// ============================================================================

/// A single loan request with its decision status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    id: LoanId,
    applicant_name: String,
    amount: f64,
    term_months: u32,
    interest_rate: f64,
    status: LoanStatus,
    created_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Creates a new pending application with a fresh id and timestamp
    ///
    /// The applicant name is trimmed. Checks run in the order name, amount,
    /// term, interest rate and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` with the user-facing message of the
    /// first rule that fails.
    pub fn new(
        applicant_name: &str,
        amount: f64,
        term_months: u32,
        interest_rate: f64,
    ) -> Result<Self, DomainError> {
        let applicant_name = applicant_name.trim();
        if applicant_name.is_empty() {
            return Err(DomainError::Validation("name required".to_string()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::Validation("amount required".to_string()));
        }
        if term_months == 0 {
            return Err(DomainError::Validation("term required".to_string()));
        }
        if !interest_rate.is_finite() || interest_rate < 0.0 {
            return Err(DomainError::Validation(
                "interest rate required".to_string(),
            ));
        }

        Ok(Self {
            id: LoanId::generate(),
            applicant_name: applicant_name.to_string(),
            amount,
            term_months,
            interest_rate,
            status: LoanStatus::Pending,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &LoanId {
        &self.id
    }

    pub fn applicant_name(&self) -> &str {
        &self.applicant_name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Monthly payment under the flat-interest model
    pub fn monthly_payment(&self) -> f64 {
        calculate_monthly_payment(self)
    }

    /// Status the automatic rule would assign to this application
    pub fn auto_decision(&self) -> LoanStatus {
        auto_decision(self.amount, self.term_months)
    }

    /// Value copy of the fields audit entries keep after deletion
    pub fn snapshot(&self) -> LoanSnapshot {
        LoanSnapshot::new(self.id.clone(), self.applicant_name.clone(), self.amount)
    }

    /// Checks if a transition to the target status is valid
    pub fn can_transition_to(&self, target: LoanStatus) -> bool {
        self.status.is_pending() && target.is_decided()
    }

    /// Moves the application to a decided status
    ///
    /// Returns the previous status on success.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the application is already
    /// decided or the target is `Pending`.
    pub fn transition_to(&mut self, target: LoanStatus) -> Result<LoanStatus, DomainError> {
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        let previous = self.status;
        self.status = target;
        Ok(previous)
    }
}
