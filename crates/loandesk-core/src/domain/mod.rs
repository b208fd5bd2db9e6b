//! Domain entities and business logic
//!
//! This module contains the core domain types for LoanDesk:
//! - Newtypes for type-safe identifiers
//! - Loan applications, their status machine and decision rule
//! - Audit entries and the loan snapshot they carry
//! - Domain-specific error types

pub mod audit;
pub mod errors;
pub mod loan;
pub mod newtypes;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry, LoanSnapshot};
pub use errors::DomainError;
pub use loan::{
    auto_decision, calculate_monthly_payment, LoanApplication, LoanStatus,
    AUTO_APPROVE_MAX_AMOUNT, AUTO_APPROVE_MAX_TERM_MONTHS,
};
pub use newtypes::*;
