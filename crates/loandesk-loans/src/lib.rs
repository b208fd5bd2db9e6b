//! LoanDesk Loans - Loan application lifecycle
//!
//! Provides:
//! - `LoanStore`: create, list, approve/reject, auto-decide and delete loan
//!   applications stored as one JSON array behind an `IKeyValueStore`
//! - `LoanApplicationInput`: raw form input whose numeric fields may arrive
//!   as numbers or strings
//! - `LoanStats`: summary statistics over the stored applications
//!
//! Every successful mutation is recorded in the `AuditLog` from
//! `loandesk-audit`.

pub mod error;
pub mod input;
pub mod stats;
pub mod store;

pub use error::{create_error_message, LoanError, CREATE_FAILED_MESSAGE};
pub use input::{LoanApplicationInput, NumericInput};
pub use stats::LoanStats;
pub use store::LoanStore;
