//! Loan store error types

use loandesk_core::domain::{DomainError, LoanId};
use thiserror::Error;

/// Message shown for create failures that are not validation errors
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create loan application";

/// Errors returned by `LoanStore` operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoanError {
    /// User input failed a business rule; the message is shown verbatim
    #[error("{0}")]
    Validation(String),

    /// No application with this id exists
    #[error("Loan application not found: {0}")]
    NotFound(LoanId),

    /// The application is already decided, or the target is not a decision
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status
        from: String,
        /// The attempted target status
        to: String,
    },

    /// The key-value store failed to read or write the loan list
    #[error("Loan persistence failed: {0}")]
    Persistence(String),

    /// Stored or internal data is malformed: a bad id, status or action
    #[error("Invalid loan data: {0}")]
    InvalidData(String),
}

impl LoanError {
    /// Returns true for user-input validation failures
    pub fn is_validation(&self) -> bool {
        matches!(self, LoanError::Validation(_))
    }
}

impl From<DomainError> for LoanError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => LoanError::Validation(message),
            DomainError::InvalidTransition { from, to } => {
                LoanError::InvalidTransition { from, to }
            }
            other @ (DomainError::InvalidId(_)
            | DomainError::InvalidStatus(_)
            | DomainError::InvalidAction(_)) => LoanError::InvalidData(other.to_string()),
        }
    }
}

/// Normalizes a failed create into a message fit for display
///
/// Validation messages pass through verbatim; anything else, including
/// errors that are not a `LoanError` at all, becomes
/// [`CREATE_FAILED_MESSAGE`].
pub fn create_error_message(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<LoanError>() {
        Some(LoanError::Validation(message)) => message.clone(),
        _ => CREATE_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_convert() {
        let err: LoanError = DomainError::Validation("term required".into()).into();
        assert_eq!(err, LoanError::Validation("term required".into()));

        let err: LoanError = DomainError::InvalidTransition {
            from: "approved".into(),
            to: "rejected".into(),
        }
        .into();
        assert!(matches!(err, LoanError::InvalidTransition { .. }));
    }

    #[test]
    fn test_malformed_data_is_not_a_validation_error() {
        let malformed = [
            DomainError::InvalidId("Loan ID cannot be empty".into()),
            DomainError::InvalidStatus("ARCHIVED".into()),
            DomainError::InvalidAction("LOAN_MOVED".into()),
        ];

        for domain in malformed {
            let err = LoanError::from(domain);
            assert!(matches!(err, LoanError::InvalidData(_)));
            assert!(!err.is_validation());
            assert_eq!(create_error_message(&err), CREATE_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_create_error_message_passes_validation_through() {
        let err = LoanError::Validation("name required".into());
        assert_eq!(create_error_message(&err), "name required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_error_message_normalizes_everything_else() {
        let err = LoanError::Persistence("disk full".into());
        assert_eq!(create_error_message(&err), CREATE_FAILED_MESSAGE);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(create_error_message(&io), CREATE_FAILED_MESSAGE);
    }

    #[test]
    fn test_not_found_display() {
        let err = LoanError::NotFound("loan-9".parse().unwrap());
        assert_eq!(err.to_string(), "Loan application not found: loan-9");
    }
}
