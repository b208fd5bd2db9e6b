//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures, invalid status transitions and
//! unparseable identifiers.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A business rule rejected user input; the message is shown verbatim
    #[error("{0}")]
    Validation(String),

    /// Invalid status transition attempt
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status
        from: String,
        /// The attempted target status
        to: String,
    },

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Unknown loan status name
    #[error("Invalid loan status: {0}")]
    InvalidStatus(String),

    /// Unknown audit action name
    #[error("Invalid audit action: {0}")]
    InvalidAction(String),
}
