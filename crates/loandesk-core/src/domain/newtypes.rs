//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers.
//! Identifiers are opaque strings: fresh ones are UUID v4 text, but any
//! non-empty value read back from storage is accepted so that lists written
//! by earlier versions stay loadable.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Loan identifiers
// ============================================================================

/// Identifier for LoanApplication entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoanId(String);

impl LoanId {
    /// Generate a new random LoanId
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a LoanId from an existing identifier
    ///
    /// # Errors
    /// Returns error if the identifier is empty or only whitespace
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId(
                "Loan ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LoanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LoanId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for LoanId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LoanId> for String {
    fn from(id: LoanId) -> Self {
        id.0
    }
}

// ============================================================================
// Audit identifiers
// ============================================================================

/// Identifier for audit log entries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuditEntryId(String);

impl AuditEntryId {
    /// Generate a new random AuditEntryId
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an AuditEntryId from an existing identifier
    ///
    /// # Errors
    /// Returns error if the identifier is empty or only whitespace
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId(
                "Audit entry ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AuditEntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AuditEntryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for AuditEntryId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AuditEntryId> for String {
    fn from(id: AuditEntryId) -> Self {
        id.0
    }
}
