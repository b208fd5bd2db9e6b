//! LoanDesk Audit - Append-only audit trail
//!
//! Provides:
//! - `AuditLog`: Service that appends, lists and clears audit entries stored
//!   as one JSON array behind an `IKeyValueStore`
//! - `AuditQuery` and the free functions in [`query`]: action-type filtering
//!   and case-insensitive text search over loaded entries

pub mod logger;
pub mod query;

pub use logger::{build_entry, AuditError, AuditLog};
pub use query::{filter_and_search, filter_by_action_type, search_text, AuditQuery};
