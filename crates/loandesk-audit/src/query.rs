//! Audit log queries
//!
//! Pure functions over already-loaded entries. All of them preserve the
//! relative order of the entries they keep.

use loandesk_core::domain::{AuditAction, AuditEntry};

/// Keeps the entries whose action type equals `action`.
pub fn filter_by_action_type(entries: &[AuditEntry], action: AuditAction) -> Vec<AuditEntry> {
    entries
        .iter()
        .filter(|entry| entry.action_type() == action)
        .cloned()
        .collect()
}

/// Case-insensitive substring search over description, applicant name and loan id.
///
/// A blank search text means "no filter" and returns every entry.
pub fn search_text(entries: &[AuditEntry], text: &str) -> Vec<AuditEntry> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|entry| matches_text(entry, &needle))
        .cloned()
        .collect()
}

/// Filters by action type first, then searches the remainder.
///
/// Either step is skipped when its argument is `None`.
pub fn filter_and_search(
    entries: &[AuditEntry],
    action: Option<AuditAction>,
    text: Option<&str>,
) -> Vec<AuditEntry> {
    let filtered = match action {
        Some(action) => filter_by_action_type(entries, action),
        None => entries.to_vec(),
    };
    match text {
        Some(text) => search_text(&filtered, text),
        None => filtered,
    }
}

/// `needle` must already be lowercased.
fn matches_text(entry: &AuditEntry, needle: &str) -> bool {
    entry.description().to_lowercase().contains(needle)
        || entry.applicant_name().to_lowercase().contains(needle)
        || entry.loan_id().as_str().to_lowercase().contains(needle)
}

/// Filter criteria for audit entries
///
/// Both fields are optional; when `None`, that step is skipped.
///
/// # Example
///
/// ```
/// use loandesk_audit::AuditQuery;
/// use loandesk_core::domain::AuditAction;
///
/// let query = AuditQuery::new()
///     .with_action(AuditAction::LoanCreated)
///     .with_text("jane");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    /// Keep only this action type
    pub action: Option<AuditAction>,
    /// Case-insensitive search text
    pub text: Option<String>,
}

impl AuditQuery {
    /// Creates an empty query (matches all entries)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns true if the query keeps every entry
    pub fn is_empty(&self) -> bool {
        self.action.is_none()
            && self
                .text
                .as_deref()
                .map_or(true, |text| text.trim().is_empty())
    }

    /// Runs the query over `entries`
    pub fn apply(&self, entries: &[AuditEntry]) -> Vec<AuditEntry> {
        filter_and_search(entries, self.action, self.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use loandesk_core::domain::{LoanSnapshot, LoanStatus};

    use super::*;

    fn entry(action: AuditAction, loan_id: &str, name: &str, description: &str) -> AuditEntry {
        let snapshot = LoanSnapshot::new(loan_id.parse().unwrap(), name, 1000.0);
        AuditEntry::new(action, snapshot, description)
    }

    fn sample_log() -> Vec<AuditEntry> {
        vec![
            entry(AuditAction::LoanCreated, "loan-1", "John Smith", "Loan application created"),
            entry(AuditAction::LoanCreated, "loan-2", "Jane Doe", "Loan application created"),
            entry(AuditAction::StatusChangedManual, "loan-2", "Jane Doe", "Status manually changed")
                .with_status_change(LoanStatus::Pending, LoanStatus::Approved),
            entry(AuditAction::StatusChangedAuto, "loan-1", "John Smith", "Auto-decision: rejected")
                .with_status_change(LoanStatus::Pending, LoanStatus::Rejected),
            entry(AuditAction::LoanDeleted, "abc-777", "Mary Major", "Loan deleted"),
        ]
    }

    #[test]
    fn test_filter_by_action_type_preserves_order() {
        let log = sample_log();
        let created = filter_by_action_type(&log, AuditAction::LoanCreated);

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].applicant_name(), "John Smith");
        assert_eq!(created[1].applicant_name(), "Jane Doe");
    }

    #[test]
    fn test_search_is_case_insensitive_on_applicant() {
        let log = sample_log();
        let hits = search_text(&log, "JOHN");

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|e| e.applicant_name() == "John Smith"));
    }

    #[test]
    fn test_search_matches_description_and_loan_id() {
        let log = sample_log();

        let by_description = search_text(&log, "auto-DECISION");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].action_type(), AuditAction::StatusChangedAuto);

        let by_id = search_text(&log, "ABC-7");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].loan_id().as_str(), "abc-777");
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let log = sample_log();
        assert_eq!(search_text(&log, "").len(), log.len());
        assert_eq!(search_text(&log, "   \t").len(), log.len());
    }

    #[test]
    fn test_search_without_match_is_empty() {
        assert!(search_text(&sample_log(), "nobody").is_empty());
    }

    #[test]
    fn test_filter_then_search() {
        let log = sample_log();
        let hits = filter_and_search(&log, Some(AuditAction::LoanCreated), Some("Jane"));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].action_type(), AuditAction::LoanCreated);
        assert_eq!(hits[0].applicant_name(), "Jane Doe");
    }

    #[test]
    fn test_filter_and_search_with_no_criteria() {
        let log = sample_log();
        assert_eq!(filter_and_search(&log, None, None), log);
        assert_eq!(filter_and_search(&log, None, Some(" ")), log);
    }

    #[test]
    fn test_query_builder() {
        let log = sample_log();
        assert!(AuditQuery::new().is_empty());
        assert!(AuditQuery::new().with_text("  ").is_empty());

        let query = AuditQuery::new()
            .with_action(AuditAction::StatusChangedManual)
            .with_text("jane");
        let hits = query.apply(&log);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].new_status(), Some(LoanStatus::Approved));
    }
}
