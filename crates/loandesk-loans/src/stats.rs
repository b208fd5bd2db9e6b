//! Summary statistics over loan applications

use serde::Serialize;

use loandesk_core::domain::{LoanApplication, LoanStatus};

/// Counts and totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of all requested amounts
    pub total_amount: f64,
    /// Sum of approved amounts
    pub approved_amount: f64,
    /// Mean requested amount; 0 when there are no applications
    pub average_amount: f64,
}

impl LoanStats {
    pub fn from_loans(loans: &[LoanApplication]) -> Self {
        let mut stats = LoanStats {
            total: loans.len(),
            ..LoanStats::default()
        };

        for loan in loans {
            stats.total_amount += loan.amount();
            match loan.status() {
                LoanStatus::Pending => stats.pending += 1,
                LoanStatus::Approved => {
                    stats.approved += 1;
                    stats.approved_amount += loan.amount();
                }
                LoanStatus::Rejected => stats.rejected += 1,
            }
        }

        if stats.total > 0 {
            stats.average_amount = stats.total_amount / stats.total as f64;
        }
        stats
    }

    /// Share of decided applications that were approved, in `0.0..=1.0`
    pub fn approval_rate(&self) -> Option<f64> {
        let decided = self.approved + self.rejected;
        (decided > 0).then(|| self.approved as f64 / decided as f64)
    }
}
