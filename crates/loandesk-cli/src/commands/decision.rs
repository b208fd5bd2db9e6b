//! Decision commands - approve, reject, auto-decide and delete
//!
//! Only pending applications can be decided; the store rejects anything
//! else with an invalid-transition error, which is reported as-is.

use anyhow::Result;
use clap::Args;
use loandesk_core::domain::{LoanId, LoanStatus};

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

/// Approve a pending application
#[derive(Debug, Args)]
pub struct ApproveCommand {
    /// Loan application id
    pub id: LoanId,
}

impl ApproveCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        set_status(ctx, format, &self.id, LoanStatus::Approved).await
    }
}

/// Reject a pending application
#[derive(Debug, Args)]
pub struct RejectCommand {
    /// Loan application id
    pub id: LoanId,
}

impl RejectCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        set_status(ctx, format, &self.id, LoanStatus::Rejected).await
    }
}

async fn set_status(
    ctx: &AppContext,
    format: OutputFormat,
    id: &LoanId,
    status: LoanStatus,
) -> Result<()> {
    let formatter = get_formatter(format);
    let storage = ctx.open_storage().await?;
    let result = storage.loans.update_status(id, status).await;
    storage.finish(result).await?;

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "id": id.as_str(),
            "status": status,
            "automatic": false,
        }));
    } else {
        formatter.success(&format!("Loan {} {}", id, status));
    }
    Ok(())
}

/// Decide a pending application: approve when the amount is at most
/// 100,000 and the term at most 60 months, reject otherwise
#[derive(Debug, Args)]
pub struct DecideCommand {
    /// Loan application id
    pub id: LoanId,
}

impl DecideCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let result = storage.loans.auto_decide(&self.id).await;
        let status = storage.finish(result).await?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "id": self.id.as_str(),
                "status": status,
                "automatic": true,
            }));
        } else {
            formatter.success(&format!("Loan {} {} (auto-decision)", self.id, status));
        }
        Ok(())
    }
}

/// Delete an application; its audit history is kept
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Loan application id
    pub id: LoanId,
}

impl DeleteCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let result = storage.loans.delete(&self.id).await;
        storage.finish(result).await?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "id": self.id.as_str(),
                "deleted": true,
            }));
        } else {
            formatter.success(&format!("Loan {} deleted", self.id));
        }
        Ok(())
    }
}
