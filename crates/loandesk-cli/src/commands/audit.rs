//! Audit command - View and search the audit log
//!
//! Provides the `loandesk audit` CLI command which:
//! 1. Loads the whole audit log (or one loan's trail with --loan)
//! 2. Filters by action type and then by case-insensitive text
//! 3. Prints entries oldest first, with their status change if any
//!
//! `loandesk audit clear --yes` empties the log.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use loandesk_audit::AuditQuery;
use loandesk_core::domain::{AuditAction, AuditEntry, LoanId};
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, money, OutputFormat};

/// Audit log filters
#[derive(Debug, Args)]
pub struct AuditCommand {
    /// Filter by action type (LOAN_CREATED, STATUS_CHANGED_MANUAL,
    /// STATUS_CHANGED_AUTO, LOAN_DELETED)
    #[arg(long)]
    pub action: Option<AuditAction>,

    /// Case-insensitive text matched against description, applicant and loan id
    #[arg(long)]
    pub search: Option<String>,

    /// Only entries for this loan
    #[arg(long)]
    pub loan: Option<LoanId>,

    #[command(subcommand)]
    pub command: Option<AuditSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum AuditSubcommand {
    /// Delete every audit entry
    Clear {
        /// Confirm clearing the log
        #[arg(long)]
        yes: bool,
    },
}

impl AuditCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        match &self.command {
            Some(AuditSubcommand::Clear { yes }) => self.execute_clear(ctx, format, *yes).await,
            None => self.execute_list(ctx, format).await,
        }
    }

    fn query(&self) -> AuditQuery {
        let mut query = AuditQuery::new();
        if let Some(action) = self.action {
            query = query.with_action(action);
        }
        if let Some(text) = &self.search {
            query = query.with_text(text.as_str());
        }
        query
    }

    async fn execute_list(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let audit = storage.loans.audit();
        let entries = match &self.loan {
            Some(id) => audit.trail(id).await,
            None => audit.load().await,
        };
        storage.close().await;

        let entries = self.query().apply(&entries);
        info!(count = entries.len(), "Retrieved audit entries");

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "count": entries.len(),
                "action": self.action,
                "search": self.search,
                "loan": self.loan.as_ref().map(LoanId::as_str),
                "entries": entries,
            }));
            return Ok(());
        }

        if entries.is_empty() {
            formatter.info("No audit entries found for the specified criteria.");
            return Ok(());
        }

        formatter.success(&format!("Audit Log ({} entries)", entries.len()));
        formatter.info("");
        formatter.info(&format!(
            "{:<19}  {:<21}  {:<20}  {:>14}  {}",
            "Timestamp", "Action", "Applicant", "Amount", "Details"
        ));
        for entry in &entries {
            formatter.info(&format_entry(entry));
        }
        Ok(())
    }

    async fn execute_clear(&self, ctx: &AppContext, format: OutputFormat, yes: bool) -> Result<()> {
        if !yes {
            bail!("Refusing to clear the audit log without --yes");
        }

        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let audit = storage.loans.audit();
        let removed = audit.load().await.len();
        audit.clear().await?;
        storage.close().await;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "removed": removed,
            }));
        } else {
            formatter.success(&format!("Cleared {} audit entries", removed));
        }
        Ok(())
    }
}

fn format_entry(entry: &AuditEntry) -> String {
    let details = match (entry.previous_status(), entry.new_status()) {
        (Some(previous), Some(new)) => format!("{} -> {}", previous, new),
        _ => entry.description().to_string(),
    };
    format!(
        "{:<19}  {:<21}  {:<20}  {:>14}  {}",
        entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
        entry.action_type().as_str(),
        entry.applicant_name(),
        money(entry.amount()),
        details
    )
}
