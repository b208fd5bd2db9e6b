//! List and show commands - Inspect stored loan applications

use anyhow::{Context, Result};
use clap::Args;
use loandesk_core::domain::{LoanApplication, LoanId, LoanStatus};

use crate::context::AppContext;
use crate::output::{get_formatter, money, percent, OutputFormat, OutputFormatter};

/// List applications, optionally by status
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show applications with this status (pending, approved, rejected)
    #[arg(long)]
    pub status: Option<LoanStatus>,
}

impl ListCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;

        let loans = match self.status {
            Some(status) => storage.loans.list_by_status(status).await,
            None => storage.loans.list().await,
        };
        storage.close().await;

        tracing::debug!(count = loans.len(), status = ?self.status, "Listed loan applications");

        if format.is_json() {
            let items = loans
                .iter()
                .map(loan_json)
                .collect::<Result<Vec<_>>>()?;
            formatter.print_json(&serde_json::json!({
                "count": loans.len(),
                "loans": items,
            }));
            return Ok(());
        }

        if loans.is_empty() {
            formatter.info("No loan applications found.");
            return Ok(());
        }

        formatter.success(&format!("Loan applications ({})", loans.len()));
        formatter.info("");
        formatter.info(&format!(
            "{:<36}  {:<24} {:>14} {:>6} {:>8}  {:<8}  {}",
            "ID", "Applicant", "Amount", "Term", "Rate", "Status", "Created"
        ));
        for loan in &loans {
            formatter.info(&format!(
                "{:<36}  {:<24} {:>14} {:>6} {:>8}  {:<8}  {}",
                loan.id().as_str(),
                truncate(loan.applicant_name(), 24),
                money(loan.amount()),
                loan.term_months(),
                percent(loan.interest_rate()),
                loan.status().as_str(),
                loan.created_at().format("%Y-%m-%d %H:%M"),
            ));
        }
        Ok(())
    }
}

/// Show one application with its monthly payment
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Loan application id
    pub id: LoanId,
}

impl ShowCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let result = storage.loans.get(&self.id).await;
        let trail = storage.loans.audit().trail(&self.id).await;
        storage.close().await;
        let loan = result?;

        if format.is_json() {
            let mut json = loan_json(&loan)?;
            json["auditEntries"] = serde_json::json!(trail.len());
            formatter.print_json(&json);
        } else {
            print_loan_details(formatter.as_ref(), &loan);
            formatter.info(&format!("Audit entries:   {}", trail.len()));
        }
        Ok(())
    }
}

/// Serializes a loan with its derived monthly payment
pub(crate) fn loan_json(loan: &LoanApplication) -> Result<serde_json::Value> {
    let mut json = serde_json::to_value(loan).context("Failed to serialize loan application")?;
    json["monthlyPayment"] = serde_json::json!(loan.monthly_payment());
    Ok(json)
}

pub(crate) fn print_loan_details(formatter: &dyn OutputFormatter, loan: &LoanApplication) {
    formatter.success(&format!("Loan {}", loan.id()));
    formatter.info(&format!("Applicant:       {}", loan.applicant_name()));
    formatter.info(&format!("Amount:          {}", money(loan.amount())));
    formatter.info(&format!("Term:            {} months", loan.term_months()));
    formatter.info(&format!("Interest rate:   {}", percent(loan.interest_rate())));
    formatter.info(&format!("Monthly payment: {}", money(loan.monthly_payment())));
    formatter.info(&format!("Status:          {}", loan.status()));
    formatter.info(&format!(
        "Created:         {}",
        loan.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('\u{2026}');
    cut
}
