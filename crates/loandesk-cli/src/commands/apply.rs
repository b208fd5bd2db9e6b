//! Apply command - Submit a new loan application
//!
//! Values are passed through as typed so that validation reports the same
//! messages a form would ("amount required", "term required", ...).

use anyhow::{anyhow, Result};
use clap::Args;
use loandesk_core::domain::LoanApplication;
use loandesk_loans::{create_error_message, LoanApplicationInput, LoanStore, NumericInput};

use crate::commands::list::{loan_json, print_loan_details};
use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

/// Arguments for a new application
#[derive(Debug, Args)]
pub struct ApplyCommand {
    /// Applicant's full name
    #[arg(long)]
    pub name: Option<String>,

    /// Requested amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Term in whole months
    #[arg(long, allow_hyphen_values = true)]
    pub term: Option<String>,

    /// Annual interest rate as a fraction (0.08 for 8%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Run the automatic decision right after submitting
    #[arg(long)]
    pub decide: bool,
}

impl ApplyCommand {
    fn to_input(&self) -> LoanApplicationInput {
        LoanApplicationInput {
            applicant_name: self.name.clone().unwrap_or_default(),
            amount: self.amount.clone().map(NumericInput::from),
            term_months: self.term.clone().map(NumericInput::from),
            interest_rate: self.rate.clone().map(NumericInput::from),
        }
    }

    /// Creates the application and, with `--decide`, decides it
    async fn submit(&self, loans: &LoanStore) -> Result<LoanApplication> {
        let loan = loans
            .create(&self.to_input())
            .await
            .map_err(|e| anyhow!(create_error_message(&e)))?;

        if !self.decide {
            return Ok(loan);
        }
        loans.auto_decide(loan.id()).await?;
        Ok(loans.get(loan.id()).await?)
    }

    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let result = self.submit(&storage.loans).await;
        let loan = storage.finish(result).await?;

        if format.is_json() {
            formatter.print_json(&loan_json(&loan)?);
        } else {
            print_loan_details(formatter.as_ref(), &loan);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(amount: Option<&str>) -> ApplyCommand {
        ApplyCommand {
            name: Some("Jane Doe".into()),
            amount: amount.map(String::from),
            term: Some("12".into()),
            rate: Some("0.05".into()),
            decide: false,
        }
    }

    #[test]
    fn test_to_input_keeps_raw_text() {
        let input = command(Some("15000")).to_input();
        assert_eq!(input.amount, Some(NumericInput::Text("15000".into())));
        assert_eq!(input.validate().unwrap().amount(), 15_000.0);
    }

    #[test]
    fn test_missing_amount_reports_validation_message() {
        let input = command(None).to_input();
        assert_eq!(input.validate().unwrap_err().to_string(), "amount required");
    }
}
