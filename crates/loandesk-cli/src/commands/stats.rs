//! Stats command - Portfolio summary

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output::{get_formatter, money, OutputFormat};

#[derive(Debug, Args)]
pub struct StatsCommand {}

impl StatsCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let storage = ctx.open_storage().await?;
        let stats = storage.loans.stats().await;
        storage.close().await;

        if format.is_json() {
            let mut json = serde_json::to_value(&stats).context("Failed to serialize statistics")?;
            json["approvalRate"] = serde_json::json!(stats.approval_rate());
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!("{} loan applications", stats.total));
        formatter.info(&format!("Pending:          {}", stats.pending));
        formatter.info(&format!("Approved:         {}", stats.approved));
        formatter.info(&format!("Rejected:         {}", stats.rejected));
        formatter.info(&format!("Total requested:  {}", money(stats.total_amount)));
        formatter.info(&format!("Total approved:   {}", money(stats.approved_amount)));
        formatter.info(&format!("Average amount:   {}", money(stats.average_amount)));
        match stats.approval_rate() {
            Some(rate) => formatter.info(&format!("Approval rate:    {:.1}%", rate * 100.0)),
            None => formatter.info("Approval rate:    n/a"),
        }
        Ok(())
    }
}
