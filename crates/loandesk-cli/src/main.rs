//! LoanDesk CLI - Command-line interface for LoanDesk
//!
//! Provides commands for:
//! - Submitting loan applications
//! - Listing and inspecting applications
//! - Approving, rejecting and auto-deciding pending applications
//! - Browsing and searching the audit log
//! - Inspecting configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    apply::ApplyCommand,
    audit::AuditCommand,
    completions::CompletionsCommand,
    config::ConfigCommand,
    decision::{ApproveCommand, DecideCommand, DeleteCommand, RejectCommand},
    list::{ListCommand, ShowCommand},
    stats::StatsCommand,
};
use context::AppContext;
use output::{get_formatter, needs_report, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "loandesk", version, about = "Loan application desk with audit trail")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Use alternate database file
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a new loan application
    Apply(ApplyCommand),
    /// List loan applications
    List(ListCommand),
    /// Show one loan application
    Show(ShowCommand),
    /// Approve a pending application
    Approve(ApproveCommand),
    /// Reject a pending application
    Reject(RejectCommand),
    /// Decide a pending application with the automatic rule
    Decide(DecideCommand),
    /// Delete an application
    Delete(DeleteCommand),
    /// Show summary statistics
    Stats(StatsCommand),
    /// View and search the audit log
    Audit(AuditCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = OutputFormat::from_flag(cli.json);

    if let Err(e) = run(cli, format).await {
        if needs_report(&e) {
            get_formatter(format).error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, format: OutputFormat) -> Result<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.db.as_deref())?;

    // Setup tracing; logs go to stderr so JSON output stays parseable
    let filter = match cli.verbose {
        0 => ctx.config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Apply(cmd) => cmd.execute(&ctx, format).await,
        Commands::List(cmd) => cmd.execute(&ctx, format).await,
        Commands::Show(cmd) => cmd.execute(&ctx, format).await,
        Commands::Approve(cmd) => cmd.execute(&ctx, format).await,
        Commands::Reject(cmd) => cmd.execute(&ctx, format).await,
        Commands::Decide(cmd) => cmd.execute(&ctx, format).await,
        Commands::Delete(cmd) => cmd.execute(&ctx, format).await,
        Commands::Stats(cmd) => cmd.execute(&ctx, format).await,
        Commands::Audit(cmd) => cmd.execute(&ctx, format).await,
        Commands::Config(cmd) => cmd.execute(&ctx, format).await,
        Commands::Completions(cmd) => cmd.execute(format).await,
    }
}
