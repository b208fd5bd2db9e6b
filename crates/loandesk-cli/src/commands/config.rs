//! Config command - View and validate LoanDesk configuration
//!
//! Provides the `loandesk config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors

use anyhow::{Context, Result};
use clap::Subcommand;
use loandesk_core::config::{Config, ValidationError};
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, AlreadyReported, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx, format),
            ConfigCommand::Validate => self.execute_validate(ctx, format),
        }
    }

    fn execute_show(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if format.is_json() {
            let json = serde_json::json!({
                "config_path": ctx.config_path.display().to_string(),
                "database": ctx.database_path().display().to_string(),
                "config": serde_json::to_value(&ctx.config)
                    .context("Failed to serialize configuration to JSON")?,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
        if !ctx.config_path.exists() {
            formatter.info("(file not found, showing defaults)");
        }
        formatter.info("");

        let yaml = serde_yaml::to_string(&ctx.config)
            .context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }

        if ctx.database_path() != ctx.config.storage.database.as_path() {
            formatter.info("");
            formatter.info(&format!("Database in use: {}", ctx.database_path().display()));
        }
        Ok(())
    }

    fn execute_validate(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config_path = &ctx.config_path;

        if !config_path.exists() {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": true,
                    "config_path": config_path.display().to_string(),
                    "warnings": ["Configuration file not found. Using defaults."],
                }));
            } else {
                formatter.info(&format!(
                    "Configuration file not found at {}",
                    config_path.display()
                ));
                formatter.info("Using default configuration.");
            }
            return Ok(());
        }

        // Re-read the file: the context silently falls back to defaults
        // when the default config file does not parse.
        let config = Config::load(config_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse configuration {}: {}",
                config_path.display(),
                e
            )
        })?;

        info!(config_path = %config_path.display(), "Validating configuration");
        let errors = config.validate();

        if format.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        validation_outcome(&errors)
    }
}

/// Fails without a message of its own once the errors have been printed
fn validation_outcome(errors: &[ValidationError]) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AlreadyReported.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::needs_report;
    use loandesk_core::config::ConfigBuilder;

    #[test]
    fn test_valid_config_passes() {
        let errors = Config::default().validate();
        assert!(validation_outcome(&errors).is_ok());
    }

    #[test]
    fn test_invalid_config_is_reported_once() {
        let errors = ConfigBuilder::new().logging_level("loud").build().validate();
        assert_eq!(errors.len(), 1);

        let err = validation_outcome(&errors).unwrap_err();
        assert!(!needs_report(&err));
    }
}
