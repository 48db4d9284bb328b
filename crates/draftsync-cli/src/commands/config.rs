//! Config command - View and validate draftsync configuration
//!
//! Provides the `draftsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON), token redacted
//! 2. Validates the configuration and reports every error found
//! 3. Prints the configuration file path

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use draftsync_core::config::Config;
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

const REDACTED: &str = "********";

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub fn execute(&self, config: &Config, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config, config_path, format),
            ConfigCommand::Validate => execute_validate(config, config_path, format),
            ConfigCommand::Path => {
                let formatter = get_formatter(matches!(format, OutputFormat::Json));
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "path": config_path.display().to_string(),
                        "exists": config_path.exists(),
                    }));
                } else {
                    formatter.info(&config_path.display().to_string());
                }
                Ok(())
            }
        }
    }
}

/// Copy of `config` safe to print
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.remote.access_token.is_some() {
        shown.remote.access_token = Some(REDACTED.to_string());
    }
    shown
}

fn execute_show(config: &Config, config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));
    let shown = redacted(config);

    info!(config_path = %config_path.display(), "Showing configuration");

    if matches!(format, OutputFormat::Json) {
        let json =
            serde_json::to_value(&shown).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&shown).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

fn execute_validate(config: &Config, config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));
    let errors = config.validate();

    if matches!(format, OutputFormat::Json) {
        let details: Vec<_> = errors
            .iter()
            .map(|e| serde_json::json!({"field": e.field, "message": e.message}))
            .collect();
        formatter.print_json(&serde_json::json!({
            "path": config_path.display().to_string(),
            "valid": errors.is_empty(),
            "errors": details,
        }));
    } else if errors.is_empty() {
        formatter.success(&format!("Configuration is valid ({})", config_path.display()));
    } else {
        for error in &errors {
            formatter.info(&error.to_string());
        }
    }

    if !errors.is_empty() {
        bail!(
            "{} configuration error{}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
