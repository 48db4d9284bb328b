//! Export command - Write the visible list to `ai-drafts-<date>.json`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write into (defaults to `export.directory`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let directory = self
            .output
            .clone()
            .unwrap_or_else(|| ctx.export_directory().to_path_buf());

        let snapshot = ctx.manager.export()?;
        let path = snapshot
            .write_to(&directory)
            .with_context(|| format!("Failed to write export into {}", directory.display()))?;

        info!(path = %path.display(), drafts = snapshot.draft_count, "Exported drafts");

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "path": path.display().to_string(),
                "drafts": snapshot.draft_count,
            }));
        } else {
            formatter.success(&format!(
                "Exported {} draft{} to {}",
                snapshot.draft_count,
                if snapshot.draft_count == 1 { "" } else { "s" },
                path.display()
            ));
        }
        Ok(())
    }
}
