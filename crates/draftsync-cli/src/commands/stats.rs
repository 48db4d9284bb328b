//! Stats command - Word totals and drafts per template

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatsCommand {}

impl StatsCommand {
    pub fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let stats = ctx.manager.get_stats();

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&stats)?);
            return Ok(());
        }

        formatter.success(&format!(
            "{} drafts, {} words",
            stats.total_drafts, stats.total_words
        ));
        for (template, count) in &stats.drafts_by_type {
            formatter.info(&format!("{template:<20} {count}"));
        }
        Ok(())
    }
}
