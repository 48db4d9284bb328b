//! List command - Show drafts known to this device

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{draft_line, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show drafts with this template tag
    #[arg(long)]
    pub template: Option<String>,
}

impl ListCommand {
    pub fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let drafts: Vec<_> = ctx
            .manager
            .visible()
            .into_iter()
            .filter(|d| match &self.template {
                Some(tag) => d.template() == Some(tag.as_str()),
                None => true,
            })
            .collect();

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&drafts)?);
            return Ok(());
        }

        if drafts.is_empty() {
            formatter.info("No drafts");
            return Ok(());
        }

        let synced = drafts.iter().filter(|d| d.remote_id().is_some()).count();
        formatter.success(&format!(
            "{} draft{} ({} on server)",
            drafts.len(),
            if drafts.len() == 1 { "" } else { "s" },
            synced
        ));
        for draft in &drafts {
            formatter.info(&draft_line(draft));
        }
        Ok(())
    }
}
