//! Duplicate command - Copy a draft under a new identity

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{display_id, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct DuplicateCommand {
    /// Local or remote ID of the source draft
    pub id: String,
}

impl DuplicateCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let draft_ref = ctx.resolve(&self.id)?;
        let copy = ctx.manager.duplicate(&ctx.session, &draft_ref).await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&copy)?);
        } else {
            formatter.success(&format!("Created {} \"{}\"", display_id(&copy), copy.title()));
        }
        Ok(())
    }
}
