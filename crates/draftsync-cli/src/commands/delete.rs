//! Delete command - Remove a draft from the server and this device

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Local or remote ID of the draft
    pub id: String,
}

impl DeleteCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let draft_ref = ctx.resolve(&self.id)?;
        ctx.manager.delete(&ctx.session, &draft_ref).await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "deleted": draft_ref.to_string(),
            }));
        } else {
            formatter.success(&format!("Deleted {}", self.id));
            if !ctx.session.is_authenticated() {
                formatter.info("Not signed in; a server copy, if any, is untouched");
            }
        }
        Ok(())
    }
}
