//! Update command - Apply field changes on the server and locally
//!
//! When signed in, a failed server update leaves the local draft untouched
//! and the command fails.

use anyhow::{bail, Result};
use clap::Args;

use crate::commands::compose::DraftFields;
use crate::context::AppContext;
use crate::output::{display_id, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Local or remote ID of the draft
    pub id: String,
    #[command(flatten)]
    pub fields: DraftFields,
}

impl UpdateCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        if self.fields.is_empty() {
            bail!("Nothing to change: pass --title, --body or --template");
        }

        let draft_ref = ctx.resolve(&self.id)?;
        let current = ctx.manager.find(&draft_ref);
        let patch = self.fields.to_patch(current.as_ref());

        let updated = ctx.manager.update(&ctx.session, &draft_ref, &patch).await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&updated)?);
        } else {
            formatter.success(&format!("Updated {}", display_id(&updated)));
        }
        Ok(())
    }
}
