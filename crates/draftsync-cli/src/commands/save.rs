//! Save command - Persist a draft locally and, when signed in, on the server
//!
//! A failed server save is not an error: the draft stays saved locally and
//! a warning says it is not yet synced.

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{display_id, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Local or remote ID of the draft
    pub id: String,
}

impl SaveCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let draft = ctx.find(&self.id)?;
        let saved = ctx.manager.save(&ctx.session, draft).await;
        let synced = saved.remote_id().is_some();

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "draft": saved,
                "synced": synced,
            }));
            return Ok(());
        }

        if !ctx.session.is_authenticated() {
            formatter.success(&format!("Saved {} locally", display_id(&saved)));
            formatter.info("Not signed in; the draft will be sent on the next save after sign-in");
        } else if let Some(remote_id) = saved.remote_id() {
            formatter.success(&format!("Saved {} (server ID {remote_id})", display_id(&saved)));
        } else {
            formatter.warn("Server save failed; the draft is kept locally and not yet synced");
        }
        Ok(())
    }
}
