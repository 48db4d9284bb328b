//! Sync command - Reconcile local drafts with the server
//!
//! Signs the configured session in, which pulls every server page and
//! merges it with the local list. A failed fetch leaves the local list
//! as it was and is reported as degraded.

use anyhow::{Context, Result};
use clap::Args;
use draftsync_core::config::ACCESS_TOKEN_ENV;
use draftsync_core::domain::SessionEvent;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let session = ctx.session.id().with_context(|| {
            format!("Not signed in: set remote.access_token or {ACCESS_TOKEN_ENV}")
        })?;

        formatter.info("Reconciling with server...");
        let report = ctx
            .manager
            .engine()
            .handle_session_event(SessionEvent::SignedIn(session))
            .await?;
        let status = ctx.manager.engine().status();

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "status": status.name(),
                "report": report,
            }));
            return Ok(());
        }

        match report {
            Some(report) if report.degraded => {
                formatter.warn("Could not reach the server; showing local drafts only");
            }
            Some(report) => {
                formatter.success("Reconciled with server");
                formatter.info(&format!("Server drafts:     {}", report.server_drafts));
                formatter.info(&format!("Kept local-only:   {}", report.local_only_kept));
                formatter.info(&format!("Replaced by server: {}", report.local_dropped));
            }
            None => formatter.info("Nothing to reconcile"),
        }
        Ok(())
    }
}
