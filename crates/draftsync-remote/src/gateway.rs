//! HttpRemoteGateway - IRemoteGateway implementation over the drafts API
//!
//! Thin delegation to [`DraftsClient`]. Errors are returned as
//! `anyhow::Error` wrapping a [`RemoteError`](crate::RemoteError) so callers
//! can downcast when they need the classification.

use anyhow::{Context, Result};
use async_trait::async_trait;
use draftsync_core::config::RemoteConfig;
use draftsync_core::domain::{Draft, DraftPatch, RemoteId};
use draftsync_core::ports::{DraftPage, IRemoteGateway};

use crate::client::DraftsClient;

/// Remote gateway backed by the drafts REST API
#[derive(Debug, Clone)]
pub struct HttpRemoteGateway {
    client: DraftsClient,
}

impl HttpRemoteGateway {
    pub fn new(client: DraftsClient) -> Self {
        Self { client }
    }

    /// Builds a gateway from configuration and an optional bearer token
    pub fn from_config(config: &RemoteConfig, access_token: Option<String>) -> Self {
        let mut client = DraftsClient::new(config.base_url.clone());
        client.set_access_token(access_token);
        Self { client }
    }

    pub fn client(&self) -> &DraftsClient {
        &self.client
    }
}

#[async_trait]
impl IRemoteGateway for HttpRemoteGateway {
    async fn list(&self, offset: u32, limit: u32) -> Result<DraftPage> {
        self.client
            .list_drafts(offset, limit)
            .await
            .with_context(|| format!("Failed to list drafts at offset {offset}"))
    }

    async fn create(&self, draft: &Draft) -> Result<Draft> {
        self.client
            .create_draft(draft)
            .await
            .context("Failed to create draft")
    }

    async fn update(&self, remote_id: &RemoteId, patch: &DraftPatch) -> Result<Draft> {
        self.client
            .update_draft(remote_id, patch)
            .await
            .with_context(|| format!("Failed to update draft {remote_id}"))
    }

    async fn delete(&self, remote_id: &RemoteId) -> Result<()> {
        self.client
            .delete_draft(remote_id)
            .await
            .with_context(|| format!("Failed to delete draft {remote_id}"))
    }
}
