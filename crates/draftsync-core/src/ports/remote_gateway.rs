//! Remote gateway port (driven/secondary port)
//!
//! This module defines the call surface for persisting drafts to the server
//! of record. Transport concerns (headers, retries) belong to the adapter.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific
//!   and don't need domain-level classification.
//! - Uses `#[async_trait]` for async trait methods.
//! - Every method fails on network or authorization errors; callers do not
//!   retry.

use crate::domain::{Draft, DraftPatch, RemoteId};

/// One page of server-side drafts
#[derive(Debug, Clone, Default)]
pub struct DraftPage {
    /// Drafts on this page, each bearing a remote ID
    pub drafts: Vec<Draft>,
    /// Records the server sent on this page that could not be read
    ///
    /// They still occupy page slots, so pagination counts them.
    pub skipped: usize,
}

impl DraftPage {
    pub fn new(drafts: Vec<Draft>) -> Self {
        Self { drafts, skipped: 0 }
    }

    /// Number of records the server returned, readable or not
    pub fn received(&self) -> usize {
        self.drafts.len() + self.skipped
    }
}

/// Port trait for server-of-record operations
#[async_trait::async_trait]
pub trait IRemoteGateway: Send + Sync {
    /// Fetches a page of the authenticated user's drafts
    ///
    /// # Arguments
    /// * `offset` - Number of drafts to skip
    /// * `limit` - Maximum number of drafts to return
    async fn list(&self, offset: u32, limit: u32) -> anyhow::Result<DraftPage>;

    /// Persists a new draft
    ///
    /// # Returns
    /// The stored record carrying its server-assigned remote ID
    async fn create(&self, draft: &Draft) -> anyhow::Result<Draft>;

    /// Applies a partial update to the draft with `remote_id`
    ///
    /// # Returns
    /// The updated record
    async fn update(&self, remote_id: &RemoteId, patch: &DraftPatch) -> anyhow::Result<Draft>;

    /// Deletes the draft with `remote_id`
    async fn delete(&self, remote_id: &RemoteId) -> anyhow::Result<()>;
}
