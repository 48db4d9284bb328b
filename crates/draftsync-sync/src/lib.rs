//! draftsync Sync - Reconciliation engine and draft lifecycle
//!
//! Provides:
//! - Union-by-absence reconciliation of server drafts with the local list
//! - Session-driven sync status (`Unauthenticated` / `Reconciling` / `Idle`)
//! - The mutation surface used by presentation code
//!
//! ## Modules
//!
//! - [`reconcile`] - Pure merge of server and local draft lists
//! - [`local`] - Serialized read-modify-write access to the draft store
//! - [`engine`] - Session state machine, paginated fetch, bounded remote calls
//! - [`lifecycle`] - Create, autosave, save, update, delete, duplicate, stats
//! - [`export`] - Dated JSON snapshot of the visible list

pub mod engine;
pub mod export;
pub mod lifecycle;
pub mod local;
pub mod reconcile;

pub use engine::SyncEngine;
pub use export::ExportSnapshot;
pub use lifecycle::DraftLifecycleManager;
pub use reconcile::{reconcile, ReconcileReport};

use std::time::Duration;

use draftsync_core::domain::{DomainError, DraftRef};
use thiserror::Error;

/// Errors surfaced by engine and lifecycle operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// No draft matches the given reference
    #[error("Draft not found: {0}")]
    NotFound(DraftRef),

    /// The remote gateway rejected or failed the call
    #[error("Remote {operation} failed: {source:#}")]
    Remote {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The remote call did not complete within the configured bound
    #[error("Remote {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Serializing drafts for export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A domain-level error propagated from draftsync-core
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl SyncError {
    /// Returns true if the failure came from the remote side (error or timeout)
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Timeout { .. })
    }
}
