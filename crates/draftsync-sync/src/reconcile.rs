//! Union-by-absence reconciliation
//!
//! The server is authoritative for every draft it recognizes. A local draft
//! survives the merge only when its remote ID is absent from the server set,
//! either because it was never pushed or because the server no longer has it.
//! A local copy of a recognized draft is dropped even if it is newer.

use std::collections::HashSet;

use draftsync_core::domain::{Draft, RemoteId};
use serde::Serialize;

/// Summary of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Drafts returned by the server
    pub server_drafts: usize,
    /// Local drafts kept because the server does not know them
    pub local_only_kept: usize,
    /// Local drafts dropped in favour of the server copy
    pub local_dropped: usize,
    /// The fetch failed and the local list was kept as-is
    pub degraded: bool,
}

impl ReconcileReport {
    /// Report for a pass whose fetch failed
    pub fn degraded(local_count: usize) -> Self {
        Self {
            server_drafts: 0,
            local_only_kept: local_count,
            local_dropped: 0,
            degraded: true,
        }
    }
}

/// Merges server drafts with local drafts
///
/// The result is the server drafts, unchanged and in order, followed by
/// every local draft whose remote ID is not in the server set.
pub fn reconcile(server: Vec<Draft>, local: Vec<Draft>) -> Vec<Draft> {
    reconcile_with_report(server, local).0
}

/// Same as [`reconcile`], also counting what was kept and dropped
pub fn reconcile_with_report(server: Vec<Draft>, local: Vec<Draft>) -> (Vec<Draft>, ReconcileReport) {
    let known: HashSet<RemoteId> = server.iter().filter_map(Draft::remote_id).cloned().collect();

    let mut report = ReconcileReport {
        server_drafts: server.len(),
        ..ReconcileReport::default()
    };

    let mut merged = server;
    for draft in local {
        let recognized = draft.remote_id().is_some_and(|id| known.contains(id));
        if recognized {
            report.local_dropped += 1;
        } else {
            report.local_only_kept += 1;
            merged.push(draft);
        }
    }

    (merged, report)
}
