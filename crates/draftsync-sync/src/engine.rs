//! Session-driven reconciliation engine
//!
//! The [`SyncEngine`] owns the relationship between the local draft list
//! and the server of record. It is driven by explicit [`SessionEvent`]s
//! rather than by observing ambient authentication state.
//!
//! ## Reconciliation Flow
//!
//! 1. **SignedIn**: status becomes `Reconciling`, all server pages are fetched
//! 2. **Merge**: the local list is re-read and merged by absence of remote ID
//! 3. **Commit**: the merge is written back and status becomes `Idle`
//!
//! A failed fetch skips the merge and moves straight to `Idle`, leaving the
//! local list as the degraded visible state.
//!
//! ## Single Flight
//!
//! Passes are serialized behind an async lock. A `SignedIn` for a session
//! that is already reconciling or idle does nothing. A pass whose session
//! was replaced or signed out while it was fetching discards its merge.
//!
//! ## Remote Calls
//!
//! Every gateway call is bounded by the configured timeout. Calls are never
//! retried.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use draftsync_core::config::Config;
use draftsync_core::domain::{Draft, DraftPatch, RemoteId, SessionEvent, SessionId, SyncStatus};
use draftsync_core::ports::{IDraftStore, IRemoteGateway};
use tracing::{debug, info, instrument, warn};

use crate::local::LocalDrafts;
use crate::reconcile::{reconcile_with_report, ReconcileReport};
use crate::SyncError;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on pages fetched in a single pass
///
/// Protects against a server that keeps returning full pages forever.
const MAX_PAGES: u32 = 10_000;

// ============================================================================
// SyncEngine
// ============================================================================

/// Reconciles the local draft list with the server of record
pub struct SyncEngine {
    gateway: Arc<dyn IRemoteGateway>,
    local: LocalDrafts,
    status: Mutex<SyncStatus>,
    /// Serializes reconciliation passes
    reconcile_gate: tokio::sync::Mutex<()>,
    page_size: u32,
    remote_timeout: Duration,
}

impl SyncEngine {
    /// Creates an engine in the `Unauthenticated` state
    pub fn new(
        gateway: Arc<dyn IRemoteGateway>,
        store: Arc<dyn IDraftStore>,
        config: &Config,
    ) -> Self {
        Self {
            gateway,
            local: LocalDrafts::new(store),
            status: Mutex::new(SyncStatus::Unauthenticated),
            reconcile_gate: tokio::sync::Mutex::new(()),
            page_size: config.sync.page_size.max(1),
            remote_timeout: Duration::from_secs(config.sync.remote_timeout_secs),
        }
    }

    /// Current sync status
    pub fn status(&self) -> SyncStatus {
        *self.lock_status()
    }

    /// The local draft list
    pub fn local(&self) -> &LocalDrafts {
        &self.local
    }

    /// The list presentation code should show
    ///
    /// Always the persisted local list: while reconciling it still holds the
    /// pre-merge drafts, once idle it holds the merge.
    pub fn visible(&self) -> Vec<Draft> {
        self.local.snapshot()
    }

    /// Applies an authentication transition
    ///
    /// Returns the report of the pass triggered by `SignedIn`, or `None` when
    /// no pass ran (sign-out, or the session was already reconciled).
    #[instrument(skip(self))]
    pub async fn handle_session_event(
        &self,
        event: SessionEvent,
    ) -> Result<Option<ReconcileReport>, SyncError> {
        match event {
            SessionEvent::SignedOut => {
                let mut status = self.lock_status();
                if status.is_reconciling() {
                    info!("Signed out during reconciliation, pass will be discarded");
                }
                status.sign_out();
                info!("Session ended, showing local drafts only");
                Ok(None)
            }
            SessionEvent::SignedIn(session) => {
                {
                    let mut status = self.lock_status();
                    if status.session_id() == Some(session) {
                        debug!(%status, "Session already reconciled or in flight, skipping");
                        return Ok(None);
                    }
                    status.begin_reconcile(session);
                }
                self.run_pass(session).await
            }
        }
    }

    /// Runs one reconciliation pass for `session`
    async fn run_pass(&self, session: SessionId) -> Result<Option<ReconcileReport>, SyncError> {
        let _gate = self.reconcile_gate.lock().await;

        if !self.is_current(session) {
            debug!(%session, "Session superseded before pass started");
            return Ok(None);
        }

        info!(%session, "Starting reconciliation");

        let server = match self.fetch_all().await {
            Ok(server) => server,
            Err(e) => {
                warn!(%session, error = %e, "Fetching server drafts failed, keeping local drafts");
                let report = ReconcileReport::degraded(self.local.snapshot().len());
                self.finish(session)?;
                return Ok(Some(report));
            }
        };

        let mut status = self.lock_status();
        if *status != SyncStatus::Reconciling(session) {
            info!(%session, %status, "Session changed during fetch, discarding merge");
            return Ok(None);
        }

        let report = self.local.modify(|drafts| {
            let local = std::mem::take(drafts);
            let (merged, report) = reconcile_with_report(server, local);
            *drafts = merged;
            report
        });
        status.complete_reconcile(session)?;
        drop(status);

        info!(
            %session,
            server_drafts = report.server_drafts,
            local_only_kept = report.local_only_kept,
            local_dropped = report.local_dropped,
            "Reconciliation complete"
        );
        Ok(Some(report))
    }

    /// Moves to `Idle` if `session` is still the one reconciling
    fn finish(&self, session: SessionId) -> Result<(), SyncError> {
        let mut status = self.lock_status();
        if *status == SyncStatus::Reconciling(session) {
            status.complete_reconcile(session)?;
        }
        Ok(())
    }

    fn is_current(&self, session: SessionId) -> bool {
        *self.lock_status() == SyncStatus::Reconciling(session)
    }

    fn lock_status(&self) -> MutexGuard<'_, SyncStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Remote calls
    // ========================================================================

    /// Fetches every server draft, page by page, until a short page
    pub async fn fetch_all(&self) -> Result<Vec<Draft>, SyncError> {
        let mut drafts = Vec::new();
        let mut offset = 0u32;

        for page_number in 0..MAX_PAGES {
            let page = self
                .bounded("list", self.gateway.list(offset, self.page_size))
                .await?;
            let received = page.received();
            debug!(page_number, offset, received, skipped = page.skipped, "fetched page");

            for draft in page.drafts {
                if draft.remote_id().is_some() {
                    drafts.push(draft);
                } else {
                    warn!(title = draft.title(), "Server returned a draft without an ID, skipping");
                }
            }

            if received < self.page_size as usize {
                return Ok(drafts);
            }
            offset = offset.saturating_add(received as u32);
        }

        warn!(pages = MAX_PAGES, "Page limit reached, using drafts fetched so far");
        Ok(drafts)
    }

    pub(crate) async fn remote_create(&self, draft: &Draft) -> Result<Draft, SyncError> {
        self.bounded("create", self.gateway.create(draft)).await
    }

    pub(crate) async fn remote_update(
        &self,
        remote_id: &RemoteId,
        patch: &DraftPatch,
    ) -> Result<Draft, SyncError> {
        self.bounded("update", self.gateway.update(remote_id, patch))
            .await
    }

    pub(crate) async fn remote_delete(&self, remote_id: &RemoteId) -> Result<(), SyncError> {
        self.bounded("delete", self.gateway.delete(remote_id)).await
    }

    /// Awaits a gateway call under the configured timeout
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, SyncError> {
        match tokio::time::timeout(self.remote_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(SyncError::Remote { operation, source }),
            Err(_) => Err(SyncError::Timeout {
                operation,
                timeout: self.remote_timeout,
            }),
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("status", &self.status())
            .field("page_size", &self.page_size)
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use draftsync_core::config::ConfigBuilder;
    use draftsync_core::domain::DraftParts;
    use draftsync_core::ports::DraftPage;
    use draftsync_store::MemoryDraftStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_draft(n: u32) -> Draft {
        let now = chrono::Utc::now();
        Draft::from_parts(DraftParts {
            local_id: None,
            remote_id: Some(RemoteId::new(format!("s{n}")).unwrap()),
            title: format!("Server {n}"),
            content: json!({}),
            metadata: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap()
    }

    /// Serves `total` drafts, honouring offset and limit
    ///
    /// The first `unreadable` records are reported as skipped instead.
    struct PagedGateway {
        total: u32,
        unreadable: u32,
        list_calls: AtomicU32,
    }

    #[async_trait]
    impl IRemoteGateway for PagedGateway {
        async fn list(&self, offset: u32, limit: u32) -> anyhow::Result<DraftPage> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let end = (offset + limit).min(self.total);
            let readable_from = offset.max(self.unreadable).min(end);
            let mut page = DraftPage::new((readable_from..end).map(server_draft).collect());
            page.skipped = readable_from.saturating_sub(offset) as usize;
            Ok(page)
        }

        async fn create(&self, _draft: &Draft) -> anyhow::Result<Draft> {
            anyhow::bail!("not used")
        }

        async fn update(&self, _id: &RemoteId, _patch: &DraftPatch) -> anyhow::Result<Draft> {
            anyhow::bail!("not used")
        }

        async fn delete(&self, _id: &RemoteId) -> anyhow::Result<()> {
            anyhow::bail!("not used")
        }
    }

    fn engine_with(total: u32, page_size: u32) -> (SyncEngine, Arc<PagedGateway>) {
        engine_with_unreadable(total, 0, page_size)
    }

    fn engine_with_unreadable(
        total: u32,
        unreadable: u32,
        page_size: u32,
    ) -> (SyncEngine, Arc<PagedGateway>) {
        let gateway = Arc::new(PagedGateway {
            total,
            unreadable,
            list_calls: AtomicU32::new(0),
        });
        let config = ConfigBuilder::new().sync_page_size(page_size).build();
        let engine = SyncEngine::new(gateway.clone(), Arc::new(MemoryDraftStore::new()), &config);
        (engine, gateway)
    }

    #[tokio::test]
    async fn test_fetch_all_walks_pages_until_short_page() {
        let (engine, gateway) = engine_with(7, 3);

        let drafts = engine.fetch_all().await.unwrap();

        assert_eq!(drafts.len(), 7);
        assert_eq!(drafts[6].remote_id().unwrap().as_str(), "s6");
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_exact_multiple_needs_trailing_empty_page() {
        let (engine, gateway) = engine_with(6, 3);

        assert_eq!(engine.fetch_all().await.unwrap().len(), 6);
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_skipped_records_count_toward_full_pages() {
        let (engine, gateway) = engine_with_unreadable(7, 2, 3);

        let drafts = engine.fetch_all().await.unwrap();

        assert_eq!(drafts.len(), 5);
        assert_eq!(drafts[0].remote_id().unwrap().as_str(), "s2");
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_new_engine_is_unauthenticated() {
        let (engine, _) = engine_with(0, 10);
        assert_eq!(engine.status(), SyncStatus::Unauthenticated);
        assert!(engine.visible().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_sign_in_is_a_no_op() {
        let (engine, gateway) = engine_with(2, 10);
        let session = SessionId::new();

        let first = engine
            .handle_session_event(SessionEvent::SignedIn(session))
            .await
            .unwrap();
        let second = engine
            .handle_session_event(SessionEvent::SignedIn(session))
            .await
            .unwrap();

        assert_eq!(first.unwrap().server_drafts, 2);
        assert!(second.is_none());
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.status(), SyncStatus::Idle(session));
    }

    #[tokio::test]
    async fn test_reconcile_keeps_local_only_drafts() {
        let (engine, _) = engine_with(1, 10);
        let mut local = server_draft(0);
        local.set_title("stale");
        let fresh = Draft::new("offline", json!({}), None);
        engine.local().modify(|drafts| {
            drafts.push(fresh.clone());
            drafts.push(local);
        });

        let report = engine
            .handle_session_event(SessionEvent::SignedIn(SessionId::new()))
            .await
            .unwrap()
            .unwrap();

        let visible = engine.visible();
        assert_eq!(report.local_dropped, 1);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].title(), "Server 0");
        assert_eq!(visible[1].local_id(), fresh.local_id());
        assert!(visible.iter().all(|d| d.title() != "stale"));
    }
}
