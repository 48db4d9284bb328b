//! Shared test doubles for the sync crate integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Notify;

use draftsync_core::config::ConfigBuilder;
use draftsync_core::domain::{
    Draft, DraftMetadata, DraftParts, DraftPatch, LocalId, RemoteId, Session, SessionId,
};
use draftsync_core::ports::{DraftPage, IRemoteGateway};
use draftsync_store::MemoryDraftStore;
use draftsync_sync::{DraftLifecycleManager, SyncEngine};

/// Builds a draft with the given identifiers
pub fn draft(local: Option<&str>, remote: Option<&str>, title: &str) -> Draft {
    let now = Utc::now();
    Draft::from_parts(DraftParts {
        local_id: local.map(|id| LocalId::new(id).unwrap()),
        remote_id: remote.map(|id| RemoteId::new(id).unwrap()),
        title: title.to_string(),
        content: json!({"body": title}),
        metadata: None,
        created_at: now,
        updated_at: now,
    })
    .unwrap()
}

/// Builds a local-only draft carrying word count and template metadata
pub fn tagged(local: &str, words: u64, template: &str) -> Draft {
    let mut draft = draft(Some(local), None, local);
    draft.set_metadata(Some(DraftMetadata {
        word_count: words,
        template: Some(template.to_string()),
        ..Default::default()
    }));
    draft
}

pub fn local_ref(id: &str) -> draftsync_core::domain::DraftRef {
    draftsync_core::domain::DraftRef::Local(LocalId::new(id).unwrap())
}

pub fn remote_ref(id: &str) -> draftsync_core::domain::DraftRef {
    draftsync_core::domain::DraftRef::Remote(RemoteId::new(id).unwrap())
}

pub fn signed_in() -> Session {
    Session::Authenticated(SessionId::new())
}

// ============================================================================
// FakeGateway
// ============================================================================

/// Pauses the first `list` call until released
#[derive(Clone, Default)]
pub struct ListHold {
    /// Notified once the held call has started
    pub entered: Arc<Notify>,
    /// Notify to let the held call return
    pub release: Arc<Notify>,
}

/// In-memory server of record
#[derive(Default)]
pub struct FakeGateway {
    server: Mutex<Vec<Draft>>,
    next_id: AtomicU32,
    failing: Mutex<HashSet<&'static str>>,
    stalled: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    hold: Option<ListHold>,
    held_once: AtomicBool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(drafts: Vec<Draft>) -> Self {
        Self {
            server: Mutex::new(drafts),
            ..Self::default()
        }
    }

    /// Makes the first `list` call wait on the returned hold
    pub fn hold_first_list(mut self) -> (Self, ListHold) {
        let hold = ListHold::default();
        self.hold = Some(hold.clone());
        (self, hold)
    }

    /// Makes every call to `operation` fail
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Makes every call to `operation` never complete
    pub fn stall(&self, operation: &'static str) {
        self.stalled.lock().unwrap().insert(operation);
    }

    /// Calls received so far, as `operation` or `operation:id`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn server(&self) -> Vec<Draft> {
        self.server.lock().unwrap().clone()
    }

    async fn enter(&self, operation: &'static str, detail: Option<&str>) -> anyhow::Result<()> {
        let entry = match detail {
            Some(detail) => format!("{operation}:{detail}"),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(entry);

        let stalled = self.stalled.lock().unwrap().contains(operation);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(operation) {
            anyhow::bail!("network error during {operation}");
        }
        Ok(())
    }
}

#[async_trait]
impl IRemoteGateway for FakeGateway {
    async fn list(&self, offset: u32, limit: u32) -> anyhow::Result<DraftPage> {
        if let Some(hold) = &self.hold {
            if !self.held_once.swap(true, Ordering::SeqCst) {
                hold.entered.notify_one();
                hold.release.notified().await;
            }
        }
        self.enter("list", None).await?;

        let drafts = self
            .server
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(DraftPage::new(drafts))
    }

    async fn create(&self, draft: &Draft) -> anyhow::Result<Draft> {
        self.enter("create", None).await?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Draft::from_parts(DraftParts {
            local_id: None,
            remote_id: Some(RemoteId::new(format!("srv-{n}"))?),
            title: draft.title().to_string(),
            content: draft.content().clone(),
            metadata: draft.metadata().cloned(),
            created_at: draft.created_at(),
            updated_at: Utc::now(),
        })?;
        self.server.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, remote_id: &RemoteId, patch: &DraftPatch) -> anyhow::Result<Draft> {
        self.enter("update", Some(remote_id.as_str())).await?;

        let mut server = self.server.lock().unwrap();
        let stored = server
            .iter_mut()
            .find(|d| d.remote_id() == Some(remote_id))
            .ok_or_else(|| anyhow::anyhow!("404 draft {remote_id} not found"))?;
        stored.apply_patch(patch);
        Ok(stored.clone())
    }

    async fn delete(&self, remote_id: &RemoteId) -> anyhow::Result<()> {
        self.enter("delete", Some(remote_id.as_str())).await?;

        let mut server = self.server.lock().unwrap();
        let before = server.len();
        server.retain(|d| d.remote_id() != Some(remote_id));
        if server.len() == before {
            anyhow::bail!("404 draft {remote_id} not found");
        }
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<MemoryDraftStore>,
    pub engine: Arc<SyncEngine>,
    pub manager: DraftLifecycleManager,
}

/// Wires an engine and manager over `gateway` and a store holding `local`
pub fn harness(gateway: FakeGateway, local: Vec<Draft>) -> Harness {
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryDraftStore::with_drafts(local));
    let config = ConfigBuilder::new()
        .sync_page_size(2)
        .sync_remote_timeout_secs(5)
        .build();
    let engine = Arc::new(SyncEngine::new(gateway.clone(), store.clone(), &config));
    let manager = DraftLifecycleManager::new(engine.clone());

    Harness {
        gateway,
        store,
        engine,
        manager,
    }
}
