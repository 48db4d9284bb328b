//! Draft lifecycle manager
//!
//! The single mutation surface used by presentation code. Local effects are
//! unconditional and synchronous. Remote effects are issued only when the
//! caller passes an authenticated [`Session`].
//!
//! | Operation   | Remote failure while authenticated        |
//! |-------------|-------------------------------------------|
//! | `autosave`  | never remote                              |
//! | `save`      | degrades to the local draft               |
//! | `update`    | surfaced, local entry left unchanged      |
//! | `delete`    | surfaced, local entry left in place       |
//! | `duplicate` | as `save`                                 |

use std::sync::Arc;

use chrono::Utc;
use draftsync_core::domain::{
    Draft, DraftMetadata, DraftPatch, DraftRef, DraftStats, Session,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::engine::SyncEngine;
use crate::export::ExportSnapshot;
use crate::local::{remove, supersede, upsert};
use crate::SyncError;

/// Create, save, update, delete, duplicate, export and stats over drafts
#[derive(Debug, Clone)]
pub struct DraftLifecycleManager {
    engine: Arc<SyncEngine>,
}

impl DraftLifecycleManager {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// The current visible list
    pub fn visible(&self) -> Vec<Draft> {
        self.engine.visible()
    }

    /// Looks up a draft by either identifier
    pub fn find(&self, draft_ref: &DraftRef) -> Option<Draft> {
        self.engine.local().find(draft_ref)
    }

    /// Turns an identifier of unknown axis into a typed reference
    pub fn resolve(&self, raw: &str) -> Option<DraftRef> {
        DraftRef::resolve(raw, &self.visible())
    }

    /// Builds a new draft and autosaves it
    pub fn create(
        &self,
        title: impl Into<String>,
        content: Value,
        metadata: Option<DraftMetadata>,
    ) -> Draft {
        let draft = Draft::new(title, content, metadata);
        self.autosave(draft.clone());
        info!(draft = %draft_label(&draft), "Created draft");
        draft
    }

    /// Upserts `draft` into the local list without touching the server
    ///
    /// A draft lacking both identifiers is given a local ID first.
    /// Returns the updated list.
    #[instrument(skip(self, draft), fields(title = draft.title()))]
    pub fn autosave(&self, mut draft: Draft) -> Vec<Draft> {
        draft.ensure_identity();
        self.engine.local().modify(|drafts| {
            upsert(drafts, draft);
            drafts.clone()
        })
    }

    /// Saves locally, then creates or overwrites the server copy
    ///
    /// Returns the server-confirmed record on success. Without a session, or
    /// if the remote call fails, returns the local draft as given.
    #[instrument(skip(self, draft), fields(title = draft.title(), authenticated = session.is_authenticated()))]
    pub async fn save(&self, session: &Session, mut draft: Draft) -> Draft {
        draft.ensure_identity();
        self.engine
            .local()
            .modify(|drafts| upsert(drafts, draft.clone()));

        if !session.is_authenticated() {
            debug!("Not authenticated, saved locally only");
            return draft;
        }

        let result = match draft.remote_id() {
            Some(remote_id) => {
                self.engine
                    .remote_update(remote_id, &DraftPatch::overwrite(&draft))
                    .await
            }
            None => self.engine.remote_create(&draft).await,
        };

        match result {
            Ok(mut confirmed) => {
                confirmed.inherit_local_id(&draft);
                self.engine
                    .local()
                    .modify(|drafts| supersede(drafts, &draft, confirmed.clone()));
                info!(draft = %draft_label(&confirmed), "Saved draft to server");
                confirmed
            }
            Err(e) => {
                warn!(draft = %draft_label(&draft), error = %e, "Remote save failed, kept local copy");
                draft
            }
        }
    }

    /// Applies a partial update
    ///
    /// While authenticated the patch is sent to the server first; if that
    /// fails the error is returned and the local entry is not modified. A
    /// draft that has never reached the server is patched locally only.
    ///
    /// # Errors
    /// `SyncError::NotFound` if no draft matches and there is no remote ID to
    /// address, or the remote error/timeout.
    #[instrument(skip(self, patch), fields(authenticated = session.is_authenticated()))]
    pub async fn update(
        &self,
        session: &Session,
        draft_ref: &DraftRef,
        patch: &DraftPatch,
    ) -> Result<Draft, SyncError> {
        let current = self.find(draft_ref);
        let remote_id = current
            .as_ref()
            .and_then(Draft::remote_id)
            .or_else(|| draft_ref.as_remote())
            .cloned();

        let remote_id = match (session.is_authenticated(), remote_id) {
            (true, Some(remote_id)) => remote_id,
            _ => {
                let mut draft = current.ok_or_else(|| SyncError::NotFound(draft_ref.clone()))?;
                draft.apply_patch(patch);
                self.engine
                    .local()
                    .modify(|drafts| upsert(drafts, draft.clone()));
                debug!(draft = %draft_label(&draft), "Updated draft locally");
                return Ok(draft);
            }
        };

        let mut confirmed = self.engine.remote_update(&remote_id, patch).await?;
        let previous = match current {
            Some(current) => {
                confirmed.inherit_local_id(&current);
                current
            }
            None => confirmed.clone(),
        };
        self.engine
            .local()
            .modify(|drafts| supersede(drafts, &previous, confirmed.clone()));

        info!(draft = %draft_label(&confirmed), "Updated draft on server");
        Ok(confirmed)
    }

    /// Deletes a draft from the server (when authenticated) and locally
    ///
    /// # Errors
    /// `SyncError::NotFound` if nothing matches, or the remote error/timeout,
    /// in which case the local entry is kept.
    #[instrument(skip(self), fields(authenticated = session.is_authenticated()))]
    pub async fn delete(&self, session: &Session, draft_ref: &DraftRef) -> Result<(), SyncError> {
        let current = self.find(draft_ref);
        let remote_id = current
            .as_ref()
            .and_then(Draft::remote_id)
            .or_else(|| draft_ref.as_remote())
            .cloned();

        match (session.is_authenticated(), &remote_id) {
            (true, Some(remote_id)) => {
                self.engine.remote_delete(remote_id).await?;
                info!(%remote_id, "Deleted draft on server");
            }
            _ if current.is_none() => return Err(SyncError::NotFound(draft_ref.clone())),
            _ => {}
        }

        let removed = self
            .engine
            .local()
            .modify(|drafts| remove(drafts, current.as_ref(), draft_ref));
        debug!(removed, "Removed draft locally");
        Ok(())
    }

    /// Copies a draft under a new identity and saves the copy
    ///
    /// # Errors
    /// `SyncError::NotFound` if the source does not exist.
    pub async fn duplicate(&self, session: &Session, draft_ref: &DraftRef) -> Result<Draft, SyncError> {
        let source = self
            .find(draft_ref)
            .ok_or_else(|| SyncError::NotFound(draft_ref.clone()))?;
        let copy = source.duplicate();
        info!(source = %draft_ref, copy = %draft_label(&copy), "Duplicating draft");
        Ok(self.save(session, copy).await)
    }

    /// Serializes the visible list into a dated snapshot
    ///
    /// # Errors
    /// `SyncError::Serialization` if a draft cannot be encoded.
    pub fn export(&self) -> Result<ExportSnapshot, SyncError> {
        let drafts = self.visible();
        Ok(ExportSnapshot::from_drafts(&drafts, Utc::now().date_naive())?)
    }

    /// Aggregates word counts and template tags over the visible list
    pub fn get_stats(&self) -> DraftStats {
        DraftStats::from_drafts(&self.visible())
    }
}

fn draft_label(draft: &Draft) -> String {
    draft
        .draft_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "<unidentified>".to_string())
}
