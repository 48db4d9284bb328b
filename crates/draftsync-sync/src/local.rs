//! Serialized access to the device-local draft list
//!
//! Every mutation is a read-modify-write of the whole list. [`LocalDrafts`]
//! holds a lock across each cycle so two writers on different threads cannot
//! interleave and lose an update. The lock is never held across an await.

use std::sync::{Arc, Mutex, PoisonError};

use draftsync_core::domain::{Draft, DraftRef};
use draftsync_core::ports::IDraftStore;
use tracing::debug;

/// Read-modify-write wrapper around an [`IDraftStore`]
pub struct LocalDrafts {
    store: Arc<dyn IDraftStore>,
    lock: Mutex<()>,
}

impl LocalDrafts {
    pub fn new(store: Arc<dyn IDraftStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Current persisted list
    pub fn snapshot(&self) -> Vec<Draft> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.read_all()
    }

    /// Finds the draft addressed by `draft_ref`
    pub fn find(&self, draft_ref: &DraftRef) -> Option<Draft> {
        self.snapshot()
            .into_iter()
            .find(|draft| draft.matches_ref(draft_ref))
    }

    /// Reads the list, lets `f` change it, and writes the result back
    pub fn modify<R>(&self, f: impl FnOnce(&mut Vec<Draft>) -> R) -> R {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut drafts = self.store.read_all();
        let result = f(&mut drafts);
        self.store.write_all(&drafts);
        result
    }
}

impl std::fmt::Debug for LocalDrafts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDrafts").finish_non_exhaustive()
    }
}

/// Inserts `draft`, replacing whatever entry shares its identity
pub fn upsert(drafts: &mut Vec<Draft>, draft: Draft) {
    let previous = draft.clone();
    supersede(drafts, &previous, draft);
}

/// Replaces every entry matching `previous` or `replacement` with `replacement`
///
/// The replacement takes the position of the first match. Later matches are
/// removed so neither identifier axis ends up duplicated. With no match the
/// replacement is inserted at the front.
pub fn supersede(drafts: &mut Vec<Draft>, previous: &Draft, replacement: Draft) {
    let matches = |d: &Draft| d.same_identity(previous) || d.same_identity(&replacement);

    match drafts.iter().position(matches) {
        Some(index) => {
            let mut i = 0;
            drafts.retain(|d| {
                let keep = i <= index || !matches(d);
                i += 1;
                keep
            });
            debug!(index, "replacing existing draft");
            drafts[index] = replacement;
        }
        None => {
            debug!("inserting new draft");
            drafts.insert(0, replacement);
        }
    }
}

/// Removes every entry matching `target` or `draft_ref`, returning how many were removed
pub fn remove(drafts: &mut Vec<Draft>, target: Option<&Draft>, draft_ref: &DraftRef) -> usize {
    let before = drafts.len();
    drafts.retain(|d| {
        let by_ref = d.matches_ref(draft_ref);
        let by_identity = target.is_some_and(|t| d.same_identity(t));
        !(by_ref || by_identity)
    });
    before - drafts.len()
}
