//! In-memory draft store
//!
//! Holds the list in process memory. Used by tests and by sessions that
//! must not touch disk.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use draftsync_core::domain::Draft;
use draftsync_core::ports::IDraftStore;

/// Draft store backed by a `Vec` behind a mutex
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: Mutex<Vec<Draft>>,
    writes: AtomicUsize,
}

impl MemoryDraftStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `drafts`
    pub fn with_drafts(drafts: Vec<Draft>) -> Self {
        Self {
            drafts: Mutex::new(drafts),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `write_all` calls made so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl IDraftStore for MemoryDraftStore {
    fn read_all(&self) -> Vec<Draft> {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_all(&self, drafts: &[Draft]) {
        *self.drafts.lock().unwrap_or_else(PoisonError::into_inner) = drafts.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}
