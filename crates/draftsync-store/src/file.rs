//! JSON file store (secondary/driven adapter)
//!
//! Implements [`IDraftStore`] on top of a single JSON document holding a
//! key-value map. The draft list lives under [`DRAFTS_KEY`]; other keys are
//! preserved untouched on write.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: The document is written to a sibling temp file and
//!   renamed over the old one, so readers never see half a list.
//! - **Never fails outward**: Missing, unreadable, or malformed files read as
//!   an empty list; write errors are logged.
//! - **Never loses records**: List entries that cannot be decoded are written
//!   back untouched, and an unparseable file is copied to `<path>.corrupt`
//!   before it is replaced.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use draftsync_core::domain::Draft;
use draftsync_core::ports::{IDraftStore, DRAFTS_KEY};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::record::{decode_list, unrecognized_records};
use crate::StoreError;

/// Draft store backed by a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes file access between threads sharing this store
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`; the file need not exist yet
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            io_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole key-value document
    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Malformed("top-level value is not an object".into())),
            Err(e) => Err(StoreError::Malformed(e.to_string())),
        }
    }

    /// Writes the document via a temporary file and rename
    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = {
            let mut p = self.path.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        let data = serde_json::to_vec_pretty(document)?;
        debug!(?tmp_path, bytes = data.len(), "writing to temporary file");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Moves an unparseable document aside before it is replaced
    fn preserve_corrupt(&self) -> Result<(), StoreError> {
        let mut backup = self.path.as_os_str().to_owned();
        backup.push(".corrupt");
        let backup = PathBuf::from(backup);
        std::fs::copy(&self.path, &backup)?;
        warn!(?backup, "Draft store was unreadable, kept a copy before overwriting");
        Ok(())
    }

    fn replace_drafts(&self, drafts: &[Draft]) -> Result<(), StoreError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(StoreError::Malformed(reason)) => {
                debug!(%reason, "replacing malformed document");
                self.preserve_corrupt()?;
                Map::new()
            }
            Err(e) => return Err(e),
        };

        // Entries this version cannot read are carried over, never dropped
        let kept = document
            .get(DRAFTS_KEY)
            .map(unrecognized_records)
            .unwrap_or_default();
        if !kept.is_empty() {
            debug!(count = kept.len(), "carrying over unrecognized entries");
        }

        let mut records = drafts
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        records.extend(kept);

        document.insert(DRAFTS_KEY.to_string(), Value::Array(records));
        self.write_document(&document)
    }
}

impl IDraftStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read_all(&self) -> Vec<Draft> {
        let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match self.read_document() {
            Ok(mut document) => {
                let drafts = decode_list(document.remove(DRAFTS_KEY).unwrap_or(Value::Null));
                debug!(count = drafts.len(), "read drafts");
                drafts
            }
            Err(e) => {
                warn!(error = %e, "Failed to read draft store, treating as empty");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, drafts), fields(path = %self.path.display(), count = drafts.len()))]
    fn write_all(&self, drafts: &[Draft]) {
        let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.replace_drafts(drafts) {
            warn!(error = %e, "Failed to write draft store");
        }
    }
}
