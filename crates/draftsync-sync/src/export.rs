//! Export snapshot of the visible draft list

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use draftsync_core::domain::Draft;

/// File name prefix of export snapshots
pub const EXPORT_PREFIX: &str = "ai-drafts-";

/// A serialized, dated copy of the visible list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSnapshot {
    /// `ai-drafts-<YYYY-MM-DD>.json`
    pub file_name: String,
    /// Pretty-printed JSON array of drafts
    pub contents: String,
    pub draft_count: usize,
}

impl ExportSnapshot {
    /// Serializes `drafts` as an export dated `date`
    pub fn from_drafts(drafts: &[Draft], date: NaiveDate) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: format!("{EXPORT_PREFIX}{}.json", date.format("%Y-%m-%d")),
            contents: serde_json::to_string_pretty(drafts)?,
            draft_count: drafts.len(),
        })
    }

    /// Writes the snapshot into `directory`, returning the file path
    pub fn write_to(&self, directory: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(directory)?;
        let path = directory.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}
