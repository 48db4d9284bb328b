//! draftsync Store - Device-local draft persistence
//!
//! Durable storage for the full list of drafts known to this device,
//! independent of authentication state.
//!
//! ## Architecture
//!
//! This crate implements the `IDraftStore` port from `draftsync-core`.
//! It is a driven (secondary) adapter in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`JsonFileStore`] - Key-value JSON file with atomic replace-on-write
//! - [`MemoryDraftStore`] - In-process store for tests and ephemeral sessions
//! - [`record`] - Lenient decoding of stored records into `Draft`s
//! - [`StoreError`] - Error types for store I/O
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use draftsync_core::ports::IDraftStore;
//! use draftsync_store::JsonFileStore;
//!
//! let store = JsonFileStore::new(PathBuf::from("/home/user/.local/share/draftsync/drafts.json"));
//! let drafts = store.read_all();
//! store.write_all(&drafts);
//! ```

pub mod file;
pub mod memory;
pub mod record;

pub use file::JsonFileStore;
pub use memory::MemoryDraftStore;

/// Errors that can occur during store I/O
///
/// These never cross the `IDraftStore` boundary; adapters log them and
/// recover.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON of the expected shape
    #[error("Malformed store document: {0}")]
    Malformed(String),

    /// Serialization of the draft list failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
