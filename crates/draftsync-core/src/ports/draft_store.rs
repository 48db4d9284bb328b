//! Draft store port (driven/secondary port)
//!
//! This module defines the interface for the device-local record holding
//! every draft known to this device, independent of authentication state.
//!
//! ## Design Notes
//!
//! - Methods are synchronous: a read or write runs to completion without
//!   interleaving with other local operations.
//! - There is no partial-update API. Callers read the whole list, modify it,
//!   and write the whole list back.
//! - Failures never reach the caller. Unreadable or missing data reads as an
//!   empty list; write failures are logged by the adapter.

use crate::domain::Draft;

/// Well-known key under which the draft list is persisted
pub const DRAFTS_KEY: &str = "drafts";

/// Port trait for the device-local draft list
pub trait IDraftStore: Send + Sync {
    /// Returns the persisted list, or an empty list if none exists or the
    /// stored value cannot be parsed
    fn read_all(&self) -> Vec<Draft>;

    /// Replaces the persisted list with `drafts`
    ///
    /// This is an overwrite, not a merge.
    fn write_all(&self, drafts: &[Draft]);
}
