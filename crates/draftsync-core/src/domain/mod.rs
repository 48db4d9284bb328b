//! Domain entities and business logic
//!
//! This module contains the core domain types for draftsync:
//! - Newtypes for type-safe identifiers
//! - The draft entity, its patch and reference types
//! - Session and sync status state machine
//! - Aggregate statistics
//! - Domain-specific error types

pub mod draft;
pub mod errors;
pub mod newtypes;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use draft::{Draft, DraftMetadata, DraftParts, DraftPatch, DraftRef, COPY_SUFFIX};
pub use errors::DomainError;
pub use newtypes::*;
pub use session::{Session, SessionEvent, SyncStatus};
pub use stats::DraftStats;
