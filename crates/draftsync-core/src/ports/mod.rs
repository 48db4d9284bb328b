//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDraftStore`] - Durable, synchronous device-local draft list
//! - [`IRemoteGateway`] - Create/read/update/delete against the server of record

pub mod draft_store;
pub mod remote_gateway;

pub use draft_store::{IDraftStore, DRAFTS_KEY};
pub use remote_gateway::{DraftPage, IRemoteGateway};
