//! draftsync Remote - HTTP gateway to the drafts server of record
//!
//! Provides an async client for the drafts REST API and an
//! `IRemoteGateway` implementation on top of it.
//!
//! ## Endpoints
//!
//! | Call     | Request                              | Response            |
//! |----------|--------------------------------------|---------------------|
//! | `list`   | `GET /drafts?offset=..&limit=..`     | `{"drafts": [...]}` |
//! | `create` | `POST /drafts`                       | draft               |
//! | `update` | `PATCH /drafts/{id}`                 | draft               |
//! | `delete` | `DELETE /drafts/{id}`                | empty               |
//!
//! ## Modules
//!
//! - [`client`] - Typed HTTP client (bearer auth, status classification)
//! - [`wire`] - JSON shapes exchanged with the server
//! - [`gateway`] - `IRemoteGateway` adapter

pub mod client;
pub mod gateway;
pub mod wire;

pub use client::DraftsClient;
pub use gateway::HttpRemoteGateway;

use thiserror::Error;

/// Errors that can occur when talking to the drafts API
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Credentials are missing, invalid, or expired (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed draft does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request (other 4xx)
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A request URL could not be built from the configured base URL
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}
