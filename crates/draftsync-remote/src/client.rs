//! Drafts API HTTP client
//!
//! Provides a typed HTTP client for the drafts REST API. Handles the bearer
//! header, endpoint construction, status classification and JSON decoding.
//! Requests are sent once; retries are the caller's concern.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use draftsync_remote::client::DraftsClient;
//!
//! # async fn example() -> Result<(), draftsync_remote::RemoteError> {
//! let client = DraftsClient::new("https://drafts.example.com/api").with_access_token("token");
//! let page = client.list_drafts(0, 100).await?;
//! println!("{} drafts on first page", page.drafts.len());
//! # Ok(())
//! # }
//! ```

use draftsync_core::domain::{Draft, DraftPatch, RemoteId};
use draftsync_core::ports::DraftPage;
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::wire::{CreateBody, ListResponse, PatchBody, WireDraft};
use crate::RemoteError;

/// Path of the drafts collection, relative to the base URL
const DRAFTS_PATH: &str = "/drafts";

/// HTTP client for the drafts API
#[derive(Debug, Clone)]
pub struct DraftsClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests, without a trailing slash
    base_url: String,
    /// Bearer token; requests go out unauthenticated without one
    access_token: Option<String>,
}

impl DraftsClient {
    /// Creates a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Sets the bearer token sent with every request
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Updates the access token (e.g., after the user signs in again)
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
        debug!("Updated DraftsClient access token");
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a request builder for `path`, adding the bearer header if set
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// URL of a single draft, with the ID percent-encoded as one path segment
    pub fn draft_url(&self, remote_id: &RemoteId) -> Result<Url, RemoteError> {
        let collection = format!("{}{DRAFTS_PATH}", self.base_url);
        let mut url =
            Url::parse(&collection).map_err(|e| RemoteError::InvalidUrl(format!("{collection}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(collection.clone()))?
            .push(remote_id.as_str());
        Ok(url)
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    /// `GET /drafts?offset=..&limit=..`
    ///
    /// Records that cannot be read are skipped with a warning and counted in
    /// [`DraftPage::skipped`].
    pub async fn list_drafts(&self, offset: u32, limit: u32) -> Result<DraftPage, RemoteError> {
        debug!(offset, limit, "Listing drafts");

        let response = self
            .request(Method::GET, DRAFTS_PATH)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        let body: ListResponse = decode(check_status(response).await?).await?;

        let mut page = DraftPage::default();
        for (position, record) in body.drafts.into_iter().enumerate() {
            match WireDraft::decode(record) {
                Ok(draft) => page.drafts.push(draft),
                Err(e) => {
                    warn!(offset, position, error = %e, "Skipping unreadable draft in list response");
                    page.skipped += 1;
                }
            }
        }
        Ok(page)
    }

    /// `POST /drafts`
    pub async fn create_draft(&self, draft: &Draft) -> Result<Draft, RemoteError> {
        debug!(title = draft.title(), "Creating draft");

        let response = self
            .request(Method::POST, DRAFTS_PATH)
            .json(&CreateBody::from(draft))
            .send()
            .await?;
        let created: WireDraft = decode(check_status(response).await?).await?;
        created.into_draft()
    }

    /// `PATCH /drafts/{id}`
    pub async fn update_draft(
        &self,
        remote_id: &RemoteId,
        patch: &DraftPatch,
    ) -> Result<Draft, RemoteError> {
        debug!(%remote_id, "Updating draft");

        let response = self
            .authorized(Method::PATCH, self.draft_url(remote_id)?)
            .json(&PatchBody::from(patch))
            .send()
            .await?;
        let updated: WireDraft = decode(check_status(response).await?).await?;
        updated.into_draft()
    }

    /// `DELETE /drafts/{id}`
    pub async fn delete_draft(&self, remote_id: &RemoteId) -> Result<(), RemoteError> {
        debug!(%remote_id, "Deleting draft");

        let response = self
            .authorized(Method::DELETE, self.draft_url(remote_id)?)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Maps non-success statuses to [`RemoteError`] variants
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(message),
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        s if s.is_server_error() => RemoteError::ServerError(message),
        s => RemoteError::Rejected {
            status: s.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}
