//! Draft domain entity
//!
//! A [`Draft`] is a user-authored document that may exist locally only,
//! remotely only, or in both stores. It is identified by the pair
//! (`local_id`, `remote_id`), at least one of which is always present.
//!
//! ## Identity
//!
//! ```text
//!   local only            synced               remote only
//!  ┌───────────┐  save  ┌──────────────┐     ┌────────────┐
//!  │ local_id  │ ─────► │ local_id     │     │ remote_id  │
//!  │           │        │ + remote_id  │     │            │
//!  └───────────┘        └──────────────┘     └────────────┘
//! ```
//!
//! Uniqueness holds independently on each axis: within one visible set no two
//! drafts share a local ID, and no two share a remote ID.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::DomainError;
use super::newtypes::{LocalId, RemoteId};

/// Suffix appended to the title of a duplicated draft
pub const COPY_SUFFIX: &str = " (Copy)";

// ============================================================================
// DraftMetadata
// ============================================================================

/// Derived attributes used for statistics
///
/// Unknown keys are kept in `extra` so that round-tripping a record through
/// this engine never loses fields written by other clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMetadata {
    /// Number of words in the draft body
    #[serde(default)]
    pub word_count: u64,
    /// Template or category tag the draft was generated from
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Any other attributes, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DraftMetadata {
    /// Builds metadata for a plain-text body, counting whitespace-separated words
    pub fn for_text(text: &str, template: Option<String>) -> Self {
        Self {
            word_count: text.split_whitespace().count() as u64,
            template,
            extra: Map::new(),
        }
    }

    /// Normalizes a raw metadata value into structured form
    ///
    /// Accepts either an embedded object or a JSON-encoded string holding one.
    /// Returns `None` for null, empty, or unparseable values.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            Value::String(raw) if raw.trim().is_empty() => None,
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(inner @ Value::Object(_)) => serde_json::from_value(inner).ok(),
                _ => None,
            },
            _ => None,
        }
    }
}

// ============================================================================
// DraftRef
// ============================================================================

/// A typed reference to a draft on one of its two identifier axes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftRef {
    /// Addressed by the device-assigned identifier
    Local(LocalId),
    /// Addressed by the server-assigned identifier
    Remote(RemoteId),
}

impl DraftRef {
    /// Resolves an untyped identifier held by presentation code
    ///
    /// The local axis is checked before the remote one. Returns `None` when
    /// no draft in `drafts` carries `raw` on either axis.
    pub fn resolve(raw: &str, drafts: &[Draft]) -> Option<Self> {
        if let Some(id) = drafts
            .iter()
            .filter_map(Draft::local_id)
            .find(|id| id.as_str() == raw)
        {
            return Some(Self::Local(id.clone()));
        }

        drafts
            .iter()
            .filter_map(Draft::remote_id)
            .find(|id| id.as_str() == raw)
            .map(|id| Self::Remote(id.clone()))
    }

    /// Returns the remote identifier if this reference is on the remote axis
    pub fn as_remote(&self) -> Option<&RemoteId> {
        match self {
            Self::Remote(id) => Some(id),
            Self::Local(_) => None,
        }
    }
}

impl fmt::Display for DraftRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "local:{id}"),
            Self::Remote(id) => write!(f, "remote:{id}"),
        }
    }
}

// ============================================================================
// DraftPatch
// ============================================================================

/// A partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DraftMetadata>,
}

impl DraftPatch {
    /// Creates an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content body
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets the metadata
    pub fn with_metadata(mut self, metadata: DraftMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// A patch that overwrites every mutable field with the draft's values
    pub fn overwrite(draft: &Draft) -> Self {
        Self {
            title: Some(draft.title.clone()),
            content: Some(draft.content.clone()),
            metadata: draft.metadata.clone(),
        }
    }

    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.metadata.is_none()
    }
}

// ============================================================================
// Draft
// ============================================================================

/// Field-level constructor input for [`Draft::from_parts`]
///
/// Adapters decode their own wire or storage formats into this struct and
/// let the domain enforce the identity invariant.
#[derive(Debug, Clone)]
pub struct DraftParts {
    pub local_id: Option<LocalId>,
    pub remote_id: Option<RemoteId>,
    pub title: String,
    pub content: Value,
    pub metadata: Option<DraftMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user-authored draft document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Device-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_id: Option<LocalId>,
    /// Server-assigned identifier, present once persisted remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remote_id: Option<RemoteId>,
    /// Display title
    #[serde(default)]
    title: String,
    /// Opaque document body and generation parameters
    #[serde(default)]
    content: Value,
    /// Derived attributes for statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<DraftMetadata>,
    /// Client-assigned creation instant
    created_at: DateTime<Utc>,
    /// Client-assigned last modification instant
    updated_at: DateTime<Utc>,
}

impl Draft {
    /// Creates a new local draft with a freshly generated local ID
    pub fn new(title: impl Into<String>, content: Value, metadata: Option<DraftMetadata>) -> Self {
        let now = Utc::now();
        Self {
            local_id: Some(LocalId::generate()),
            remote_id: None,
            title: title.into(),
            content,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a draft from its parts
    ///
    /// # Errors
    /// Returns `DomainError::MissingIdentity` if neither identifier is present
    pub fn from_parts(parts: DraftParts) -> Result<Self, DomainError> {
        if parts.local_id.is_none() && parts.remote_id.is_none() {
            return Err(DomainError::MissingIdentity);
        }

        Ok(Self {
            local_id: parts.local_id,
            remote_id: parts.remote_id,
            title: parts.title,
            content: parts.content,
            metadata: parts.metadata,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    // --- Getters ---

    pub fn local_id(&self) -> Option<&LocalId> {
        self.local_id.as_ref()
    }

    pub fn remote_id(&self) -> Option<&RemoteId> {
        self.remote_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn metadata(&self) -> Option<&DraftMetadata> {
        self.metadata.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the draft carries both identifiers
    pub fn is_synced(&self) -> bool {
        self.local_id.is_some() && self.remote_id.is_some()
    }

    /// Returns true if at least one identifier is present
    pub fn has_identity(&self) -> bool {
        self.local_id.is_some() || self.remote_id.is_some()
    }

    /// Word count from metadata, zero when absent
    pub fn word_count(&self) -> u64 {
        self.metadata.as_ref().map_or(0, |m| m.word_count)
    }

    /// Template/category tag from metadata
    pub fn template(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.template.as_deref())
    }

    // --- Identity ---

    /// Returns true if both drafts share a local ID or a remote ID
    pub fn same_identity(&self, other: &Draft) -> bool {
        let local = matches!(
            (&self.local_id, &other.local_id),
            (Some(a), Some(b)) if a == b
        );
        let remote = matches!(
            (&self.remote_id, &other.remote_id),
            (Some(a), Some(b)) if a == b
        );
        local || remote
    }

    /// Returns true if this draft is the one addressed by `draft_ref`
    pub fn matches_ref(&self, draft_ref: &DraftRef) -> bool {
        match draft_ref {
            DraftRef::Local(id) => self.local_id.as_ref() == Some(id),
            DraftRef::Remote(id) => self.remote_id.as_ref() == Some(id),
        }
    }

    /// The most specific reference to this draft (local axis preferred)
    pub fn draft_ref(&self) -> Option<DraftRef> {
        self.local_id
            .clone()
            .map(DraftRef::Local)
            .or_else(|| self.remote_id.clone().map(DraftRef::Remote))
    }

    /// Assigns a fresh local ID if the draft has no identity at all
    ///
    /// Returns true if an ID was assigned.
    pub fn ensure_identity(&mut self) -> bool {
        if self.has_identity() {
            return false;
        }
        self.local_id = Some(LocalId::generate());
        true
    }

    /// Keeps this device's local ID on a record returned by the server
    pub fn inherit_local_id(&mut self, from: &Draft) {
        if self.local_id.is_none() {
            self.local_id = from.local_id.clone();
        }
    }

    // --- Mutations ---

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_content(&mut self, content: Value) {
        self.content = content;
        self.touch();
    }

    pub fn set_metadata(&mut self, metadata: Option<DraftMetadata>) {
        self.metadata = metadata;
        self.touch();
    }

    /// Applies a partial update and stamps the modification time
    pub fn apply_patch(&mut self, patch: &DraftPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(metadata) = &patch.metadata {
            self.metadata = Some(metadata.clone());
        }
        self.touch();
    }

    /// Produces an independent copy with a new identity and fresh timestamps
    pub fn duplicate(&self) -> Draft {
        let now = Utc::now();
        Draft {
            local_id: Some(LocalId::generate()),
            remote_id: None,
            title: format!("{}{COPY_SUFFIX}", self.title),
            content: self.content.clone(),
            metadata: self.metadata.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
