//! JSON shapes exchanged with the drafts API
//!
//! The server names its identifier `id`; it becomes the draft's remote ID.
//! Metadata may arrive either as an object or as a JSON-encoded string and
//! is normalized on the way in.

use chrono::{DateTime, Utc};
use draftsync_core::domain::{Draft, DraftMetadata, DraftParts, DraftPatch, LocalId, RemoteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RemoteError;

/// A draft as returned by the server
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDraft {
    /// Server-assigned identifier, string or number
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub local_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WireDraft {
    /// Reads one draft record from a response body
    pub fn decode(value: Value) -> Result<Draft, RemoteError> {
        serde_json::from_value::<WireDraft>(value)
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?
            .into_draft()
    }

    /// Converts into a domain draft carrying the server ID
    pub fn into_draft(self) -> Result<Draft, RemoteError> {
        let id = match self.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(RemoteError::InvalidResponse(format!(
                    "draft id must be a string or number, got {other}"
                )))
            }
        };
        let remote_id =
            RemoteId::new(id).map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        let local_id = self
            .local_id
            .filter(|id| !id.trim().is_empty())
            .and_then(|id| LocalId::new(id).ok());

        let created_at = self.created_at.or(self.updated_at).unwrap_or_else(Utc::now);
        let updated_at = self.updated_at.unwrap_or(created_at);

        Draft::from_parts(DraftParts {
            local_id,
            remote_id: Some(remote_id),
            title: self.title.unwrap_or_default(),
            content: self.content,
            metadata: DraftMetadata::from_value(self.metadata),
            created_at,
            updated_at,
        })
        .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

/// Body of `GET /drafts`
///
/// Records are kept raw so one unreadable entry does not fail the page.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub drafts: Vec<Value>,
}

/// Body of `POST /drafts`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<&'a str>,
    pub title: &'a str,
    pub content: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a DraftMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Draft> for CreateBody<'a> {
    fn from(draft: &'a Draft) -> Self {
        Self {
            local_id: draft.local_id().map(LocalId::as_str),
            title: draft.title(),
            content: draft.content(),
            metadata: draft.metadata(),
            created_at: draft.created_at(),
            updated_at: draft.updated_at(),
        }
    }
}

/// Body of `PATCH /drafts/{id}`; absent fields are left unchanged
#[derive(Debug, Serialize)]
pub struct PatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a DraftMetadata>,
}

impl<'a> From<&'a DraftPatch> for PatchBody<'a> {
    fn from(patch: &'a DraftPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            content: patch.content.as_ref(),
            metadata: patch.metadata.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: Value) -> WireDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_id_becomes_remote_id() {
        let draft = wire(json!({"id": "s1", "title": "Server Draft"}))
            .into_draft()
            .unwrap();

        assert_eq!(draft.remote_id().unwrap().as_str(), "s1");
        assert!(draft.local_id().is_none());
        assert_eq!(draft.title(), "Server Draft");
    }

    #[test]
    fn test_numeric_id_and_string_metadata() {
        let draft = wire(json!({
            "id": 17,
            "metadata": "{\"wordCount\": 42, \"template\": \"email\"}"
        }))
        .into_draft()
        .unwrap();

        assert_eq!(draft.remote_id().unwrap().as_str(), "17");
        assert_eq!(draft.word_count(), 42);
        assert_eq!(draft.template(), Some("email"));
    }

    #[test]
    fn test_echoed_local_id_is_kept() {
        let draft = wire(json!({"id": "s1", "localId": "a"})).into_draft().unwrap();
        assert_eq!(draft.local_id().unwrap().as_str(), "a");
    }

    #[test]
    fn test_missing_or_bad_id_is_invalid() {
        assert!(wire(json!({"title": "x"})).into_draft().is_err());
        assert!(matches!(
            wire(json!({"id": ""})).into_draft(),
            Err(RemoteError::InvalidResponse(_))
        ));
        assert!(wire(json!({"id": {"nested": true}})).into_draft().is_err());
    }

    #[test]
    fn test_decode_reports_bad_timestamps() {
        let result = WireDraft::decode(json!({"id": "s1", "createdAt": "soon"}));
        assert!(matches!(result, Err(RemoteError::InvalidResponse(_))));
    }

    #[test]
    fn test_patch_body_omits_unset_fields() {
        let patch = DraftPatch::new().with_title("New Title");
        let body = serde_json::to_value(PatchBody::from(&patch)).unwrap();
        assert_eq!(body, json!({"title": "New Title"}));
    }

    #[test]
    fn test_create_body_carries_local_id() {
        let draft = Draft::new("A", json!({"body": "hi"}), None);
        let body = serde_json::to_value(CreateBody::from(&draft)).unwrap();

        assert_eq!(body["localId"], draft.local_id().unwrap().as_str());
        assert_eq!(body["content"]["body"], "hi");
        assert!(body.get("metadata").is_none());
    }
}
