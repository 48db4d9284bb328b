//! Lenient decoding of stored draft records
//!
//! Stored data may predate the current model: metadata serialized as a
//! string, identifiers stored as numbers or padded with whitespace,
//! timestamps in other formats or missing entirely. Everything is normalized
//! here so consumers only ever see a well-formed [`Draft`].
//!
//! A field that cannot be interpreted falls back to a default; it never
//! costs the whole record. Entries that are not draft objects at all are
//! left for [`unrecognized_records`] so a write-back can carry them over.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use draftsync_core::domain::{Draft, DraftMetadata, DraftParts, LocalId, RemoteId};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Naive formats accepted for timestamps that are not RFC 3339
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Numeric timestamps above this are taken as milliseconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// On-disk shape of a draft, accepting every historical variant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDraft {
    #[serde(default)]
    local_id: Value,
    #[serde(default)]
    remote_id: Value,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    created_at: Value,
    #[serde(default)]
    updated_at: Value,
}

/// Turns a stored identifier into a string, treating empty values as absent
fn id_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn title_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Interprets a stored timestamp, returning `None` if it cannot be read
fn parse_timestamp(field: &str, value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Null => return None,
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(|n| {
            if n.abs() >= MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            }
        }),
        _ => None,
    };

    if parsed.is_none() {
        warn!(field, value = %value, "Unreadable stored timestamp, using a default");
    }
    parsed
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether a stored entry is a draft object this module can decode
pub fn is_draft_record(value: &Value) -> bool {
    value.is_object()
}

/// Decodes a single stored record found at `position` in the list
///
/// Returns `None` only when the entry is not a draft object. A record
/// lacking both identifiers is given a local ID derived from its position
/// and contents, so repeated reads of an unchanged store agree on it.
pub fn decode_draft(position: usize, value: Value) -> Option<Draft> {
    if !is_draft_record(&value) {
        warn!(position, "Skipping stored entry that is not a draft object");
        return None;
    }

    let seed = format!("{position}:{value}");
    let stored: StoredDraft = match serde_json::from_value(value) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(position, error = %e, "Skipping undecodable stored draft");
            return None;
        }
    };

    let mut local_id = id_string(stored.local_id).and_then(|id| LocalId::new(id).ok());
    let remote_id = id_string(stored.remote_id).and_then(|id| RemoteId::new(id).ok());

    if local_id.is_none() && remote_id.is_none() {
        let assigned = LocalId::derived(seed.as_bytes());
        warn!(position, local_id = %assigned, "Stored draft had no identifier, assigned a local ID");
        local_id = Some(assigned);
    }

    let created = parse_timestamp("createdAt", &stored.created_at);
    let updated = parse_timestamp("updatedAt", &stored.updated_at);
    let created_at = created.or(updated).unwrap_or_else(Utc::now);
    let updated_at = updated.unwrap_or(created_at);

    Draft::from_parts(DraftParts {
        local_id,
        remote_id,
        title: title_string(stored.title),
        content: stored.content,
        metadata: DraftMetadata::from_value(stored.metadata),
        created_at,
        updated_at,
    })
    .ok()
}

/// Decodes a stored list, skipping entries that are not drafts
///
/// Anything other than an array yields an empty list.
pub fn decode_list(value: Value) -> Vec<Draft> {
    match value {
        Value::Array(records) => records
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| decode_draft(position, record))
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(kind = %value_kind(&other), "Stored draft list is not an array, ignoring");
            Vec::new()
        }
    }
}

/// Entries of a stored list that [`decode_list`] skips
pub fn unrecognized_records(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records
            .iter()
            .filter(|record| !is_draft_record(record))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
