//! Aggregate statistics over a draft set

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::draft::Draft;

/// Bucket for drafts whose metadata carries no template tag
pub const UNTAGGED: &str = "untagged";

/// Word and template counts over a set of drafts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStats {
    pub total_drafts: u64,
    pub total_words: u64,
    pub drafts_by_type: BTreeMap<String, u64>,
}

impl DraftStats {
    /// Aggregates metadata word counts and template tags
    pub fn from_drafts(drafts: &[Draft]) -> Self {
        let mut stats = Self::default();

        for draft in drafts {
            stats.total_drafts += 1;
            stats.total_words += draft.word_count();

            let tag = draft.template().unwrap_or(UNTAGGED);
            *stats.drafts_by_type.entry(tag.to_string()).or_insert(0) += 1;
        }

        stats
    }
}
