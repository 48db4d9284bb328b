//! New and edit commands - Local composition of drafts
//!
//! Both commands only touch the local store: `new` creates a draft with a
//! fresh local ID, `edit` autosaves changes to an existing one. Neither is
//! propagated to the server; use `save` or `update` for that.

use anyhow::{bail, Result};
use clap::Args;
use draftsync_core::domain::{Draft, DraftMetadata, DraftPatch};
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::output::{display_id, get_formatter, OutputFormat};

/// Field flags shared by `edit` and `update`
#[derive(Debug, Default, Args)]
pub struct DraftFields {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New body text
    #[arg(long)]
    pub body: Option<String>,
    /// Template or category tag
    #[arg(long)]
    pub template: Option<String>,
}

impl DraftFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.template.is_none()
    }

    /// Builds the patch these flags describe, relative to `current` if known
    ///
    /// Changing the body or template recomputes the metadata so statistics
    /// stay in step with the content.
    pub fn to_patch(&self, current: Option<&Draft>) -> DraftPatch {
        let mut patch = DraftPatch::new();

        if let Some(title) = &self.title {
            patch = patch.with_title(title.clone());
        }

        if let Some(body) = &self.body {
            let base = current.map(Draft::content).unwrap_or(&Value::Null);
            patch = patch.with_content(with_body(base, body));
        }

        if self.body.is_some() || self.template.is_some() {
            let text = match &self.body {
                Some(body) => body.clone(),
                None => current.map(|d| body_text(d.content())).unwrap_or_default(),
            };
            let template = self
                .template
                .clone()
                .or_else(|| current.and_then(Draft::template).map(str::to_string));

            let mut metadata = DraftMetadata::for_text(&text, template);
            if let Some(existing) = current.and_then(Draft::metadata) {
                metadata.extra = existing.extra.clone();
            }
            patch = patch.with_metadata(metadata);
        }

        patch
    }
}

/// Replaces the `body` of a content object, keeping its other keys
pub fn with_body(content: &Value, body: &str) -> Value {
    match content {
        Value::Object(map) => {
            let mut map = map.clone();
            map.insert("body".to_string(), Value::String(body.to_string()));
            Value::Object(map)
        }
        _ => json!({ "body": body }),
    }
}

/// Text of the `body` field, or empty if there is none
pub fn body_text(content: &Value) -> String {
    content
        .get("body")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// new
// ============================================================================

#[derive(Debug, Args)]
pub struct NewCommand {
    /// Draft title
    #[arg(long)]
    pub title: String,
    /// Body text
    #[arg(long, default_value = "")]
    pub body: String,
    /// Template or category tag
    #[arg(long)]
    pub template: Option<String>,
}

impl NewCommand {
    pub fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let metadata = DraftMetadata::for_text(&self.body, self.template.clone());
        let draft = ctx
            .manager
            .create(self.title.clone(), json!({ "body": self.body }), Some(metadata));

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&draft)?);
        } else {
            formatter.success(&format!("Created draft {}", display_id(&draft)));
        }
        Ok(())
    }
}

// ============================================================================
// edit
// ============================================================================

#[derive(Debug, Args)]
pub struct EditCommand {
    /// Local or remote ID of the draft
    pub id: String,
    #[command(flatten)]
    pub fields: DraftFields,
}

impl EditCommand {
    pub fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        if self.fields.is_empty() {
            bail!("Nothing to change: pass --title, --body or --template");
        }

        let mut draft = ctx.find(&self.id)?;
        draft.apply_patch(&self.fields.to_patch(Some(&draft)));
        ctx.manager.autosave(draft.clone());

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::to_value(&draft)?);
        } else {
            formatter.success(&format!("Saved {} locally", display_id(&draft)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Draft {
        Draft::new(
            "Post",
            json!({"body": "one two three", "params": {"tone": "dry"}}),
            Some(DraftMetadata::for_text("one two three", Some("blog".into()))),
        )
    }

    #[test]
    fn test_title_only_patch_leaves_content_alone() {
        let fields = DraftFields {
            title: Some("Renamed".into()),
            ..Default::default()
        };

        let patch = fields.to_patch(Some(&existing()));

        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert!(patch.content.is_none());
        assert!(patch.metadata.is_none());
    }

    #[test]
    fn test_body_patch_keeps_params_and_recounts_words() {
        let fields = DraftFields {
            body: Some("just two".into()),
            ..Default::default()
        };

        let patch = fields.to_patch(Some(&existing()));

        let content = patch.content.unwrap();
        assert_eq!(content["body"], "just two");
        assert_eq!(content["params"]["tone"], "dry");
        let metadata = patch.metadata.unwrap();
        assert_eq!(metadata.word_count, 2);
        assert_eq!(metadata.template.as_deref(), Some("blog"));
    }

    #[test]
    fn test_template_patch_keeps_word_count() {
        let fields = DraftFields {
            template: Some("email".into()),
            ..Default::default()
        };

        let metadata = fields.to_patch(Some(&existing())).metadata.unwrap();

        assert_eq!(metadata.word_count, 3);
        assert_eq!(metadata.template.as_deref(), Some("email"));
    }

    #[test]
    fn test_patch_without_current_draft() {
        let fields = DraftFields {
            body: Some("hello world".into()),
            ..Default::default()
        };

        let patch = fields.to_patch(None);

        assert_eq!(patch.content.unwrap(), json!({"body": "hello world"}));
        assert_eq!(patch.metadata.unwrap().word_count, 2);
    }

    #[test]
    fn test_body_text_of_non_object() {
        assert_eq!(body_text(&json!("plain")), "");
        assert_eq!(body_text(&json!({"body": "x"})), "x");
    }
}
