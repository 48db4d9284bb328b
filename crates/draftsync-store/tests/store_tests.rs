//! Integration tests for the draft store adapters
//!
//! These exercise the stores through the `IDraftStore` port, the way the
//! sync engine uses them.

use std::sync::Arc;

use serde_json::json;

use draftsync_core::domain::{Draft, DraftMetadata};
use draftsync_core::ports::IDraftStore;
use draftsync_store::{JsonFileStore, MemoryDraftStore};

fn sample_drafts() -> Vec<Draft> {
    vec![
        Draft::new(
            "Launch post",
            json!({"body": "We are live", "params": {"tone": "upbeat"}}),
            Some(DraftMetadata::for_text("We are live", Some("blog".into()))),
        ),
        Draft::new("Follow-up", json!({"body": "Thanks"}), None),
    ]
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    let drafts = sample_drafts();

    {
        let store: Arc<dyn IDraftStore> = Arc::new(JsonFileStore::new(path.clone()));
        store.write_all(&drafts);
    }

    let reopened: Arc<dyn IDraftStore> = Arc::new(JsonFileStore::new(path));
    let read = reopened.read_all();

    assert_eq!(read, drafts);
    assert_eq!(read[0].word_count(), 3);
    assert_eq!(read[0].template(), Some("blog"));
}

#[test]
fn test_file_store_layout_uses_well_known_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    let store = JsonFileStore::new(path.clone());

    store.write_all(&sample_drafts());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let first = &raw["drafts"][0];
    assert!(first["localId"].is_string());
    assert_eq!(first["title"], "Launch post");
    assert_eq!(first["metadata"]["wordCount"], 3);
    assert!(first["createdAt"].is_string());
}

#[test]
fn test_stores_agree_on_behaviour() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<Arc<dyn IDraftStore>> = vec![
        Arc::new(JsonFileStore::new(dir.path().join("drafts.json"))),
        Arc::new(MemoryDraftStore::new()),
    ];

    for store in stores {
        assert!(store.read_all().is_empty());

        let drafts = sample_drafts();
        store.write_all(&drafts);
        assert_eq!(store.read_all(), drafts);

        store.write_all(&drafts[..1]);
        assert_eq!(store.read_all().len(), 1);
    }
}
