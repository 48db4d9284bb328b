//! Happy-path tests for the four gateway operations

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use draftsync_core::domain::{Draft, DraftMetadata, DraftPatch, RemoteId};
use draftsync_core::ports::IRemoteGateway;

use crate::common::{mount_list, server_draft, setup_drafts_mock};

#[tokio::test]
async fn test_list_returns_drafts_with_remote_ids() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_list(
        &server,
        vec![server_draft("s1", "First"), server_draft("s2", "Second")],
    )
    .await;

    let page = gateway.list(0, 100).await.unwrap();

    assert_eq!(page.drafts.len(), 2);
    assert_eq!(page.drafts[0].remote_id().unwrap().as_str(), "s1");
    assert_eq!(page.drafts[1].title(), "Second");
    assert_eq!(page.drafts[0].template(), Some("blog"));
}

#[tokio::test]
async fn test_list_sends_offset_and_limit() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("GET"))
        .and(path("/drafts"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"drafts": []})))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway.list(20, 10).await.unwrap();

    assert!(page.drafts.is_empty());
}

#[tokio::test]
async fn test_list_normalizes_string_metadata() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_list(
        &server,
        vec![json!({"id": 7, "title": "Legacy", "metadata": "{\"wordCount\": 340}"})],
    )
    .await;

    let page = gateway.list(0, 100).await.unwrap();

    assert_eq!(page.drafts[0].remote_id().unwrap().as_str(), "7");
    assert_eq!(page.drafts[0].word_count(), 340);
}

#[tokio::test]
async fn test_create_posts_draft_and_returns_server_record() {
    let (server, gateway) = setup_drafts_mock().await;
    let draft = Draft::new(
        "Launch",
        json!({"body": "We are live"}),
        Some(DraftMetadata::for_text("We are live", Some("blog".into()))),
    );
    let local_id = draft.local_id().unwrap().as_str().to_string();

    Mock::given(method("POST"))
        .and(path("/drafts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "srv-9",
            "localId": local_id,
            "title": "Launch",
            "content": {"body": "We are live"},
            "metadata": {"wordCount": 3, "template": "blog"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway.create(&draft).await.unwrap();

    assert_eq!(created.remote_id().unwrap().as_str(), "srv-9");
    assert_eq!(created.local_id(), draft.local_id());
    assert_eq!(created.word_count(), 3);
}

#[tokio::test]
async fn test_update_patches_only_given_fields() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("PATCH"))
        .and(path("/drafts/s1"))
        .and(body_json(json!({"title": "New Title"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_draft("s1", "New Title")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = gateway
        .update(
            &RemoteId::new("s1").unwrap(),
            &DraftPatch::new().with_title("New Title"),
        )
        .await
        .unwrap();

    assert_eq!(updated.title(), "New Title");
    assert_eq!(updated.remote_id().unwrap().as_str(), "s1");
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/drafts/s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway.delete(&RemoteId::new("s1").unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_delete_escapes_reserved_characters_in_id() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/drafts/a%3Fb%23c"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway.delete(&RemoteId::new("a?b#c").unwrap()).await.unwrap();
}
