//! Status classification and malformed responses

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use draftsync_core::domain::{Draft, DraftPatch, RemoteId};
use draftsync_core::ports::IRemoteGateway;
use draftsync_remote::RemoteError;

use crate::common::{mount_list, mount_status, server_draft, setup_drafts_mock};

fn classify(err: &anyhow::Error) -> &RemoteError {
    err.downcast_ref::<RemoteError>()
        .expect("gateway errors wrap RemoteError")
}

#[tokio::test]
async fn test_unauthorized_is_classified() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_status(&server, "GET", "/drafts", 401).await;

    let err = gateway.list(0, 10).await.unwrap_err();

    assert!(matches!(classify(&err), RemoteError::Unauthorized(_)));
}

#[tokio::test]
async fn test_missing_draft_is_not_found() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_status(&server, "PATCH", "/drafts/gone", 404).await;

    let err = gateway
        .update(&RemoteId::new("gone").unwrap(), &DraftPatch::new().with_title("x"))
        .await
        .unwrap_err();

    assert!(matches!(classify(&err), RemoteError::NotFound(message) if message == "boom"));
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_status(&server, "DELETE", "/drafts/s1", 503).await;

    let err = gateway.delete(&RemoteId::new("s1").unwrap()).await.unwrap_err();

    assert!(matches!(classify(&err), RemoteError::ServerError(_)));
}

#[tokio::test]
async fn test_other_client_error_is_rejected() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_status(&server, "GET", "/drafts", 422).await;

    let err = gateway.list(0, 10).await.unwrap_err();

    assert!(matches!(
        classify(&err),
        RemoteError::Rejected { status: 422, .. }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("GET"))
        .and(path("/drafts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = gateway.list(0, 10).await.unwrap_err();

    assert!(matches!(classify(&err), RemoteError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreadable_records_are_skipped_not_fatal() {
    let (server, gateway) = setup_drafts_mock().await;
    mount_list(
        &server,
        vec![
            server_draft("s1", "Good"),
            json!({"title": "no id"}),
            json!({"id": "", "title": "empty id"}),
            json!({"id": "a/b", "title": "slash id"}),
            json!({"id": "s2", "createdAt": "soon"}),
        ],
    )
    .await;

    let page = gateway.list(0, 10).await.unwrap();

    assert_eq!(page.drafts.len(), 1);
    assert_eq!(page.drafts[0].remote_id().unwrap().as_str(), "s1");
    assert_eq!(page.skipped, 4);
    assert_eq!(page.received(), 5);
}

#[tokio::test]
async fn test_create_response_without_id_is_invalid() {
    let (server, gateway) = setup_drafts_mock().await;
    Mock::given(method("POST"))
        .and(path("/drafts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"title": "no id"})))
        .mount(&server)
        .await;

    let err = gateway
        .create(&Draft::new("A", json!({}), None))
        .await
        .unwrap_err();

    assert!(matches!(classify(&err), RemoteError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let (server, gateway) = setup_drafts_mock().await;
    drop(server);

    let err = gateway.list(0, 10).await.unwrap_err();

    assert!(matches!(classify(&err), RemoteError::Network(_)));
}
