//! Shared helpers for drafts API integration tests
//!
//! Each helper mounts mock endpoints on a wiremock server and returns a
//! client pointing at it.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use draftsync_remote::{DraftsClient, HttpRemoteGateway};

pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a (MockServer, HttpRemoteGateway) tuple
pub async fn setup_drafts_mock() -> (MockServer, HttpRemoteGateway) {
    let server = MockServer::start().await;
    let client = DraftsClient::new(server.uri()).with_access_token(TEST_TOKEN);
    (server, HttpRemoteGateway::new(client))
}

/// A server-side draft body
pub fn server_draft(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": {"body": title},
        "metadata": {"wordCount": 2, "template": "blog"},
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z"
    })
}

/// Mounts `GET /drafts` answering every page with `drafts`
pub async fn mount_list(server: &MockServer, drafts: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/drafts"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "drafts": drafts })))
        .mount(server)
        .await;
}

/// Mounts any method on `route` answering with `status` and a text body
pub async fn mount_status(server: &MockServer, http_method: &str, route: &str, status: u16) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("boom"))
        .mount(server)
        .await;
}
