//! Integration tests for draftsync-remote
//!
//! Uses wiremock to simulate the drafts API and verifies end-to-end
//! behavior of the DraftsClient and the HttpRemoteGateway adapter.

mod common;

mod test_errors;
mod test_gateway;
