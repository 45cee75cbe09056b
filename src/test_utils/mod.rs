#![allow(missing_docs)]

use axum::response::Response;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::Value;
use time::Duration;

use crate::{AppState, TokenIssuer, UserId, build_router, db::initialize};

pub(crate) const TEST_SECRET: &str = "averysecretsecret";

/// An in-memory database with all the tables created.
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory database connection");
    initialize(&connection).expect("Could not initialize database");

    connection
}

pub(crate) async fn must_read_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not JSON")
}

/// A session token for `user_id` signed with [TEST_SECRET].
pub(crate) fn must_issue_token(user_id: &str) -> String {
    let user_id = UserId::new(user_id).expect("Invalid test user ID");

    TokenIssuer::new(TEST_SECRET)
        .issue(&user_id, Duration::minutes(5))
        .expect("Could not issue test token")
}

/// A test server around the full router, backed by an in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory database connection");
    let state = AppState::new(connection, TEST_SECRET).expect("Could not create app state");

    TestServer::new(build_router(state)).expect("Could not create test server.")
}
