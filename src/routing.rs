//! Application router configuration.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    AppState,
    account::{
        bulk_delete_accounts_endpoint, create_account_endpoint, delete_account_endpoint,
        edit_account_endpoint, get_account_endpoint, list_accounts_endpoint,
    },
    auth::{AuthState, identity_middleware},
    endpoints,
    not_found::get_404_not_found,
    response::Data,
};

/// Return a router with all the app's routes.
///
/// The identity middleware runs for every route. Handlers that need a
/// verified user reject requests without one.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::BULK_DELETE_ACCOUNTS,
            post(bulk_delete_accounts_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .patch(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn_with_state(
            auth_state,
            identity_middleware,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

/// Report that the server is up.
async fn get_health() -> Data<Health> {
    Data::new(Health { status: "ok" })
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, must_issue_token},
    };

    #[tokio::test]
    async fn health_does_not_need_user() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        response.assert_json(&json!({"data": {"status": "ok"}}));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status_not_found();
        response.assert_json(&json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn every_account_route_requires_user() {
        let server = get_test_server();
        let account = format_endpoint(endpoints::ACCOUNT, "abc");

        let responses = [
            server.get(endpoints::ACCOUNTS).await,
            server.get(&account).await,
            server
                .post(endpoints::ACCOUNTS)
                .json(&json!({"name": "Checking"}))
                .await,
            server
                .post(endpoints::BULK_DELETE_ACCOUNTS)
                .json(&json!({"ids": ["abc"]}))
                .await,
            server
                .patch(&account)
                .json(&json!({"name": "Savings"}))
                .await,
            server.delete(&account).await,
        ];

        for response in responses {
            response.assert_status_unauthorized();
            response.assert_json(&json!({"error": "Unauthorized"}));
        }
    }

    #[tokio::test]
    async fn user_check_comes_before_body_validation() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ACCOUNTS)
            .json(&json!({"name": ""}))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn checking_and_savings_scenario() {
        let server = get_test_server();
        let u1 = format!("Bearer {}", must_issue_token("u1"));
        let u2 = format!("Bearer {}", must_issue_token("u2"));

        let created: Value = server
            .post(endpoints::ACCOUNTS)
            .add_header("authorization", u1.clone())
            .json(&json!({"name": "Checking"}))
            .await
            .json();
        let id = created["data"]["id"]
            .as_str()
            .expect("created account has no id")
            .to_owned();
        assert_eq!(created["data"]["name"], "Checking");
        assert_eq!(created["data"]["userId"], "u1");
        assert_eq!(created["data"]["externalLinkId"], Value::Null);

        server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", u1.clone())
            .await
            .assert_json(&json!({"data": [{"id": id, "name": "Checking"}]}));

        server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", u2.clone())
            .await
            .assert_json(&json!({"data": []}));

        let account = format_endpoint(endpoints::ACCOUNT, &id);
        server
            .get(&account)
            .add_header("authorization", u1.clone())
            .await
            .assert_json(&json!({"data": {"id": id, "name": "Checking"}}));

        let updated: Value = server
            .patch(&account)
            .add_header("authorization", u1.clone())
            .json(&json!({"name": "Savings"}))
            .await
            .json();
        assert_eq!(updated["data"]["id"], id.as_str());
        assert_eq!(updated["data"]["name"], "Savings");

        server
            .delete(&account)
            .add_header("authorization", u1.clone())
            .await
            .assert_json(&json!({"data": {"id": id}}));

        let response = server
            .get(&account)
            .add_header("authorization", u1.clone())
            .await;
        response.assert_status_not_found();
        response.assert_json(&json!({"error": "Account not found"}));

        server
            .delete(&account)
            .add_header("authorization", u1)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn other_user_cannot_touch_account() {
        let server = get_test_server();
        let owner = format!("Bearer {}", must_issue_token("owner"));
        let mallory = format!("Bearer {}", must_issue_token("mallory"));
        let created: Value = server
            .post(endpoints::ACCOUNTS)
            .add_header("authorization", owner.clone())
            .json(&json!({"name": "Checking"}))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_owned();
        let account = format_endpoint(endpoints::ACCOUNT, &id);

        server
            .get(&account)
            .add_header("authorization", mallory.clone())
            .await
            .assert_status_not_found();
        server
            .patch(&account)
            .add_header("authorization", mallory.clone())
            .json(&json!({"name": "Pwned"}))
            .await
            .assert_status_not_found();
        server
            .delete(&account)
            .add_header("authorization", mallory.clone())
            .await
            .assert_status_not_found();
        server
            .post(endpoints::BULK_DELETE_ACCOUNTS)
            .add_header("authorization", mallory)
            .json(&json!({"ids": [id]}))
            .await
            .assert_json(&json!({"data": []}));

        server
            .get(&account)
            .add_header("authorization", owner)
            .await
            .assert_json(&json!({"data": {"id": id, "name": "Checking"}}));
    }

    async fn must_create_account(
        server: &TestServer,
        authorization: &str,
        name: &str,
    ) -> String {
        let created: Value = server
            .post(endpoints::ACCOUNTS)
            .add_header("authorization", authorization.to_owned())
            .json(&json!({"name": name}))
            .await
            .json();

        created["data"]["id"]
            .as_str()
            .expect("created account has no id")
            .to_owned()
    }

    #[tokio::test]
    async fn bulk_delete_returns_deleted_subset() {
        let server = get_test_server();
        let u1 = format!("Bearer {}", must_issue_token("u1"));
        let u2 = format!("Bearer {}", must_issue_token("u2"));
        let mine = must_create_account(&server, &u1, "Checking").await;
        let theirs = must_create_account(&server, &u2, "Savings").await;

        let response = server
            .post(endpoints::BULK_DELETE_ACCOUNTS)
            .add_header("authorization", u1)
            .json(&json!({"ids": [mine, theirs, "missing"]}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"data": [{"id": mine}]}));
        server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", u2)
            .await
            .assert_json(&json!({"data": [{"id": theirs, "name": "Savings"}]}));
    }

    #[tokio::test]
    async fn invalid_bodies_are_bad_requests() {
        let server = get_test_server();
        let token = format!("Bearer {}", must_issue_token("u1"));

        let cases = [
            (endpoints::ACCOUNTS, json!({}), "name is required"),
            (endpoints::ACCOUNTS, json!({"name": 7}), "name must be a string"),
            (endpoints::ACCOUNTS, json!({"name": "  "}), "name must not be empty"),
            (
                endpoints::BULK_DELETE_ACCOUNTS,
                json!({"ids": "abc"}),
                "ids must be an array of strings",
            ),
            (endpoints::BULK_DELETE_ACCOUNTS, json!({}), "ids is required"),
        ];

        for (path, body, want_error) in cases {
            let response = server
                .post(path)
                .add_header("authorization", token.clone())
                .json(&body)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({"error": want_error}));
        }
    }

    #[tokio::test]
    async fn invalid_rename_bodies_are_bad_requests() {
        let server = get_test_server();
        let token = format!("Bearer {}", must_issue_token("u1"));
        let id = must_create_account(&server, &token, "Checking").await;
        let account = format_endpoint(endpoints::ACCOUNT, &id);

        let cases = [
            (json!({}), "name is required"),
            (json!({"name": 7}), "name must be a string"),
            (json!({"name": "  "}), "name must not be empty"),
        ];

        for (body, want_error) in cases {
            let response = server
                .patch(&account)
                .add_header("authorization", token.clone())
                .json(&body)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({"error": want_error}));
        }

        server
            .get(&account)
            .add_header("authorization", token)
            .await
            .assert_json(&json!({"data": {"id": id, "name": "Checking"}}));
    }

    #[tokio::test]
    async fn bulk_delete_route_only_accepts_post() {
        let server = get_test_server();
        let token = format!("Bearer {}", must_issue_token("u1"));

        server
            .get(endpoints::BULK_DELETE_ACCOUNTS)
            .add_header("authorization", token)
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let server = get_test_server();
        let token = format!("Bearer {}", must_issue_token("u1"));

        let response = server
            .post(endpoints::ACCOUNTS)
            .add_header("authorization", token)
            .add_header("content-type", "application/json")
            .bytes("{\"name\": ".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
