//! Registration, login and the authentication gate.
//!
//! Run with: `cargo test -p folio-api --test auth_test`

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::auth::{bearer, register_and_login, register_user, TEST_PASSWORD};
use folio_db::ProfileRepository;
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_creates_account_and_empty_profile() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["profileCreated"], true);
    assert!(app.state.profiles.exists_by_owner("alice").await.unwrap());
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let app = setup_test_app().await;
    let client = app.client();
    register_user(client, "alice").await;

    let same_username = client
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    same_username.assert_status(StatusCode::BAD_REQUEST);

    let same_email = client
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    same_email.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_reserved_and_unsafe_usernames() {
    let app = setup_test_app().await;
    let client = app.client();

    for username in ["anonymous", "Anonymous", "../etc", "a b c", "x"] {
        let response = client
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": "someone@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "username {:?} should be refused",
            username
        );
    }
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = setup_test_app().await;
    let client = app.client();
    register_user(client, "alice").await;

    let response = client
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 24 * 60 * 60);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["hasProfile"], true);

    let token = body["accessToken"].as_str().unwrap();
    let identity = app.state.codec.verify(token).unwrap();
    assert_eq!(identity.subject(), "alice");
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = setup_test_app().await;
    let client = app.client();
    register_user(client, "alice").await;

    let wrong_password = client
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "not-the-password" }))
        .await;
    let unknown_user = client
        .post("/api/auth/login")
        .json(&json!({ "username": "bob", "password": TEST_PASSWORD }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);
    let a: Value = wrong_password.json();
    let b: Value = unknown_user.json();
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_invalid_token_degrades_to_anonymous() {
    let app = setup_test_app().await;
    let client = app.client();

    // Public endpoints still answer.
    let ping = client
        .get("/api/files/ping")
        .add_header("Authorization", bearer("not.a.token"))
        .await;
    ping.assert_status_ok();

    // Protected ones see an anonymous caller.
    let profile = client
        .get("/api/profile")
        .add_header("Authorization", bearer("not.a.token"))
        .await;
    profile.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_anonymous() {
    let app = setup_test_app().await;
    let client = app.client();
    register_user(client, "alice").await;

    let token = app
        .state
        .codec
        .issue_at("alice", Utc::now() - Duration::hours(25))
        .unwrap();

    let response = client
        .get("/api/profile")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_anonymous() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = app.state.codec.issue("ghost").unwrap();
    let response = client
        .get("/api/profile/exists")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_protected_routes() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = register_and_login(client, "alice").await;

    let response = client
        .get("/api/profile/exists")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["hasProfile"], true);
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "Local");
}
