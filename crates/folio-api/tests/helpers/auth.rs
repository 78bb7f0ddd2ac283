use axum_test::TestServer;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "correct-horse";

pub async fn register_user(client: &TestServer, username: &str) {
    let response = client
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
}

/// Register `username` and return a bearer token for it.
pub async fn register_and_login(client: &TestServer, username: &str) -> String {
    register_user(client, username).await;

    let response = client
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["accessToken"].as_str().unwrap().to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
