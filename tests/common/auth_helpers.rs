//! Authentication test helpers
//!
//! Provides utilities for creating test users through the HTTP API and
//! holding on to their tokens.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Register a user and log them in
pub async fn create_test_user(server: &TestServer, name: &str) -> TestUser {
    let email = format!("{}_{}@example.com", name.to_lowercase(), Uuid::new_v4().simple());
    let password = "test_password_123".to_string();

    let response = server
        .post("/auth/register")
        .json(&json!({ "name": name, "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "register failed: {}", response.text());

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "login failed: {}", response.text());
    let body: Value = response.json();

    TestUser {
        id: body["user"]["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("login response carries the user id"),
        name: name.to_string(),
        email,
        password,
        access_token: body["accessToken"].as_str().unwrap().to_string(),
        refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
    }
}
