//! HTTP API integration tests
//!
//! Auth, profile, friend request, search and history endpoints against
//! in-memory storage.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{create_test_user, test_server, test_state};

#[tokio::test]
async fn test_root_reports_running() {
    let server = test_server(&test_state());
    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "API is running");
}

#[tokio::test]
async fn test_register_validation() {
    let server = test_server(&test_state());

    let response = server
        .post("/auth/register")
        .json(&json!({ "name": "Alice", "email": "" , "password": "pw" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Fields are missing");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;

    let response = server
        .post("/auth/register")
        .json(&json!({ "name": "Other", "email": alice.email, "password": "pw" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Email is already taken");
}

#[tokio::test]
async fn test_register_returns_public_user() {
    let server = test_server(&test_state());
    let response = server
        .post("/auth/register")
        .json(&json!({ "name": "Alice", "email": "alice@example.com", "password": "pw" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "User registered");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_errors() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "pw" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Email is not registered");

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": alice.email, "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Password is incorrect");
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;

    assert_eq!(server.get("/auth/me").await.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        server
            .get("/auth/me")
            .authorization_bearer("not-a-token")
            .await
            .status_code(),
        StatusCode::FORBIDDEN
    );

    let response = server
        .get("/auth/me")
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"], alice.id.to_string());
    assert_eq!(body["name"], "Alice");
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_invalidates() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;

    let response = server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": alice.refresh_token }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let rotated = body["refreshToken"].as_str().unwrap().to_string();
    assert!(body["accessToken"].is_string());
    assert_ne!(rotated, alice.refresh_token);

    // The old token was replaced
    let response = server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": alice.refresh_token }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "Invalid refresh token");

    let response = server
        .post("/auth/logout")
        .json(&json!({ "refreshToken": rotated }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Logged out");

    let response = server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": rotated }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refresh_requires_token() {
    let server = test_server(&test_state());
    let response = server.post("/auth/refresh").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Refresh token required");
}

#[tokio::test]
async fn test_userinfo_and_username() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;

    let response = server
        .get(&format!("/userinfo/{}", alice.id))
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["userInformation"]["name"], "Alice");
    assert_eq!(body["userInformation"]["friendsList"], json!([]));

    let response = server
        .get(&format!("/getUsername/{}", alice.id))
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.json::<Value>()["username"], "Alice");

    let response = server
        .get("/getUsername/not-an-id")
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid ID format");

    let response = server
        .get(&format!("/getUsername/{}", Uuid::new_v4()))
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "User not found");
}

#[tokio::test]
async fn test_friend_request_flow() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let response = server
        .post("/sendFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Friend request sent");

    let response = server
        .post("/sendFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Friend request already exists");

    let bob_info: Value = server
        .get(&format!("/userinfo/{}", bob.id))
        .authorization_bearer(&bob.access_token)
        .await
        .json();
    assert_eq!(
        bob_info["userInformation"]["incomingFriendRequests"][0]["Id"],
        alice.id.to_string()
    );
    assert_eq!(
        bob_info["userInformation"]["incomingFriendRequests"][0]["Name"],
        "Alice"
    );

    let response = server
        .post("/acceptFriendRequest")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "requestId": alice.id, "accepterId": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Friend request accepted");
    assert_eq!(body["friend"]["id"], alice.id.to_string());
    assert_eq!(body["friend"]["name"], "Alice");

    let alice_info: Value = server
        .get(&format!("/userinfo/{}", alice.id))
        .authorization_bearer(&alice.access_token)
        .await
        .json();
    assert_eq!(alice_info["userInformation"]["friendsList"][0]["friendName"], "Bob");
    assert_eq!(alice_info["userInformation"]["outgoingFriendRequests"], json!([]));

    let response = server
        .post("/sendFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.json::<Value>()["error"], "Already friends");
}

#[tokio::test]
async fn test_friend_request_rules() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let response = server
        .post("/sendFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": alice.id }))
        .await;
    assert_eq!(response.json::<Value>()["error"], "Cannot send request to yourself");

    // Alice cannot send on Bob's behalf
    let response = server
        .post("/sendFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": bob.id, "receiverId": alice.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .post("/acceptFriendRequest")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "requestId": alice.id, "accepterId": bob.id }))
        .await;
    assert_eq!(response.json::<Value>()["error"], "Friend request not found");

    let response = server
        .post("/acceptFriendRequest")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "accepterId": bob.id }))
        .await;
    assert_eq!(
        response.json::<Value>()["error"],
        "Both requestId and accepterId are required"
    );
}

#[tokio::test]
async fn test_reject_and_cancel() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;
    let carol = create_test_user(&server, "Carol").await;

    for receiver in [&bob, &carol] {
        server
            .post("/sendFriendRequest")
            .authorization_bearer(&alice.access_token)
            .json(&json!({ "senderId": alice.id, "receiverId": receiver.id }))
            .await;
    }

    let response = server
        .put("/rejectFriendRequest")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "requestId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.json::<Value>()["message"], "Friend request rejected");

    let response = server
        .post("/cancelFriendRequest")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": carol.id }))
        .await;
    assert_eq!(response.json::<Value>()["message"], "Friend request canceled");

    let info: Value = server
        .get(&format!("/userinfo/{}", alice.id))
        .authorization_bearer(&alice.access_token)
        .await
        .json();
    assert_eq!(info["userInformation"]["outgoingFriendRequests"], json!([]));
}

#[tokio::test]
async fn test_search() {
    let server = test_server(&test_state());
    let alice = create_test_user(&server, "Alice").await;
    create_test_user(&server, "Bob").await;

    let response = server
        .get("/search")
        .add_query_param("searchTerm", "ALI")
        .authorization_bearer(&alice.access_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["message"], "Search results found");
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["name"], "Alice");

    let response = server
        .get("/search")
        .add_query_param("searchTerm", alice.id.to_string())
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.json::<Value>()["results"][0]["email"], alice.email);

    let response = server
        .get("/search")
        .add_query_param("searchTerm", "zzz")
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.json::<Value>()["message"], "No users found");

    let response = server
        .get("/search")
        .authorization_bearer(&alice.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Search term is required");
}

#[tokio::test]
async fn test_get_messages_requires_participant() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;
    let eve = create_test_user(&server, "Eve").await;

    let response = server
        .post("/getMessages")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["messages"], json!([]));

    let response = server
        .post("/getMessages")
        .authorization_bearer(&eve.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
