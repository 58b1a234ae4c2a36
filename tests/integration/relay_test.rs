//! Relay integration tests
//!
//! Users are created through the HTTP API; relay sessions are opened
//! directly on the shared engine and history is read back over HTTP.

use palchat::backend::relay::{ConnectionHandle, FrameOutcome, SessionState};
use palchat::shared::ServerEvent;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{create_test_user, test_server, test_state};

fn register_frame(user_id: Uuid) -> String {
    json!({ "type": "register", "userId": user_id }).to_string()
}

fn chat_frame(from: Uuid, to: Uuid, text: &str) -> String {
    json!({ "type": "chat", "from": from, "to": to, "messageText": text }).to_string()
}

#[tokio::test]
async fn test_online_recipient_gets_alert_and_history() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let (alice_handle, _alice_rx) = ConnectionHandle::channel(8);
    let (bob_handle, mut bob_rx) = ConnectionHandle::channel(8);
    let mut alice_session = state.relay.open_session(alice_handle);
    let mut bob_session = state.relay.open_session(bob_handle);

    assert_eq!(
        alice_session.handle_frame(&register_frame(alice.id)).await,
        FrameOutcome::Registered(alice.id)
    );
    assert_eq!(
        bob_session.handle_frame(&register_frame(bob.id)).await,
        FrameOutcome::Registered(bob.id)
    );

    assert_eq!(
        alice_session.handle_frame(&chat_frame(alice.id, bob.id, "hi bob")).await,
        FrameOutcome::Delivered
    );

    let alert = bob_rx.try_recv().expect("bob receives an alert");
    let ServerEvent::NewMessageAlert {
        from,
        message_text,
        timestamp,
    } = alert;
    assert_eq!(from, alice.id);
    assert_eq!(message_text, "hi bob");

    // Either participant can read the history, in either order
    let response = server
        .post("/getMessages")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "senderId": bob.id, "receiverId": alice.id }))
        .await;
    let body: Value = response.json();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], alice.id.to_string());
    assert_eq!(messages[0]["messageText"], "hi bob");

    let stored = state.conversations.history(alice.id, bob.id).await.unwrap();
    assert_eq!(stored[0].timestamp_millis(), timestamp);
}

#[tokio::test]
async fn test_offline_recipient_message_is_stored() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let (handle, _rx) = ConnectionHandle::channel(8);
    let mut session = state.relay.open_session(handle);
    session.handle_frame(&register_frame(alice.id)).await;

    assert_eq!(
        session.handle_frame(&chat_frame(alice.id, bob.id, "you there?")).await,
        FrameOutcome::Stored
    );

    let response = server
        .post("/getMessages")
        .authorization_bearer(&alice.access_token)
        .json(&json!({ "senderId": alice.id, "receiverId": bob.id }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["messages"][0]["messageText"], "you there?");
}

#[tokio::test]
async fn test_history_keeps_send_order() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let (alice_handle, _alice_rx) = ConnectionHandle::channel(8);
    let (bob_handle, _bob_rx) = ConnectionHandle::channel(8);
    let mut alice_session = state.relay.open_session(alice_handle);
    let mut bob_session = state.relay.open_session(bob_handle);
    alice_session.handle_frame(&register_frame(alice.id)).await;
    bob_session.handle_frame(&register_frame(bob.id)).await;

    alice_session.handle_frame(&chat_frame(alice.id, bob.id, "one")).await;
    bob_session.handle_frame(&chat_frame(bob.id, alice.id, "two")).await;
    alice_session.handle_frame(&chat_frame(alice.id, bob.id, "three")).await;

    let texts: Vec<String> = state
        .conversations
        .history(bob.id, alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.message_text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_malformed_and_unknown_events_keep_session_usable() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let (handle, _rx) = ConnectionHandle::channel(8);
    let mut session = state.relay.open_session(handle);
    session.handle_frame(&register_frame(alice.id)).await;

    assert_eq!(
        session.handle_frame(r#"{"type":"unknown"}"#).await,
        FrameOutcome::Discarded("malformed event")
    );
    assert_eq!(
        session.handle_frame("not json").await,
        FrameOutcome::Discarded("malformed event")
    );
    assert_eq!(
        session.handle_frame(&chat_frame(alice.id, bob.id, "   ")).await,
        FrameOutcome::Discarded("malformed event")
    );
    assert!(matches!(session.state(), SessionState::Registered { .. }));

    assert_eq!(
        session.handle_frame(&chat_frame(alice.id, bob.id, "still here")).await,
        FrameOutcome::Stored
    );
}

#[tokio::test]
async fn test_unregistered_and_forged_chats_are_dropped() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;
    let eve = create_test_user(&server, "Eve").await;

    let (handle, _rx) = ConnectionHandle::channel(8);
    let mut session = state.relay.open_session(handle);
    assert_eq!(
        session.handle_frame(&chat_frame(alice.id, bob.id, "hi")).await,
        FrameOutcome::Discarded("not registered")
    );

    session.handle_frame(&register_frame(eve.id)).await;
    assert_eq!(
        session.handle_frame(&chat_frame(alice.id, bob.id, "hi")).await,
        FrameOutcome::Discarded("sender mismatch")
    );

    assert!(state.conversations.history(alice.id, bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_unknown_user_is_ignored() {
    let state = test_state();
    let unknown = Uuid::new_v4();

    let (handle, _rx) = ConnectionHandle::channel(8);
    let mut session = state.relay.open_session(handle);
    assert_eq!(
        session.handle_frame(&register_frame(unknown)).await,
        FrameOutcome::UnknownUser(unknown)
    );
    assert_eq!(session.state(), &SessionState::Unregistered);
    assert!(state.relay.registry().lookup(unknown).is_none());
}

#[tokio::test]
async fn test_newer_connection_replaces_binding() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;
    let bob = create_test_user(&server, "Bob").await;

    let (first, mut first_rx) = ConnectionHandle::channel(8);
    let (second, mut second_rx) = ConnectionHandle::channel(8);
    let (sender, _sender_rx) = ConnectionHandle::channel(8);
    let mut old_session = state.relay.open_session(first);
    let mut new_session = state.relay.open_session(second);
    let mut alice_session = state.relay.open_session(sender);

    old_session.handle_frame(&register_frame(bob.id)).await;
    new_session.handle_frame(&register_frame(bob.id)).await;
    alice_session.handle_frame(&register_frame(alice.id)).await;

    // Closing the stale connection must not unbind the newer one
    old_session.close();
    assert!(state.relay.registry().lookup(bob.id).is_some());

    assert_eq!(
        alice_session.handle_frame(&chat_frame(alice.id, bob.id, "hello")).await,
        FrameOutcome::Delivered
    );
    assert!(second_rx.try_recv().is_ok());
    assert!(first_rx.try_recv().is_err());

    new_session.close();
    assert!(state.relay.registry().lookup(bob.id).is_none());
    assert_eq!(
        alice_session.handle_frame(&chat_frame(alice.id, bob.id, "gone?")).await,
        FrameOutcome::Stored
    );
}

#[tokio::test]
async fn test_closed_session_ignores_frames() {
    let state = test_state();
    let server = test_server(&state);
    let alice = create_test_user(&server, "Alice").await;

    let (handle, _rx) = ConnectionHandle::channel(8);
    let mut session = state.relay.open_session(handle);
    session.handle_frame(&register_frame(alice.id)).await;
    session.close();

    assert_eq!(session.state(), &SessionState::Closed);
    assert_eq!(
        session.handle_frame(&register_frame(alice.id)).await,
        FrameOutcome::Discarded("session closed")
    );
    assert!(state.relay.registry().is_empty());
}
