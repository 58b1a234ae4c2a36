//! PostgreSQL storage tests
//!
//! Ignored by default; see `common::database` for how to run them.

use chrono::Utc;
use palchat::backend::auth::users::User;
use palchat::backend::{ConversationStore, Directory};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::TestDatabase;

async fn create_user(directory: &Directory, name: &str) -> User {
    let email = format!("{}_{}@example.com", name, Uuid::new_v4().simple());
    directory
        .create_user(User::new(name.to_string(), email, "hash".to_string()))
        .await
        .expect("create user")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_first_messages_share_one_conversation() {
    let db = TestDatabase::new().await;
    let store = ConversationStore::postgres(db.pool().clone());
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let (from, to) = if i % 2 == 0 { (alice, bob) } else { (bob, alice) };
        tasks.push(tokio::spawn(async move {
            store
                .append_message(from, to, from, &format!("message {}", i), Utc::now())
                .await
                .map(|conversation| conversation.id)
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap());
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);

    let history = store.history(bob, alice).await.unwrap();
    assert_eq!(history.len(), 8);
}

#[tokio::test]
#[ignore]
async fn test_lookup_is_symmetric() {
    let db = TestDatabase::new().await;
    let store = ConversationStore::postgres(db.pool().clone());
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    assert!(store.find_conversation(alice, bob).await.unwrap().is_none());

    store
        .append_message(alice, bob, alice, "first", Utc::now())
        .await
        .unwrap();
    store
        .append_message(bob, alice, bob, "second", Utc::now())
        .await
        .unwrap();

    let forward = store.find_conversation(alice, bob).await.unwrap().unwrap();
    let backward = store.find_conversation(bob, alice).await.unwrap().unwrap();
    assert_eq!(forward.id, backward.id);

    let texts: Vec<String> = backward.messages.into_iter().map(|m| m.message_text).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
#[ignore]
async fn test_directory_friend_request_lifecycle() {
    let db = TestDatabase::new().await;
    let directory = Directory::postgres(db.pool().clone());
    let alice = create_user(&directory, "alice").await;
    let bob = create_user(&directory, "bob").await;

    directory.create_friend_request(alice.id, bob.id).await.unwrap();
    assert!(directory.has_pending_request(alice.id, bob.id).await.unwrap());
    assert!(directory
        .create_friend_request(alice.id, bob.id)
        .await
        .is_err());

    assert!(directory.accept_friend_request(alice.id, bob.id).await.unwrap());
    assert!(directory.are_friends(alice.id, bob.id).await.unwrap());
    assert!(directory.are_friends(bob.id, alice.id).await.unwrap());
    assert!(!directory.has_pending_request(alice.id, bob.id).await.unwrap());

    let info = directory.user_info(bob.id).await.unwrap().unwrap();
    assert!(info.is_friend(alice.id));
    assert!(info.incoming_friend_requests.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_directory_duplicate_email_conflicts() {
    let db = TestDatabase::new().await;
    let directory = Directory::postgres(db.pool().clone());
    let alice = create_user(&directory, "alice").await;

    let duplicate = User::new("other".to_string(), alice.email.clone(), "hash".to_string());
    assert!(directory.create_user(duplicate).await.is_err());

    directory
        .set_refresh_token(alice.id, Some("token-1".to_string()))
        .await
        .unwrap();
    let found = directory.find_user_by_refresh_token("token-1").await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
}
