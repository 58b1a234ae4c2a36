use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::error::StorageError;
use crate::shared::messaging::{FriendEntry, PendingRequest, UserInfo};

#[derive(Debug, Clone)]
struct Friendship {
    user_id: Uuid,
    friend_id: Uuid,
}

#[derive(Debug, Clone)]
struct RequestRecord {
    from: Uuid,
    to: Uuid,
}

#[derive(Default)]
struct DirectoryState {
    users: HashMap<Uuid, User>,
    friendships: Vec<Friendship>,
    requests: Vec<RequestRecord>,
}

impl DirectoryState {
    fn name_of(&self, id: Uuid) -> String {
        self.users.get(&id).map(|u| u.name.clone()).unwrap_or_default()
    }
}

/// In-process users and friend graph
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_user(&self, user: User) -> Result<User, StorageError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::conflict("Email is already taken"));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn find_user_by_refresh_token(&self, token: &str) -> Option<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned()
    }

    pub async fn set_refresh_token(&self, id: Uuid, token: Option<String>) {
        if let Some(user) = self.state.write().await.users.get_mut(&id) {
            user.refresh_token = token;
        }
    }

    pub async fn search_users(&self, term: &str) -> Vec<User> {
        let state = self.state.read().await;
        let mut results: Vec<User> = state
            .users
            .values()
            .filter(|u| u.matches_term(term))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));
        results
    }

    pub async fn user_info(&self, id: Uuid) -> Option<UserInfo> {
        let state = self.state.read().await;
        let user = state.users.get(&id)?;

        let friends_list = state
            .friendships
            .iter()
            .filter(|f| f.user_id == id)
            .map(|f| FriendEntry {
                friend_id: f.friend_id,
                friend_name: state.name_of(f.friend_id),
            })
            .collect();
        let incoming_friend_requests = state
            .requests
            .iter()
            .filter(|r| r.to == id)
            .map(|r| PendingRequest {
                id: r.from,
                name: state.name_of(r.from),
            })
            .collect();
        let outgoing_friend_requests = state
            .requests
            .iter()
            .filter(|r| r.from == id)
            .map(|r| PendingRequest {
                id: r.to,
                name: state.name_of(r.to),
            })
            .collect();

        Some(UserInfo {
            id,
            name: user.name.clone(),
            friends_list,
            incoming_friend_requests,
            outgoing_friend_requests,
        })
    }

    pub async fn are_friends(&self, a: Uuid, b: Uuid) -> bool {
        self.state
            .read()
            .await
            .friendships
            .iter()
            .any(|f| f.user_id == a && f.friend_id == b)
    }

    pub async fn has_pending_request(&self, from: Uuid, to: Uuid) -> bool {
        self.state
            .read()
            .await
            .requests
            .iter()
            .any(|r| r.from == from && r.to == to)
    }

    pub async fn create_friend_request(&self, from: Uuid, to: Uuid) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        if state.requests.iter().any(|r| r.from == from && r.to == to) {
            return Err(StorageError::conflict("Friend request already exists"));
        }
        state.requests.push(RequestRecord { from, to });
        Ok(())
    }

    pub async fn remove_friend_request(&self, from: Uuid, to: Uuid) -> bool {
        let mut state = self.state.write().await;
        let before = state.requests.len();
        state.requests.retain(|r| !(r.from == from && r.to == to));
        state.requests.len() != before
    }

    pub async fn accept_friend_request(&self, from: Uuid, to: Uuid) -> bool {
        let mut state = self.state.write().await;
        if !state.requests.iter().any(|r| r.from == from && r.to == to) {
            return false;
        }
        state
            .requests
            .retain(|r| !((r.from == from && r.to == to) || (r.from == to && r.to == from)));

        for (user_id, friend_id) in [(from, to), (to, from)] {
            let exists = state
                .friendships
                .iter()
                .any(|f| f.user_id == user_id && f.friend_id == friend_id);
            if !exists {
                state.friendships.push(Friendship { user_id, friend_id });
            }
        }
        true
    }
}
