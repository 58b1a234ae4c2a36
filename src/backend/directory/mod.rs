//! User Directory
//!
//! Accounts and the friend graph: users, pending friend requests and the
//! symmetric friendship relation. The relay consults it to check that a
//! registering user exists and to resolve display names.

pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::error::StorageError;
use crate::shared::messaging::UserInfo;

pub use memory::MemoryDirectory;
pub use postgres::PgDirectory;

/// Directory storage backend
#[derive(Clone)]
pub enum Directory {
    Postgres(PgDirectory),
    Memory(MemoryDirectory),
}

impl Directory {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::Postgres(PgDirectory::new(pool))
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryDirectory::new())
    }

    /// Insert a new account; a taken email is a conflict
    pub async fn create_user(&self, user: User) -> Result<User, StorageError> {
        match self {
            Self::Postgres(dir) => dir.create_user(user).await,
            Self::Memory(dir) => dir.create_user(user).await,
        }
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        match self {
            Self::Postgres(dir) => dir.find_user_by_id(id).await,
            Self::Memory(dir) => Ok(dir.find_user_by_id(id).await),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        match self {
            Self::Postgres(dir) => dir.find_user_by_email(email).await,
            Self::Memory(dir) => Ok(dir.find_user_by_email(email).await),
        }
    }

    pub async fn find_user_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, StorageError> {
        match self {
            Self::Postgres(dir) => dir.find_user_by_refresh_token(token).await,
            Self::Memory(dir) => Ok(dir.find_user_by_refresh_token(token).await),
        }
    }

    /// Store or clear (`None`) the user's current refresh token
    pub async fn set_refresh_token(
        &self,
        id: Uuid,
        token: Option<String>,
    ) -> Result<(), StorageError> {
        match self {
            Self::Postgres(dir) => dir.set_refresh_token(id, token).await,
            Self::Memory(dir) => {
                dir.set_refresh_token(id, token).await;
                Ok(())
            }
        }
    }

    /// Case-insensitive substring search over name and email
    pub async fn search_users(&self, term: &str) -> Result<Vec<User>, StorageError> {
        match self {
            Self::Postgres(dir) => dir.search_users(term).await,
            Self::Memory(dir) => Ok(dir.search_users(term).await),
        }
    }

    /// Profile with friends and pending requests in both directions
    pub async fn user_info(&self, id: Uuid) -> Result<Option<UserInfo>, StorageError> {
        match self {
            Self::Postgres(dir) => dir.user_info(id).await,
            Self::Memory(dir) => Ok(dir.user_info(id).await),
        }
    }

    pub async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, StorageError> {
        match self {
            Self::Postgres(dir) => dir.are_friends(a, b).await,
            Self::Memory(dir) => Ok(dir.are_friends(a, b).await),
        }
    }

    pub async fn has_pending_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        match self {
            Self::Postgres(dir) => dir.has_pending_request(from, to).await,
            Self::Memory(dir) => Ok(dir.has_pending_request(from, to).await),
        }
    }

    pub async fn create_friend_request(&self, from: Uuid, to: Uuid) -> Result<(), StorageError> {
        if from == to {
            return Err(StorageError::rejected("Cannot send a friend request to yourself"));
        }
        match self {
            Self::Postgres(dir) => dir.create_friend_request(from, to).await,
            Self::Memory(dir) => dir.create_friend_request(from, to).await,
        }
    }

    /// Drop a pending request; false if there was none
    pub async fn remove_friend_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        match self {
            Self::Postgres(dir) => dir.remove_friend_request(from, to).await,
            Self::Memory(dir) => Ok(dir.remove_friend_request(from, to).await),
        }
    }

    /// Turn the pending request `from -> to` into a friendship
    ///
    /// Returns false when no such request is pending.
    pub async fn accept_friend_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        let accepted = match self {
            Self::Postgres(dir) => dir.accept_friend_request(from, to).await?,
            Self::Memory(dir) => dir.accept_friend_request(from, to).await,
        };
        if accepted {
            tracing::info!("[Directory] {} and {} are now friends", from, to);
        }
        Ok(accepted)
    }
}
