//! PostgreSQL user and friend-graph storage

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::error::StorageError;
use crate::shared::messaging::{FriendEntry, PendingRequest, UserInfo};

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

/// Escape LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: User) -> Result<User, StorageError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, refresh_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, refresh_token, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StorageError::conflict("Email is already taken"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, refresh_token, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, refresh_token, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, refresh_token, created_at FROM users WHERE refresh_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn set_refresh_token(
        &self,
        id: Uuid,
        token: Option<String>,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn search_users(&self, term: &str) -> Result<Vec<User>, StorageError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, refresh_token, created_at
            FROM users
            WHERE name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'
            ORDER BY name ASC
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn user_info(&self, id: Uuid) -> Result<Option<UserInfo>, StorageError> {
        let Some(row) = sqlx::query("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let friends = sqlx::query(
            r#"
            SELECT f.friend_id, u.name
            FROM friendships f
            JOIN users u ON u.id = f.friend_id
            WHERE f.user_id = $1
            ORDER BY f.since ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let incoming = sqlx::query(
            r#"
            SELECT r.from_user_id AS other_id, u.name
            FROM friend_requests r
            JOIN users u ON u.id = r.from_user_id
            WHERE r.to_user_id = $1
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let outgoing = sqlx::query(
            r#"
            SELECT r.to_user_id AS other_id, u.name
            FROM friend_requests r
            JOIN users u ON u.id = r.to_user_id
            WHERE r.from_user_id = $1
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let to_pending = |rows: Vec<sqlx::postgres::PgRow>| -> Vec<PendingRequest> {
            rows.into_iter()
                .map(|r| PendingRequest {
                    id: r.get("other_id"),
                    name: r.get("name"),
                })
                .collect()
        };

        Ok(Some(UserInfo {
            id: row.get("id"),
            name: row.get("name"),
            friends_list: friends
                .into_iter()
                .map(|r| FriendEntry {
                    friend_id: r.get("friend_id"),
                    friend_name: r.get("name"),
                })
                .collect(),
            incoming_friend_requests: to_pending(incoming),
            outgoing_friend_requests: to_pending(outgoing),
        }))
    }

    pub async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, StorageError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = $1 AND friend_id = $2) AS found",
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    pub async fn has_pending_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM friend_requests WHERE from_user_id = $1 AND to_user_id = $2) AS found",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    pub async fn create_friend_request(&self, from: Uuid, to: Uuid) -> Result<(), StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO friend_requests (from_user_id, to_user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (from_user_id, to_user_id) DO NOTHING
            "#,
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::conflict("Friend request already exists"));
        }
        Ok(())
    }

    pub async fn remove_friend_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM friend_requests WHERE from_user_id = $1 AND to_user_id = $2")
                .bind(from)
                .bind(to)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn accept_friend_request(&self, from: Uuid, to: Uuid) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;

        let removed =
            sqlx::query("DELETE FROM friend_requests WHERE from_user_id = $1 AND to_user_id = $2")
                .bind(from)
                .bind(to)
                .execute(&mut *tx)
                .await?;
        if removed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // A crossed request in the other direction is settled by this accept
        sqlx::query("DELETE FROM friend_requests WHERE from_user_id = $1 AND to_user_id = $2")
            .bind(to)
            .bind(from)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO friendships (user_id, friend_id, since)
            VALUES ($1, $2, NOW()), ($2, $1, NOW())
            ON CONFLICT (user_id, friend_id) DO NOTHING
            "#,
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
