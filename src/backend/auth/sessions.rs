/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT generation and validation for user sessions.
 *
 * Two token kinds are issued at login:
 * - access token: 15 minutes, signed with `ACCESS_TOKEN_SECRET`, sent as
 *   `Authorization: Bearer <token>` on protected endpoints
 * - refresh token: 1 day, signed with `REFRESH_TOKEN_SECRET`, stored on the
 *   user record and exchanged at `/auth/refresh` for a new pair
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token lifetime
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Refresh token lifetime
pub const REFRESH_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Unique token id, so two tokens issued in the same second differ
    pub jti: String,
}

impl Claims {
    fn new(user_id: Uuid, email: &str, ttl_secs: u64) -> Self {
        let now = Utc::now().timestamp().max(0) as u64;
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + ttl_secs,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Access and refresh token issued together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing keys for both token kinds
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    /// Create a new access/refresh pair for a user
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access = Claims::new(user_id, email, ACCESS_TOKEN_TTL_SECS);
        let refresh = Claims::new(user_id, email, REFRESH_TOKEN_TTL_SECS);

        Ok(TokenPair {
            access_token: encode(&Header::default(), &access, &self.access_encoding)?,
            refresh_token: encode(&Header::default(), &refresh, &self.refresh_encoding)?,
        })
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.access_decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify and decode a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.refresh_decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
