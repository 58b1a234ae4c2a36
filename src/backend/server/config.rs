/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration,
 * including the optional PostgreSQL database connection.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (after `.env` is read
 * by the binary), with defaults suitable for local development.
 *
 * | Variable                  | Default                 |
 * |---------------------------|-------------------------|
 * | `PORT`                    | `3000`                  |
 * | `DATABASE_URL`            | unset (in-memory)       |
 * | `ACCESS_TOKEN_SECRET`     | development fallback    |
 * | `REFRESH_TOKEN_SECRET`    | development fallback    |
 * | `CORS_ORIGIN`             | `http://localhost:5173` |
 * | `BCRYPT_COST`             | `10`                    |
 * | `RELAY_OUTBOUND_CAPACITY` | `64`                    |
 * | `RELAY_IDLE_TIMEOUT_SECS` | `600` (`0` disables)    |
 * | `RELAY_PING_INTERVAL_SECS`| `30` (`0` disables)     |
 * | `RELAY_REQUIRE_TOKEN`     | `false`                 |
 *
 * The ping interval must be shorter than the idle timeout, otherwise a
 * client that only listens would be closed between pings.
 *
 * # Error Handling
 *
 * A value that is present but unparseable is a `ConfigError`. A database
 * that cannot be reached is logged and the server continues with in-memory
 * storage.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

use crate::backend::relay::RelaySettings;

const DEV_ACCESS_SECRET: &str = "palchat-dev-access-secret";
const DEV_REFRESH_SECRET: &str = "palchat-dev-refresh-secret";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Runtime configuration for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub cors_origin: String,
    pub bcrypt_cost: u32,
    pub relay_outbound_capacity: usize,
    /// Seconds; 0 disables the idle timeout
    pub relay_idle_timeout_secs: u64,
    /// Seconds between server pings; 0 disables them
    pub relay_ping_interval_secs: u64,
    /// `register` frames must carry the user's access token
    pub relay_require_token: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            bcrypt_cost: 10,
            relay_outbound_capacity: 64,
            relay_idle_timeout_secs: 600,
            relay_ping_interval_secs: 30,
            relay_require_token: false,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let access_token_secret = non_empty("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set. Using an insecure development secret.");
            defaults.access_token_secret.clone()
        });
        let refresh_token_secret = non_empty("REFRESH_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set. Using an insecure development secret.");
            defaults.refresh_token_secret.clone()
        });

        let bcrypt_cost = parse_var("BCRYPT_COST", non_empty("BCRYPT_COST"), defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST".to_string(),
                value: bcrypt_cost.to_string(),
            });
        }

        let relay_outbound_capacity = parse_var(
            "RELAY_OUTBOUND_CAPACITY",
            non_empty("RELAY_OUTBOUND_CAPACITY"),
            defaults.relay_outbound_capacity,
        )?;
        if relay_outbound_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RELAY_OUTBOUND_CAPACITY".to_string(),
                value: "0".to_string(),
            });
        }

        let relay_idle_timeout_secs = parse_var(
            "RELAY_IDLE_TIMEOUT_SECS",
            non_empty("RELAY_IDLE_TIMEOUT_SECS"),
            defaults.relay_idle_timeout_secs,
        )?;
        let relay_ping_interval_secs = parse_var(
            "RELAY_PING_INTERVAL_SECS",
            non_empty("RELAY_PING_INTERVAL_SECS"),
            defaults.relay_ping_interval_secs,
        )?;
        if relay_idle_timeout_secs != 0
            && relay_ping_interval_secs != 0
            && relay_ping_interval_secs >= relay_idle_timeout_secs
        {
            return Err(ConfigError::InvalidValue {
                key: "RELAY_PING_INTERVAL_SECS".to_string(),
                value: relay_ping_interval_secs.to_string(),
            });
        }

        Ok(Self {
            port: parse_var("PORT", non_empty("PORT"), defaults.port)?,
            database_url: non_empty("DATABASE_URL"),
            access_token_secret,
            refresh_token_secret,
            cors_origin: non_empty("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            bcrypt_cost,
            relay_outbound_capacity,
            relay_idle_timeout_secs,
            relay_ping_interval_secs,
            relay_require_token: parse_var(
                "RELAY_REQUIRE_TOKEN",
                non_empty("RELAY_REQUIRE_TOKEN"),
                defaults.relay_require_token,
            )?,
        })
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            outbound_capacity: self.relay_outbound_capacity,
            idle_timeout: match self.relay_idle_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            ping_interval: match self.relay_ping_interval_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            require_token: self.relay_require_token,
        }
    }
}

/// Connect to PostgreSQL and run migrations
///
/// Returns `None` if `database_url` is `None` or the connection fails; the
/// caller then falls back to in-memory storage.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using in-memory storage.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory storage.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing; the schema might not be up to date");
        }
    }

    Some(pool)
}
