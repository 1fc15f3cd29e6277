//! API server configuration.

use quill_core::auth::token::resolve_token_secret;
use quill_core::config::{AuthConfig, DEFAULT_RESET_TTL_SECS, DEFAULT_TOKEN_TTL_SECS};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Token signing secret.
    pub token_secret: String,
    /// Bearer-token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Reset-secret lifetime in seconds. Independent of the token TTL.
    pub reset_token_ttl_secs: i64,
    /// Base URL of the frontend, used to build reset-password links.
    pub public_base_url: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3000`                         |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/quill`        |
    /// | `TOKEN_SECRET`         | generated & persisted to file            |
    /// | `TOKEN_TTL_SECS`       | `3600`                                   |
    /// | `RESET_TOKEN_TTL_SECS` | `600`                                    |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:5173`                  |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/quill".into()),
            token_secret: resolve_token_secret(),
            token_ttl_secs: env_i64("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS),
            reset_token_ttl_secs: env_i64("RESET_TOKEN_TTL_SECS", DEFAULT_RESET_TTL_SECS),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        }
    }

    /// Auth tunables handed to the core constructors.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            token_secret: self.token_secret.clone(),
            token_ttl_secs: self.token_ttl_secs,
            reset_ttl_secs: self.reset_token_ttl_secs,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
