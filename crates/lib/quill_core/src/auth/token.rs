//! Bearer token issuance and verification.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::identity::TokenClaims;

/// Issues and verifies signed bearer tokens (HS256).
///
/// Stateless: validity is determined entirely by the signature and the
/// expiry claim. An issued token cannot be revoked before it lapses.
pub struct TokenService {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret.as_bytes().to_vec(),
            ttl: Duration::seconds(config.token_ttl_secs),
        }
    }

    /// Configured token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a signed token asserting `subject_id`, expiring after the
    /// configured TTL.
    pub fn issue(&self, subject_id: &str) -> Result<String, AuthError> {
        self.issue_at(subject_id, Utc::now())
    }

    fn issue_at(&self, subject_id: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify a token string, returning the claims on success.
    ///
    /// The signature is checked before any claim is inspected. Resolving the
    /// subject to a live identity is the caller's explicit next step.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let key = DecodingKey::from_secret(&self.secret);
        let mut validation = Validation::default();
        validation.validate_exp = true;
        match decode::<TokenClaims>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }),
        }
    }
}

/// Resolve the token-signing secret: env var `TOKEN_SECRET` → persisted file.
pub fn resolve_token_secret() -> String {
    if let Ok(secret) = std::env::var("TOKEN_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = token_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new token secret");
    secret
}

/// Path to the persisted token secret file.
fn token_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quill")
        .join("token-secret")
}
