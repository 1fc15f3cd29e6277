//! Password-reset token ledger.
//!
//! Single-use, time-boxed reset secrets. Only a SHA-256 digest of the secret
//! is ever stored; the plaintext goes to the user out of band and is never
//! logged.

use chrono::{Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::identity::{Identity, ResetTicket};
use crate::store::IdentityStore;

/// Reset secret length: 64 alphanumeric chars, ~380 bits of entropy. A fast
/// hash is enough for storage because the secret is not guessable like a
/// password.
const SECRET_LEN: usize = 64;

/// Issues and consumes password-reset secrets.
pub struct ResetTokenLedger {
    ttl: Duration,
}

impl ResetTokenLedger {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            ttl: Duration::seconds(config.reset_ttl_secs),
        }
    }

    /// Configured reset-secret lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Generate a reset secret for `identity`, persisting only its hash.
    ///
    /// Overwrites any outstanding ticket, so a previously issued secret stops
    /// working the moment a new one is requested. Returns the plaintext
    /// secret for out-of-band delivery.
    pub async fn issue(
        &self,
        store: &dyn IdentityStore,
        identity: &Identity,
    ) -> Result<String, AuthError> {
        let secret = generate_secret();
        let ticket = ResetTicket {
            token_hash: hash_secret(&secret),
            expires_at: Utc::now() + self.ttl,
        };
        store.update_reset_ticket(&identity.id, Some(&ticket)).await?;
        Ok(secret)
    }

    /// Consume a presented secret exactly once.
    ///
    /// On match the ticket is cleared and persisted before returning, so the
    /// secret cannot be replayed even if the caller's follow-on password
    /// write fails. No match or an expired ticket fails without mutation.
    pub async fn consume(
        &self,
        store: &dyn IdentityStore,
        presented: &str,
    ) -> Result<Identity, AuthError> {
        let hash = hash_secret(presented);
        let Some(mut identity) = store.find_by_reset_hash(&hash).await? else {
            return Err(AuthError::InvalidOrExpiredToken);
        };
        let Some(ticket) = identity.reset_ticket.take() else {
            return Err(AuthError::InvalidOrExpiredToken);
        };
        if ticket.expires_at <= Utc::now() {
            return Err(AuthError::InvalidOrExpiredToken);
        }
        store.update_reset_ticket(&identity.id, None).await?;
        Ok(identity)
    }
}

/// Generate a random reset secret.
fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a secret for storage.
fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
