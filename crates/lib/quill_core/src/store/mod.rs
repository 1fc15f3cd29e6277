//! Identity persistence collaborators.
//!
//! The auth core never talks to a database directly; everything goes through
//! the `IdentityStore` trait. The store must provide atomic per-document
//! writes (`save` persists the password hash and reset ticket together);
//! the core implements no locking of its own on top of that contract.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::identity::{Identity, NewIdentity, ResetTicket};

/// Identity store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Document store holding `Identity` records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError>;

    /// Lookup by normalized (lowercased, trimmed) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_provider_subject(
        &self,
        provider_subject_id: &str,
    ) -> Result<Option<Identity>, StoreError>;

    /// Look up the identity holding a reset ticket with this hash.
    async fn find_by_reset_hash(&self, token_hash: &str) -> Result<Option<Identity>, StoreError>;

    async fn create(&self, fields: NewIdentity) -> Result<Identity, StoreError>;

    /// Persist every mutable field of `identity` in one write.
    async fn save(&self, identity: &Identity) -> Result<(), StoreError>;

    /// Narrowing of `save`: replace or clear the reset ticket only.
    async fn update_reset_ticket(
        &self,
        id: &str,
        ticket: Option<&ResetTicket>,
    ) -> Result<(), StoreError>;
}
