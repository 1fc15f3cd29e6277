//! In-memory identity store.
//!
//! Backs the test suites and single-process embedding; not durable.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use async_trait::async_trait;

use super::{IdentityStore, StoreError};
use crate::models::identity::{Identity, NewIdentity, ResetTicket};

/// DashMap-backed store keyed by identity id. Secondary lookups scan, which
/// is fine at the scale this store is meant for.
#[derive(Default)]
pub struct MemoryIdentityStore {
    identities: DashMap<String, Identity>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_where(&self, pred: impl Fn(&Identity) -> bool) -> Option<Identity> {
        self.identities
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.identities.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.find_where(|identity| identity.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.find_where(|identity| identity.username == username))
    }

    async fn find_by_provider_subject(
        &self,
        provider_subject_id: &str,
    ) -> Result<Option<Identity>, StoreError> {
        Ok(self.find_where(|identity| {
            identity.provider_subject_id.as_deref() == Some(provider_subject_id)
        }))
    }

    async fn find_by_reset_hash(&self, token_hash: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.find_where(|identity| {
            identity
                .reset_ticket
                .as_ref()
                .is_some_and(|ticket| ticket.token_hash == token_hash)
        }))
    }

    async fn create(&self, fields: NewIdentity) -> Result<Identity, StoreError> {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: fields.email,
            username: fields.username,
            role: fields.role,
            kind: fields.kind,
            password_hash: fields.password_hash,
            provider_subject_id: fields.provider_subject_id,
            profile_image_url: fields.profile_image_url,
            reset_ticket: None,
            created_at: Utc::now(),
        };
        self.identities
            .insert(identity.id.clone(), identity.clone());
        Ok(identity)
    }

    async fn save(&self, identity: &Identity) -> Result<(), StoreError> {
        let Some(mut entry) = self.identities.get_mut(&identity.id) else {
            return Err(StoreError::Unavailable(format!(
                "identity {} not found",
                identity.id
            )));
        };
        *entry = identity.clone();
        Ok(())
    }

    async fn update_reset_ticket(
        &self,
        id: &str,
        ticket: Option<&ResetTicket>,
    ) -> Result<(), StoreError> {
        let Some(mut entry) = self.identities.get_mut(id) else {
            return Err(StoreError::Unavailable(format!("identity {id} not found")));
        };
        entry.reset_ticket = ticket.cloned();
        Ok(())
    }
}
