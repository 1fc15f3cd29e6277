//! Federated identity linking.

use tracing::info;

use super::AuthError;
use super::credentials::normalize_email;
use crate::models::identity::{AccountKind, Identity, NewIdentity};
use crate::store::IdentityStore;

/// Profile asserted by an external identity provider. The provider handshake
/// itself happens at the transport boundary; by the time this struct exists
/// the profile has been verified.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    pub provider_subject_id: String,
    pub email: String,
    pub display_name: String,
}

/// Reconcile a federated profile with a local record, creating one if absent.
///
/// A federated profile never merges onto an existing password account: a
/// spoofed profile carrying someone else's email must not take that account
/// over. This is the one path that creates identities outside signup.
pub async fn link_or_create(
    store: &dyn IdentityStore,
    profile: &FederatedProfile,
) -> Result<Identity, AuthError> {
    if let Some(existing) = store
        .find_by_provider_subject(&profile.provider_subject_id)
        .await?
    {
        return Ok(existing);
    }

    let email = normalize_email(&profile.email);
    if let Some(existing) = store.find_by_email(&email).await?
        && existing.kind == AccountKind::Local
    {
        return Err(AuthError::EmailAlreadyLocal);
    }

    let identity = store
        .create(NewIdentity::federated(
            &email,
            &profile.display_name,
            &profile.provider_subject_id,
        ))
        .await?;
    info!(identity = %identity.id, "created federated identity");
    Ok(identity)
}
