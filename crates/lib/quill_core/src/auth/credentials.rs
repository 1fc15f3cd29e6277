//! Email + password authentication policy.

use super::{AuthError, password};
use crate::models::identity::{AccountKind, Identity};
use crate::store::IdentityStore;

/// Normalize an email for lookup and storage: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verify an email + password pair against the stored credentials.
///
/// Unknown email and wrong password fail with the same error so callers
/// cannot probe which accounts exist. Accounts registered through a
/// federated provider are turned away before any hash comparison.
pub async fn authenticate(
    store: &dyn IdentityStore,
    email: &str,
    password_plain: &str,
) -> Result<Identity, AuthError> {
    let email = normalize_email(email);
    let Some(identity) = store.find_by_email(&email).await? else {
        return Err(AuthError::InvalidCredentials);
    };
    if identity.kind == AccountKind::Federated {
        return Err(AuthError::WrongLoginMethod);
    }
    let Some(hash) = identity.password_hash.as_deref() else {
        return Err(AuthError::WrongLoginMethod);
    };
    if !password::verify_password(password_plain, hash) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::models::identity::NewIdentity;
    use crate::store::memory::MemoryIdentityStore;

    async fn store_with_local_user() -> MemoryIdentityStore {
        let store = MemoryIdentityStore::new();
        let hash = hash_password("correct horse").unwrap();
        store
            .create(NewIdentity::local("alice@example.com", "alice", &hash, None))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn valid_credentials_authenticate() {
        let store = store_with_local_user().await;
        let identity = authenticate(&store, "alice@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(identity.email, "alice@example.com");
    }

    #[tokio::test]
    async fn email_is_normalized_before_lookup() {
        let store = store_with_local_user().await;
        assert!(
            authenticate(&store, "  ALICE@Example.COM ", "correct horse")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_identically() {
        let store = store_with_local_user().await;
        let unknown = authenticate(&store, "nobody@example.com", "whatever")
            .await
            .unwrap_err();
        let wrong = authenticate(&store, "alice@example.com", "wrong password")
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn federated_account_requires_federated_login() {
        let store = MemoryIdentityStore::new();
        store
            .create(NewIdentity::federated(
                "bob@example.com",
                "bob",
                "provider-subject-bob",
            ))
            .await
            .unwrap();

        assert!(matches!(
            authenticate(&store, "bob@example.com", "anything").await,
            Err(AuthError::WrongLoginMethod)
        ));
    }
}
