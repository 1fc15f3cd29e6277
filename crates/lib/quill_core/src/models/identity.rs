//! Identity domain models.
//!
//! `Identity` is the full account record as the store holds it; everything
//! that leaves the auth subsystem goes through the `PublicIdentity`
//! projection, which carries no credential material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// How the account was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Local,
    Federated,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Local => "local",
            AccountKind::Federated => "federated",
        }
    }

    pub fn parse(s: &str) -> Option<AccountKind> {
        match s {
            "local" => Some(AccountKind::Local),
            "federated" => Some(AccountKind::Federated),
            _ => None,
        }
    }
}

/// Outstanding password-reset record: the hash of the secret and its expiry.
/// At most one per identity; a new request overwrites the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetTicket {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// An account record.
///
/// Invariant: a `Local` account always has a non-empty `password_hash` and no
/// `provider_subject_id`; a `Federated` account is the reverse.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub kind: AccountKind,
    pub password_hash: Option<String>,
    pub provider_subject_id: Option<String>,
    pub profile_image_url: Option<String>,
    pub reset_ticket: Option<ResetTicket>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Projection handed outside the auth subsystem: no password hash, no
    /// reset state.
    pub fn into_public(self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            email: self.email,
            username: self.username,
            role: self.role,
            kind: self.kind,
            profile_image_url: self.profile_image_url,
            created_at: self.created_at,
        }
    }
}

/// Identity with credential material stripped.
#[derive(Debug, Clone)]
pub struct PublicIdentity {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub kind: AccountKind,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Claims embedded in bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — identity id (standard JWT `sub` claim).
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Fields for creating an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub username: String,
    pub role: Role,
    pub kind: AccountKind,
    pub password_hash: Option<String>,
    pub provider_subject_id: Option<String>,
    pub profile_image_url: Option<String>,
}

impl NewIdentity {
    /// A password account. Carries a hash, never a provider subject.
    pub fn local(
        email: &str,
        username: &str,
        password_hash: &str,
        profile_image_url: Option<&str>,
    ) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            role: Role::User,
            kind: AccountKind::Local,
            password_hash: Some(password_hash.to_string()),
            provider_subject_id: None,
            profile_image_url: profile_image_url.map(|u| u.to_string()),
        }
    }

    /// A federated account. Carries the provider subject, never a password.
    pub fn federated(email: &str, username: &str, provider_subject_id: &str) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            role: Role::User,
            kind: AccountKind::Federated,
            password_hash: None,
            provider_subject_id: Some(provider_subject_id.to_string()),
            profile_image_url: None,
        }
    }
}
