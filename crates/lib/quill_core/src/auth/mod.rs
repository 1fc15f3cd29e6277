//! Authentication and authorization logic.
//!
//! Password hashing, bearer-token management, the password-reset ledger,
//! credential and federated login policy, and the owner-or-admin guard.

pub mod authorize;
pub mod credentials;
pub mod federated;
pub mod password;
pub mod reset;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
///
/// `InvalidCredentials` covers both an unknown email and a wrong password;
/// callers must not be able to tell the two apart.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Please log in with your federated provider")]
    WrongLoginMethod,

    #[error("Email already registered with a password account")]
    EmailAlreadyLocal,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token subject no longer exists")]
    UnknownSubject,

    #[error("Reset token is invalid or has expired")]
    InvalidOrExpiredToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
