//! Request/response models for the API surface.
//!
//! Wire field names are camelCase to match the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quill_core::models::identity::PublicIdentity;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// URL handed back by the upload collaborator, if the client set an
    /// avatar during signup.
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginRequest {
    pub provider_subject_id: String,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Identity as the API exposes it. Built from `PublicIdentity`, so it can
/// never carry credential material.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub kind: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PublicIdentity> for AuthUser {
    fn from(identity: PublicIdentity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            username: identity.username,
            role: identity.role.as_str().to_string(),
            kind: identity.kind.as_str().to_string(),
            profile_image_url: identity.profile_image_url,
            created_at: identity.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub logged_in: bool,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
