//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use quill_core::auth::AuthError;
use quill_core::notify::NotifyError;
use quill_core::store::StoreError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::StoreUnavailable(m) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", m.as_str())
            }
            AppError::NotificationFailed(m) => {
                (StatusCode::BAD_GATEWAY, "notification_failed", m.as_str())
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            // Authentication failures: the caller is unauthenticated, not
            // the server broken.
            AuthError::InvalidCredentials
            | AuthError::WrongLoginMethod
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Malformed
            | AuthError::UnknownSubject => AppError::Unauthorized(e.to_string()),
            AuthError::EmailAlreadyLocal
            | AuthError::DuplicateEmail
            | AuthError::DuplicateUsername => AppError::Conflict(e.to_string()),
            AuthError::InvalidOrExpiredToken => AppError::Validation(e.to_string()),
            AuthError::Validation(m) => AppError::Validation(m),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Notification(m) => AppError::NotificationFailed(m),
            AuthError::Internal(m) => AppError::Internal(m),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<NotifyError> for AppError {
    fn from(e: NotifyError) -> Self {
        AppError::NotificationFailed(e.to_string())
    }
}
