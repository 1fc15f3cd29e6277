//! Password-reset request handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{ForgotPasswordRequest, MessageResponse, ResetPasswordRequest, TokenResponse};
use crate::services::auth;

/// `POST /auth/forgot-password` — issue a reset secret and email it.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = auth::forgot_password(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &state.reset,
        &state.config.public_base_url,
        &body.email,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /auth/reset-password/{secret}` — consume a reset secret and set a
/// new password.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    Json(body): Json<ResetPasswordRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::reset_password(
        state.store.as_ref(),
        &state.tokens,
        &state.reset,
        &secret,
        &body.password,
    )
    .await?;
    Ok(Json(resp))
}
