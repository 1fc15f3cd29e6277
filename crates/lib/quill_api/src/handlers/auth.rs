//! Authentication request handlers.

use axum::{Extension, Json};
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, MessageResponse, SignupRequest, StatusResponse, TokenResponse};
use crate::services::auth;

/// `POST /auth/signup` — create a new local account.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::signup(state.store.as_ref(), &state.tokens, body).await?;
    Ok(Json(resp))
}

/// `POST /auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(state.store.as_ref(), &state.tokens, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /auth/logout` — stateless acknowledgement.
///
/// Bearer tokens cannot be revoked server-side and no session is kept, so
/// there is nothing to clear; clients drop the token.
pub async fn logout_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        status: "success".to_string(),
        message: "Logged out.".to_string(),
    })
}

/// `GET /auth/status` — return the identity resolved from the bearer token.
pub async fn status_handler(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        logged_in: true,
        user: user.into(),
    })
}
