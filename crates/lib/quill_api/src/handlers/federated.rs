//! Federated login handler.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{FederatedLoginRequest, TokenResponse};
use crate::services::auth;

/// `POST /auth/federated` — log in with a provider profile.
///
/// The OAuth handshake happens upstream; this endpoint receives the
/// already-verified profile and links or creates the identity.
pub async fn federated_login_handler(
    State(state): State<AppState>,
    Json(body): Json<FederatedLoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::link_federated(state.store.as_ref(), &state.tokens, body).await?;
    Ok(Json(resp))
}
