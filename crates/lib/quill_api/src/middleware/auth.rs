//! Authentication middleware — bearer token extraction and verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use quill_core::models::identity::PublicIdentity;

use crate::AppState;
use crate::error::AppError;
use crate::services::auth::verify_bearer;

/// Key used to store the verified identity in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicIdentity);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// token, resolves the subject to a live identity, and injects
/// `AuthenticatedUser` into request extensions.
///
/// A bad or missing token makes the request unauthenticated (401), never a
/// server error.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let identity = verify_bearer(state.store.as_ref(), &state.tokens, token).await?;

    request.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(request).await)
}
