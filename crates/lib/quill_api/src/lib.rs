//! # quill_api
//!
//! HTTP API library for Quill.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use quill_core::auth::reset::ResetTokenLedger;
use quill_core::auth::token::TokenService;
use quill_core::notify::Notifier;
use quill_core::store::IdentityStore;

use crate::config::ApiConfig;
use crate::handlers::{auth, federated, password};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdentityStore>,
    pub notifier: Arc<dyn Notifier>,
    pub tokens: Arc<TokenService>,
    pub reset: Arc<ResetTokenLedger>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wire up state from a config plus the store/notifier collaborators.
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn IdentityStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let auth_config = config.auth_config();
        Self {
            store,
            notifier,
            tokens: Arc::new(TokenService::new(&auth_config)),
            reset: Arc::new(ResetTokenLedger::new(&auth_config)),
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/federated", post(federated::federated_login_handler))
        .route(
            "/auth/forgot-password",
            post(password::forgot_password_handler),
        )
        .route(
            "/auth/reset-password/{secret}",
            post(password::reset_password_handler),
        );

    // Protected routes (require a bearer token)
    let protected = Router::new()
        .route("/auth/status", get(auth::status_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
