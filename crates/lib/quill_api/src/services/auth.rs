//! Authentication service — boundary flows over the core components.
//!
//! Handlers stay thin; policy and sequencing live here, and the primitives
//! (hashing, tokens, the reset ledger) live in `quill_core::auth`.

use tracing::info;

use quill_core::auth::credentials::{self, normalize_email};
use quill_core::auth::federated::{self, FederatedProfile};
use quill_core::auth::password;
use quill_core::auth::reset::ResetTokenLedger;
use quill_core::auth::token::TokenService;
use quill_core::auth::AuthError;
use quill_core::models::identity::{AccountKind, Identity, NewIdentity, PublicIdentity};
use quill_core::notify::Notifier;
use quill_core::store::IdentityStore;

use crate::error::{AppError, AppResult};
use crate::models::{FederatedLoginRequest, MessageResponse, SignupRequest, TokenResponse};

/// Owner-or-admin check, re-exported for the post/comment glue.
pub use quill_core::auth::authorize::can_mutate;

const RESET_EMAIL_SUBJECT: &str = "Reset your password";

/// Build the response for a freshly authenticated identity.
fn token_response(tokens: &TokenService, identity: Identity) -> AppResult<TokenResponse> {
    let token = tokens.issue(&identity.id)?;
    Ok(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.ttl_secs(),
        user: identity.into_public().into(),
    })
}

/// Cheap email shape check mirroring the signup form: local@domain.tld,
/// no whitespace.
fn email_shape_ok(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

/// Create a new local account and log it in.
pub async fn signup(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    req: SignupRequest,
) -> AppResult<TokenResponse> {
    let username = req.username.trim().to_string();
    let email = normalize_email(&req.email);
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Username, email, and password are required".into(),
        ));
    }
    if !email_shape_ok(&email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    validate_password(&req.password)?;

    if store.find_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }
    if store.find_by_username(&username).await?.is_some() {
        return Err(AuthError::DuplicateUsername.into());
    }

    let hash = password::hash_password(&req.password)?;
    let identity = store
        .create(NewIdentity::local(
            &email,
            &username,
            &hash,
            req.profile_image_url.as_deref(),
        ))
        .await?;
    info!(identity = %identity.id, "new account registered");

    token_response(tokens, identity)
}

/// Authenticate with email + password.
pub async fn login(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    email: &str,
    password_plain: &str,
) -> AppResult<TokenResponse> {
    let identity = credentials::authenticate(store, email, password_plain).await?;
    info!(identity = %identity.id, "login succeeded");
    token_response(tokens, identity)
}

/// Verify a bearer token and resolve its subject to a live identity.
///
/// Fails closed: a valid signature whose subject no longer resolves is an
/// authentication failure, not a pass.
pub async fn verify_bearer(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    token: &str,
) -> AppResult<PublicIdentity> {
    let claims = tokens.verify(token)?;
    let identity = store
        .find_by_id(&claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;
    Ok(identity.into_public())
}

/// Generic acknowledgement returned whether or not the email resolves, so
/// this endpoint cannot be used to enumerate accounts.
fn forgot_ack() -> MessageResponse {
    MessageResponse {
        status: "success".to_string(),
        message: "If an account with that email exists, a password reset email has been sent."
            .to_string(),
    }
}

/// Start the password-reset flow for an email address.
///
/// Either fully succeeds (ticket persisted, mail dispatched, secret only
/// ever inside the mail) or fully fails with the ticket rolled back.
pub async fn forgot_password(
    store: &dyn IdentityStore,
    notifier: &dyn Notifier,
    ledger: &ResetTokenLedger,
    public_base_url: &str,
    email: &str,
) -> AppResult<MessageResponse> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    let Some(identity) = store.find_by_email(&email).await? else {
        return Ok(forgot_ack());
    };
    // Federated accounts have no password to reset; answer as if nothing
    // matched rather than reveal the account kind.
    if identity.kind == AccountKind::Federated {
        return Ok(forgot_ack());
    }

    let secret = ledger.issue(store, &identity).await?;
    let reset_url = format!("{public_base_url}/reset-password/{secret}");
    let body = format!(
        "You are receiving this email because a password reset was requested for your account.\n\n\
         Follow this link to choose a new password: {reset_url}\n\n\
         The link expires in {} minutes. If you did not request this, you can ignore this email.",
        ledger.ttl_secs() / 60
    );

    if let Err(send_err) = notifier.send(&identity.email, RESET_EMAIL_SUBJECT, &body).await {
        // The user never received the secret; leave no outstanding ticket
        // behind. A failing rollback surfaces as the store error instead.
        store.update_reset_ticket(&identity.id, None).await?;
        return Err(AppError::NotificationFailed(send_err.to_string()));
    }

    info!(identity = %identity.id, "password reset email dispatched");
    Ok(forgot_ack())
}

/// Complete the password-reset flow, consuming the secret exactly once.
/// Success leaves the user logged in with a fresh token.
pub async fn reset_password(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    ledger: &ResetTokenLedger,
    secret: &str,
    new_password: &str,
) -> AppResult<TokenResponse> {
    if new_password.is_empty() {
        return Err(AppError::Validation("New password is required".into()));
    }
    validate_password(new_password)?;

    let mut identity = ledger.consume(store, secret).await?;
    identity.password_hash = Some(password::hash_password(new_password)?);
    store.save(&identity).await?;
    info!(identity = %identity.id, "password reset completed");

    token_response(tokens, identity)
}

/// Log in (creating the account on first contact) with a verified federated
/// profile.
pub async fn link_federated(
    store: &dyn IdentityStore,
    tokens: &TokenService,
    req: FederatedLoginRequest,
) -> AppResult<TokenResponse> {
    if req.provider_subject_id.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Provider subject and email are required".into(),
        ));
    }
    let profile = FederatedProfile {
        provider_subject_id: req.provider_subject_id,
        email: req.email,
        display_name: req.display_name,
    };
    let identity = federated::link_or_create(store, &profile).await?;
    token_response(tokens, identity)
}
