//! Integration tests — drive the auth router end-to-end against the
//! in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use quill_api::{AppState, config::ApiConfig};
use quill_core::notify::{Notifier, NotifyError};
use quill_core::store::IdentityStore;
use quill_core::store::memory::MemoryIdentityStore;

/// Captures outbound mail so tests can fish the reset link out of the body.
#[derive(Default)]
struct CaptureNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for CaptureNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex")
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Always fails, for the rollback path.
struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay refused".into()))
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: String::new(),
        token_secret: "test-secret".into(),
        token_ttl_secs: 3600,
        reset_token_ttl_secs: 600,
        public_base_url: "http://localhost:5173".into(),
    }
}

struct TestApp {
    app: Router,
    store: Arc<MemoryIdentityStore>,
    mail: Arc<CaptureNotifier>,
}

fn test_app() -> TestApp {
    let store = Arc::new(MemoryIdentityStore::new());
    let mail = Arc::new(CaptureNotifier::default());
    let state = AppState::new(test_config(), store.clone(), mail.clone());
    TestApp {
        app: quill_api::router(state),
        store,
        mail,
    }
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn get_with_bearer(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, body)
}

async fn signup(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let (status, body) = post_json(
        app,
        "/auth/signup",
        json!({"username": username, "email": email, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body
}

#[tokio::test]
async fn signup_login_status_round_trip() {
    let t = test_app();

    let signed_up = signup(&t.app, "alice", "alice@example.com", "correct horse").await;
    let user_id = signed_up["user"]["id"].as_str().expect("user id");
    assert_eq!(signed_up["tokenType"], "Bearer");
    assert!(
        signed_up["user"].get("passwordHash").is_none(),
        "password hash must never leave the subsystem"
    );

    // The hash exists in the store; only the response strips it.
    let stored = t.store.find_by_id(user_id).await.unwrap().unwrap();
    assert!(stored.password_hash.is_some());

    let (status, login) = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "alice@example.com", "password": "correct horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().expect("token");

    let (status, status_body) = get_with_bearer(&t.app, "/auth/status", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_body["loggedIn"], true);
    assert_eq!(status_body["user"]["id"], user_id);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let t = test_app();
    signup(&t.app, "alice", "alice@example.com", "correct horse").await;

    let (status, body) = post_json(
        &t.app,
        "/auth/signup",
        json!({"username": "other", "email": "alice@example.com", "password": "correct horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let t = test_app();
    signup(&t.app, "alice", "alice@example.com", "correct horse").await;

    let wrong_password = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "alice@example.com", "password": "wrong"}),
    )
    .await;
    let unknown_email = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "nobody@example.com", "password": "wrong"}),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.0, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.1, unknown_email.1,
        "failure bodies must not reveal which field was wrong"
    );
}

#[tokio::test]
async fn bad_bearer_is_unauthorized_not_server_error() {
    let t = test_app();

    let (status, _) = get_with_bearer(&t.app, "/auth/status", "garbage-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/auth/status")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unresolvable_subject_fails_closed() {
    let t = test_app();
    let signed_up = signup(&t.app, "alice", "alice@example.com", "correct horse").await;
    let token = signed_up["token"].as_str().expect("token");

    // Same signing secret, empty store: the signature is valid but the
    // subject no longer resolves (account deleted by a collaborator).
    let empty = AppState::new(
        test_config(),
        Arc::new(MemoryIdentityStore::new()),
        Arc::new(CaptureNotifier::default()),
    );
    let empty_app = quill_api::router(empty);

    let (status, _) = get_with_bearer(&empty_app, "/auth/status", token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn reset_secret_from_mail(body: &str) -> String {
    let marker = "/reset-password/";
    let start = body.find(marker).expect("reset link in mail") + marker.len();
    body[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect()
}

#[tokio::test]
async fn forgot_then_reset_password_flow() {
    let t = test_app();
    signup(&t.app, "alice", "alice@example.com", "old password").await;

    let (status, _) = post_json(
        &t.app,
        "/auth/forgot-password",
        json!({"email": "alice@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let secret = {
        let sent = t.mail.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
        reset_secret_from_mail(&sent[0].2)
    };

    let (status, reset) = post_json(
        &t.app,
        &format!("/auth/reset-password/{secret}"),
        json!({"password": "new password"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reset["token"].is_string(), "reset logs the user in");

    // Old password is gone, new one works.
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "alice@example.com", "password": "old password"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "alice@example.com", "password": "new password"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The secret is single-use.
    let (status, _) = post_json(
        &t.app,
        &format!("/auth/reset-password/{secret}"),
        json!({"password": "another password"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_password_hides_account_existence() {
    let t = test_app();
    signup(&t.app, "alice", "alice@example.com", "correct horse").await;

    let known = post_json(
        &t.app,
        "/auth/forgot-password",
        json!({"email": "alice@example.com"}),
    )
    .await;
    let unknown = post_json(
        &t.app,
        "/auth/forgot-password",
        json!({"email": "nobody@example.com"}),
    )
    .await;

    assert_eq!(known.0, StatusCode::OK);
    assert_eq!(unknown.0, StatusCode::OK);
    assert_eq!(known.1, unknown.1, "responses must be identical");
}

#[tokio::test]
async fn notifier_failure_rolls_back_ticket() {
    let store = Arc::new(MemoryIdentityStore::new());
    let state = AppState::new(test_config(), store.clone(), Arc::new(FailingNotifier));
    let app = quill_api::router(state);

    signup(&app, "alice", "alice@example.com", "correct horse").await;

    let (status, body) = post_json(
        &app,
        "/auth/forgot-password",
        json!({"email": "alice@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "notification_failed");

    // No unusable ticket is left behind.
    let identity = store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(identity.reset_ticket.is_none());
}

#[tokio::test]
async fn federated_login_links_and_conflicts() {
    let t = test_app();
    signup(&t.app, "alice", "alice@example.com", "correct horse").await;

    // A federated profile over a password account's email must not merge.
    let (status, _) = post_json(
        &t.app,
        "/auth/federated",
        json!({
            "providerSubjectId": "provider-1",
            "email": "alice@example.com",
            "displayName": "Alice"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A fresh email creates a federated identity...
    let (status, first) = post_json(
        &t.app,
        "/auth/federated",
        json!({
            "providerSubjectId": "provider-2",
            "email": "carol@example.com",
            "displayName": "Carol"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["user"]["kind"], "federated");

    // ...and the same subject maps back onto it.
    let (status, second) = post_json(
        &t.app,
        "/auth/federated",
        json!({
            "providerSubjectId": "provider-2",
            "email": "carol@example.com",
            "displayName": "Carol"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["user"]["id"], second["user"]["id"]);

    // Password login stays closed for federated accounts.
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        json!({"email": "carol@example.com", "password": "anything at all"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
