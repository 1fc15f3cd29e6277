//! Outbound notification collaborators.
//!
//! The reset flow dispatches its secret link through the `Notifier` trait;
//! it never sees transport details.

pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Notification transport errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// Outbound email transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Development notifier: logs the envelope instead of sending.
///
/// The body is deliberately not logged — reset mails carry the secret link.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), NotifyError> {
        info!(to, subject, "mail dispatch skipped (log notifier)");
        Ok(())
    }
}
