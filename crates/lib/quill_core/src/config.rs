//! Auth subsystem configuration.
//!
//! Built once at process start and passed by reference into the core
//! constructors; there is no module-level secret state.

/// Default bearer-token lifetime: 1 hour.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Default reset-secret lifetime: 10 minutes.
pub const DEFAULT_RESET_TTL_SECS: i64 = 10 * 60;

/// Tunables for token issuance and the password-reset ledger.
///
/// The two lifetimes are independent knobs; neither derives from the other.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens.
    pub token_secret: String,
    /// Bearer-token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Reset-secret lifetime in seconds.
    pub reset_ttl_secs: i64,
}

impl AuthConfig {
    /// Config with the given signing secret and default lifetimes.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            reset_ttl_secs: DEFAULT_RESET_TTL_SECS,
        }
    }
}
