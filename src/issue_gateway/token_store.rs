//! Feedback bot token: resolution order, process-wide install and OS keyring storage.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Environment variable carrying the bot token at runtime or at build time.
pub const TOKEN_ENV: &str = "INAPP_FEEDBACK_TOKEN";
/// Set to `1`/`true` to skip the OS keyring entirely.
pub const DISABLE_KEYRING_ENV: &str = "INAPP_FEEDBACK_DISABLE_KEYRING";

const BUILD_TIME_TOKEN: Option<&str> = option_env!("INAPP_FEEDBACK_TOKEN");
const KEYRING_SERVICE: &str = "inapp-feedback";
const KEYRING_KEY: &str = "github_feedback_token";

static GLOBAL_TOKEN: OnceLock<AuthToken> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(
        "No feedback token configured; set INAPP_FEEDBACK_TOKEN or run `inapp-feedback-token set`"
    )]
    Missing,
    #[error("Token must not be blank")]
    Blank,
    #[error("Token store unavailable: {0}")]
    Unavailable(String),
}

/// Access token of the bot account that opens feedback issues.
///
/// The value never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Arc<str>);

impl AuthToken {
    /// Wrap a token, trimming whitespace. Blank input yields `None`.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Arc::from(trimmed)))
    }

    /// Raw token, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Find a token from the environment, the build, or the OS keyring, in that order.
    pub fn resolve() -> Result<Self, TokenError> {
        let store = KeyringTokenStore::new();
        resolve_with(std::env::var(TOKEN_ENV).ok(), BUILD_TIME_TOKEN, || store.get())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Resolve the token once and keep it for the rest of the process.
///
/// Later calls return the installed token without consulting any source.
pub fn install_global() -> Result<&'static AuthToken, TokenError> {
    if let Some(token) = GLOBAL_TOKEN.get() {
        return Ok(token);
    }
    let token = AuthToken::resolve()?;
    Ok(GLOBAL_TOKEN.get_or_init(|| token))
}

fn resolve_with(
    runtime: Option<String>,
    build_time: Option<&str>,
    keyring: impl FnOnce() -> Result<Option<String>, TokenError>,
) -> Result<AuthToken, TokenError> {
    if let Some(token) = runtime.as_deref().and_then(AuthToken::new) {
        tracing::debug!("Feedback token taken from {TOKEN_ENV}");
        return Ok(token);
    }
    if let Some(token) = build_time.and_then(AuthToken::new) {
        tracing::debug!("Feedback token taken from build configuration");
        return Ok(token);
    }
    match keyring() {
        Ok(Some(value)) => {
            if let Some(token) = AuthToken::new(&value) {
                tracing::debug!("Feedback token taken from OS keyring");
                return Ok(token);
            }
        }
        Ok(None) => {}
        Err(err) => tracing::warn!("Keyring lookup for feedback token failed: {err}"),
    }
    Err(TokenError::Missing)
}

/// OS keyring entry holding the feedback token.
#[derive(Clone, Debug, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self) -> Result<Option<String>, TokenError> {
        if keyring_disabled() {
            return Ok(None);
        }
        match entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(TokenError::Unavailable(err.to_string())),
        }
    }

    pub fn set(&self, token: &str) -> Result<(), TokenError> {
        let token = AuthToken::new(token).ok_or(TokenError::Blank)?;
        if keyring_disabled() {
            return Err(TokenError::Unavailable("keyring disabled".into()));
        }
        entry()?
            .set_password(token.expose())
            .map_err(|err| TokenError::Unavailable(err.to_string()))
    }

    pub fn delete(&self) -> Result<(), TokenError> {
        if keyring_disabled() {
            return Ok(());
        }
        match entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(TokenError::Unavailable(err.to_string())),
        }
    }
}

fn entry() -> Result<keyring::Entry, TokenError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY)
        .map_err(|err| TokenError::Unavailable(err.to_string()))
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
