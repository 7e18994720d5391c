// ── Core error types ──
//
// User-facing errors from flameboss-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<flameboss_api::Error>`
// impl translates them into domain variants. The type is `Clone` because a
// single refresh outcome is handed to every caller that joined it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Flame Boss API: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Refresh timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Refresh outcomes ─────────────────────────────────────────────
    /// A periodic refresh failed; the previous snapshot is still served.
    #[error("Update failed: {source}")]
    UpdateFailed { source: Box<CoreError> },

    /// The initial refresh failed, so there is nothing to serve.
    #[error("Setup failed: {source}")]
    SetupFailed { source: Box<CoreError> },

    #[error("Polling has been shut down")]
    ShutDown,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The underlying failure, looking through refresh wrappers.
    pub fn root_cause(&self) -> &CoreError {
        match self {
            Self::UpdateFailed { source } | Self::SetupFailed { source } => source.root_cause(),
            other => other,
        }
    }

    /// Returns `true` if the stored credentials must be re-entered before
    /// polling can succeed again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self.root_cause(), Self::AuthenticationFailed { .. })
    }

    /// Returns `true` if the next scheduled poll may well succeed.
    pub fn is_transient(&self) -> bool {
        match self.root_cause() {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => status.is_none_or(|s| s >= 500 || s == 429),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<flameboss_api::Error> for CoreError {
    fn from(err: flameboss_api::Error) -> Self {
        match err {
            flameboss_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            flameboss_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            flameboss_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            flameboss_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            flameboss_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            flameboss_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            flameboss_api::Error::NotFound { what } => CoreError::NotFound { what },
            flameboss_api::Error::Configuration { message } => CoreError::Config { message },
            flameboss_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unexpected response: {message}"),
                status: None,
            },
        }
    }
}
