use thiserror::Error;

/// Top-level error type for the `flameboss-api` crate.
///
/// `flameboss-core` maps these into user-facing diagnostics and decides
/// which ones are retried on the next poll.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, token expired or revoked, or no session at all.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status that is not an auth failure.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The account has no device, or no cook session to read.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Operation attempted before the client was set up for it.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials need to be re-entered.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying on the next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Http { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_failures() {
        let err = Error::Authentication {
            message: "token expired".into(),
        };
        assert!(err.is_auth_failure());
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Http {
            status: 503,
            message: "maintenance".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_auth_failure());

        let err = Error::Http {
            status: 422,
            message: "bad temp".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_covers_empty_lists_and_404() {
        assert!(
            Error::NotFound {
                what: "cook session".into()
            }
            .is_not_found()
        );
        assert!(
            Error::Http {
                status: 404,
                message: String::new()
            }
            .is_not_found()
        );
        assert!(
            !Error::Configuration {
                message: "no device".into()
            }
            .is_not_found()
        );
    }
}
