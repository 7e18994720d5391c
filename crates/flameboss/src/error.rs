//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use flameboss_config::ConfigError;
use flameboss_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Flame Boss API")]
    #[diagnostic(
        code(flameboss::connection_failed),
        help("Check your network connection.\nCause: {reason}")
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(flameboss::timeout),
        help("Raise polling.timeout_secs in the config file or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(flameboss::auth_failed),
        help(
            "The stored token may have expired.\n\
             Run: flameboss reauth   (or flameboss login to start over)"
        )
    )]
    AuthFailed { message: String },

    #[error("No account configured")]
    #[diagnostic(
        code(flameboss::not_onboarded),
        help("Run: flameboss login\nExpected config at: {path}")
    )]
    NotOnboarded { path: String },

    #[error("No password available for '{username}'")]
    #[diagnostic(
        code(flameboss::no_password),
        help(
            "Set FLAMEBOSS_PASSWORD, or run flameboss login with \
             --store-password keyring."
        )
    )]
    NoPassword { username: String },

    // ── Data ─────────────────────────────────────────────────────────

    #[error("Not found: {what}")]
    #[diagnostic(
        code(flameboss::not_found),
        help("Start a cook on the controller, or check the account in the Flame Boss app.")
    )]
    NotFound { what: String },

    #[error("API error: {message}")]
    #[diagnostic(code(flameboss::api_error))]
    Api { message: String },

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(flameboss::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(flameboss::config))]
    Config(ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotOnboarded { .. } | Self::NoPassword { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err.root_cause().clone() {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { what } => CliError::NotFound { what },
            CoreError::Api { message, status } => CliError::Api {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotOnboarded => CliError::NotOnboarded {
                path: flameboss_config::config_path().display().to_string(),
            },
            ConfigError::NoPassword { username } => CliError::NoPassword { username },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_wrappers_are_unwrapped() {
        let err: CliError = CoreError::SetupFailed {
            source: Box::new(CoreError::AuthenticationFailed {
                message: "token rejected (HTTP 401 Unauthorized)".into(),
            }),
        }
        .into();
        assert!(matches!(err, CliError::AuthFailed { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn exit_codes() {
        let err: CliError = CoreError::Timeout { timeout_secs: 10 }.into();
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);

        let err: CliError = CoreError::NotFound {
            what: "no cook sessions on this account".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err: CliError = ConfigError::NotOnboarded.into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
