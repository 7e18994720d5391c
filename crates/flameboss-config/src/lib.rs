//! Persisted configuration for Flame Boss tools.
//!
//! One TOML file holding the onboarded account and polling settings,
//! password resolution (env + keyring + plaintext), and translation to
//! `flameboss_core::ControllerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use flameboss_core::{AccountCredentials, ControllerConfig, Credentials, DEFAULT_BASE_URL};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "flameboss";
/// Environment variable consulted first for the account password.
pub const PASSWORD_ENV: &str = "FLAMEBOSS_PASSWORD";
/// Prefix for environment overrides, e.g. `FLAMEBOSS_POLLING__INTERVAL_SECS`.
pub const ENV_PREFIX: &str = "FLAMEBOSS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no account configured; run `flameboss login` first")]
    NotOnboarded,

    #[error("no password available for '{username}'")]
    NoPassword { username: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Written by onboarding; absent until the first login.
    pub account: Option<Account>,

    #[serde(default)]
    pub polling: Polling,
}

/// The onboarded account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub username: String,

    pub user_id: Option<i64>,

    /// Session token from login.
    pub auth_token: Option<String>,

    /// Controller id from device discovery.
    pub device_id: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Polling {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Bound on one whole refresh.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            timeout_secs: default_timeout(),
            request_timeout_secs: default_request_timeout(),
            base_url: default_base_url(),
        }
    }
}

fn default_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    10
}
fn default_request_timeout() -> u64 {
    30
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Config {
    /// Replace the account section with fresh onboarding results.
    ///
    /// A plaintext password already in the file is kept when the username
    /// is unchanged; everything else is overwritten.
    pub fn set_account(&mut self, onboarded: &AccountCredentials) {
        let creds = &onboarded.credentials;
        let password = self
            .account
            .take()
            .filter(|a| a.username == creds.username)
            .and_then(|a| a.password);

        self.account = Some(Account {
            username: creds.username.clone(),
            user_id: Some(onboarded.user_id),
            auth_token: Some(creds.auth_token.expose_secret().to_owned()),
            device_id: creds.device_id.clone(),
            password,
        });
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "flameboss", "flameboss").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("flameboss");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path, layering defaults → file → environment.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the account password: env var, then keyring, then plaintext.
pub fn resolve_password(account: &Account) -> Result<SecretString, ConfigError> {
    password_from_sources(
        std::env::var(PASSWORD_ENV).ok(),
        || keyring_password(&account.username),
        account,
    )
}

fn password_from_sources(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    account: &Account,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Some(pw) = env {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Some(pw) = keyring() {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = account.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        username: account.username.clone(),
    })
}

fn keyring_entry(username: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{username}/password"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

fn keyring_password(username: &str) -> Option<String> {
    match keyring_entry(username).ok()?.get_password() {
        Ok(pw) => Some(pw),
        Err(e) => {
            debug!(error = %e, "no keyring password");
            None
        }
    }
}

/// Store the account password in the system keyring.
pub fn store_password(username: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(username)?
        .set_password(password.expose_secret())
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// The stored token, username and device id.
pub fn resolve_credentials(account: &Account) -> Result<Credentials, ConfigError> {
    let token = account
        .auth_token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or(ConfigError::NotOnboarded)?;

    Ok(Credentials {
        username: account.username.clone(),
        auth_token: SecretString::from(token),
        device_id: account.device_id.clone(),
    })
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Build a `ControllerConfig` from the loaded file.
pub fn to_controller_config(cfg: &Config) -> Result<ControllerConfig, ConfigError> {
    let account = cfg.account.as_ref().ok_or(ConfigError::NotOnboarded)?;
    let polling = &cfg.polling;

    let base_url: url::Url = polling
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "polling.base_url".into(),
            reason: format!("invalid URL: {}", polling.base_url),
        })?;

    Ok(ControllerConfig {
        base_url,
        credentials: resolve_credentials(account)?,
        poll_interval: positive_secs("polling.interval_secs", polling.interval_secs)?,
        refresh_timeout: positive_secs("polling.timeout_secs", polling.timeout_secs)?,
        request_timeout: positive_secs(
            "polling.request_timeout_secs",
            polling.request_timeout_secs,
        )?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn account() -> Account {
        Account {
            username: "pitmaster".into(),
            user_id: Some(11),
            auth_token: Some("tok-123".into()),
            device_id: Some("42".into()),
            password: Some("plain".into()),
        }
    }

    fn onboarded(username: &str, token: &str) -> AccountCredentials {
        AccountCredentials {
            user_id: 12,
            credentials: Credentials {
                username: username.into(),
                auth_token: SecretString::from(token.to_string()),
                device_id: Some("43".into()),
            },
        }
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert!(cfg.account.is_none());
        assert_eq!(cfg.polling.interval_secs, 30);
        assert_eq!(cfg.polling.timeout_secs, 10);
        assert_eq!(cfg.polling.request_timeout_secs, 30);
        assert_eq!(cfg.polling.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[account]\nusername = \"pitmaster\"\nauth_token = \"tok\"\n\n[polling]\ninterval_secs = 60\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.account.unwrap().username, "pitmaster");
        assert_eq!(cfg.polling.interval_secs, 60);
        assert_eq!(cfg.polling.timeout_secs, 10);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.account.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.set_account(&onboarded("pitmaster", "tok-abc"));

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        let acct = loaded.account.unwrap();
        assert_eq!(acct.auth_token.as_deref(), Some("tok-abc"));
        assert_eq!(acct.device_id.as_deref(), Some("43"));
        assert_eq!(acct.user_id, Some(12));
    }

    #[test]
    fn set_account_keeps_password_for_same_user() {
        let mut cfg = Config {
            account: Some(account()),
            polling: Polling::default(),
        };

        cfg.set_account(&onboarded("pitmaster", "tok-new"));
        let acct = cfg.account.as_ref().unwrap();
        assert_eq!(acct.auth_token.as_deref(), Some("tok-new"));
        assert_eq!(acct.password.as_deref(), Some("plain"));

        cfg.set_account(&onboarded("someone-else", "tok-other"));
        assert_eq!(cfg.account.unwrap().password, None);
    }

    #[test]
    fn password_precedence() {
        let acct = account();

        let pw = password_from_sources(Some("env".into()), || Some("ring".into()), &acct).unwrap();
        assert_eq!(pw.expose_secret(), "env");

        let pw = password_from_sources(None, || Some("ring".into()), &acct).unwrap();
        assert_eq!(pw.expose_secret(), "ring");

        let pw = password_from_sources(None, || None, &acct).unwrap();
        assert_eq!(pw.expose_secret(), "plain");

        let bare = Account {
            password: None,
            ..acct
        };
        assert!(matches!(
            password_from_sources(None, || None, &bare),
            Err(ConfigError::NoPassword { .. })
        ));
    }

    #[test]
    fn controller_config_from_file() {
        let cfg = Config {
            account: Some(account()),
            polling: Polling {
                interval_secs: 45,
                ..Polling::default()
            },
        };

        let cc = to_controller_config(&cfg).unwrap();

        assert_eq!(cc.base_url.as_str(), "https://myflameboss.com/");
        assert_eq!(cc.poll_interval, Duration::from_secs(45));
        assert_eq!(cc.refresh_timeout, Duration::from_secs(10));
        assert_eq!(cc.credentials.device_id.as_deref(), Some("42"));
        assert_eq!(cc.credentials.auth_token.expose_secret(), "tok-123");
    }

    #[test]
    fn controller_config_requires_account() {
        assert!(matches!(
            to_controller_config(&Config::default()),
            Err(ConfigError::NotOnboarded)
        ));

        let cfg = Config {
            account: Some(Account {
                auth_token: None,
                ..account()
            }),
            polling: Polling::default(),
        };
        assert!(matches!(to_controller_config(&cfg), Err(ConfigError::NotOnboarded)));
    }

    #[test]
    fn controller_config_validation() {
        let cfg = Config {
            account: Some(account()),
            polling: Polling {
                base_url: "not a url".into(),
                ..Polling::default()
            },
        };
        assert!(matches!(
            to_controller_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.base_url"
        ));

        let cfg = Config {
            account: Some(account()),
            polling: Polling {
                interval_secs: 0,
                ..Polling::default()
            },
        };
        assert!(matches!(
            to_controller_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.interval_secs"
        ));
    }
}
