//! `login` and `reauth`: obtain a token and persist the account.

use std::io::IsTerminal;
use std::time::Duration;

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use flameboss_config::{Config, ConfigError, PASSWORD_ENV};
use flameboss_core::{Controller, TransportConfig, onboard};

use crate::cli::{GlobalOpts, LoginArgs, PasswordStore};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Password from `FLAMEBOSS_PASSWORD`, else prompted.
fn read_password() -> Result<SecretString, CliError> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }
    if !interactive() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: format!("no terminal to prompt on; set {PASSWORD_ENV}"),
        });
    }

    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pass))
}

fn prompt_store() -> Result<PasswordStore, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store it",
    ];
    let selection = Select::new()
        .with_prompt("Keep the password for re-authentication?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    Ok(match selection {
        0 => PasswordStore::Keyring,
        1 => PasswordStore::Plaintext,
        _ => PasswordStore::None,
    })
}

/// Record the chosen password storage on the account.
///
/// A keyring failure only costs the stored password; the freshly obtained
/// token is still saved by the caller.
fn apply_store(
    cfg: &mut Config,
    store: PasswordStore,
    username: &str,
    password: &SecretString,
    keyring: impl FnOnce(&str, &SecretString) -> Result<(), ConfigError>,
) {
    let plaintext = match store {
        PasswordStore::Keyring => {
            match keyring(username, password) {
                Ok(()) => eprintln!("   ✓ password stored in system keyring"),
                Err(e) => {
                    warn!(error = %e, "keyring unavailable, password not stored");
                    eprintln!("   ! could not store password in keyring: {e}");
                }
            }
            None
        }
        PasswordStore::Plaintext => Some(password.expose_secret().to_owned()),
        PasswordStore::None => None,
    };
    if let Some(acct) = cfg.account.as_mut() {
        acct.password = plaintext;
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;

    let username = match args.username {
        Some(u) => u,
        None if interactive() => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
        None => {
            return Err(CliError::Validation {
                field: "username".into(),
                reason: "pass --username or set FLAMEBOSS_USERNAME".into(),
            });
        }
    };
    let password = read_password()?;

    let base_url: url::Url = cfg.polling.base_url.parse().map_err(|_| CliError::Validation {
        field: "polling.base_url".into(),
        reason: format!("invalid URL: {}", cfg.polling.base_url),
    })?;
    let transport =
        TransportConfig::with_timeout(Duration::from_secs(cfg.polling.request_timeout_secs));

    let account = onboard(base_url, &username, &password, &transport).await?;
    cfg.set_account(&account);

    let store = match args.store_password {
        Some(store) => store,
        None if interactive() => prompt_store()?,
        None => PasswordStore::None,
    };
    apply_store(&mut cfg, store, &username, &password, flameboss_config::store_password);

    let path = config::save(&cfg, global)?;
    let device = account.credentials.device_id.as_deref().unwrap_or("?");
    output::print_output(
        &format!(
            "Logged in as {username} (controller {device})\nConfig saved to {}",
            path.display()
        ),
        global.quiet,
    );
    Ok(())
}

pub async fn reauth(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    let controller_config = config::controller_config(&cfg, global)?;
    let account = cfg.account.as_ref().ok_or_else(|| CliError::NotOnboarded {
        path: config::config_path(global).display().to_string(),
    })?;

    let password = match flameboss_config::resolve_password(account) {
        Ok(pw) => pw,
        Err(ConfigError::NoPassword { .. }) if interactive() => read_password()?,
        Err(e) => return Err(e.into()),
    };

    let controller = Controller::new(controller_config)?;
    let renewed = controller.reauthenticate(&password).await?;
    cfg.set_account(&renewed);

    let path = config::save(&cfg, global)?;
    output::print_output(
        &format!("Re-authenticated; config saved to {}", path.display()),
        global.quiet,
    );
    Ok(())
}
