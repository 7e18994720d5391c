//! CLI-aware config resolution: thin wrappers over `flameboss-config` that
//! honour `--config` and `--base-url`.

use std::path::PathBuf;

use flameboss_config::Config;
use flameboss_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(flameboss_config::config_path)
}

/// Load the config file with `--base-url` applied.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = flameboss_config::load_config_from(&config_path(global))?;
    if let Some(ref url) = global.base_url {
        cfg.polling.base_url.clone_from(url);
    }
    Ok(cfg)
}

pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<PathBuf, CliError> {
    let path = config_path(global);
    flameboss_config::save_config_to(cfg, &path)?;
    Ok(path)
}

/// Build a `ControllerConfig`, pointing a missing account at the right file.
pub fn controller_config(cfg: &Config, global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    flameboss_config::to_controller_config(cfg).map_err(|e| match e {
        flameboss_config::ConfigError::NotOnboarded => CliError::NotOnboarded {
            path: config_path(global).display().to_string(),
        },
        other => other.into(),
    })
}
