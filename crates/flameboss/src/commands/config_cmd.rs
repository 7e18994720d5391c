//! Config subcommand handlers.

use std::fmt::Write;

use flameboss_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref acct) = cfg.account {
        let _ = writeln!(out, "[account]");
        let _ = writeln!(out, "username = \"{}\"", acct.username);
        if let Some(id) = acct.user_id {
            let _ = writeln!(out, "user_id = {id}");
        }
        if acct.auth_token.is_some() {
            let _ = writeln!(out, "auth_token = \"****\"");
        }
        if let Some(ref device) = acct.device_id {
            let _ = writeln!(out, "device_id = \"{device}\"");
        }
        if acct.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        let _ = writeln!(out);
    }

    let p = &cfg.polling;
    let _ = writeln!(out, "[polling]");
    let _ = writeln!(out, "interval_secs = {}", p.interval_secs);
    let _ = writeln!(out, "timeout_secs = {}", p.timeout_secs);
    let _ = writeln!(out, "request_timeout_secs = {}", p.request_timeout_secs);
    let _ = write!(out, "base_url = \"{}\"", p.base_url);

    out
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
        }
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use flameboss_config::{Account, Polling};

    use super::*;

    #[test]
    fn secrets_are_masked() {
        let cfg = Config {
            account: Some(Account {
                username: "pitmaster".into(),
                user_id: Some(11),
                auth_token: Some("tok-secret".into()),
                device_id: Some("42".into()),
                password: Some("hunter2".into()),
            }),
            polling: Polling::default(),
        };

        let out = format_config_redacted(&cfg);

        assert!(out.contains("username = \"pitmaster\""));
        assert!(out.contains("device_id = \"42\""));
        assert!(!out.contains("tok-secret"));
        assert!(!out.contains("hunter2"));
    }
}
