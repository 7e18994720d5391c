//! Clap derive structures for the `flameboss` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// flameboss -- watch and control a Flame Boss smoker controller
#[derive(Debug, Parser)]
#[command(
    name = "flameboss",
    version,
    about = "Monitor a Flame Boss smoker controller from the command line",
    long_about = "Reads the current cook from the Flame Boss cloud API and shows pit,\n\
        meat and fan readings, either once or continuously.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "FLAMEBOSS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "FLAMEBOSS_BASE_URL", global = true, hide_env = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLAMEBOSS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain `key=value` lines (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, find the controller and save the account
    Login(LoginArgs),

    /// Log in again with the stored username after the token was rejected
    Reauth,

    /// Show the current cook once
    #[command(alias = "st")]
    Status,

    /// Keep polling and print each new reading
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Change the pit set-point
    SetTemp(SetTempArgs),

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account login (prompted when omitted)
    #[arg(long, short = 'u', env = "FLAMEBOSS_USERNAME")]
    pub username: Option<String>,

    /// Where to keep the password for later re-authentication
    /// (prompted when interactive)
    #[arg(long)]
    pub store_password: Option<PasswordStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PasswordStore {
    /// System keyring
    Keyring,
    /// Config file, in plaintext
    Plaintext,
    /// Do not keep it
    None,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Exit after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── SetTemp ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetTempArgs {
    /// Target pit temperature in °F
    #[arg(value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub temp: i32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (secrets masked)
    Show,
    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
