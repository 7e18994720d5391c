mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Command::Login(args) => commands::login::handle(args, global).await,
        Command::Reauth => commands::login::reauth(global).await,
        Command::Status => commands::status::handle(global).await,
        Command::Watch(args) => commands::watch::handle(args, global).await,
        Command::SetTemp(args) => commands::set_temp::handle(args, global).await,
        Command::Config(ref args) => commands::config_cmd::handle(args, global),

        // Shell completions generation
        Command::Completions(ref args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "flameboss", &mut std::io::stdout());
            Ok(())
        }
    }
}
