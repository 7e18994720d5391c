//! `set-temp`: write the pit set-point.

use flameboss_core::Controller;

use crate::cli::{GlobalOpts, SetTempArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: SetTempArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let controller = Controller::new(config::controller_config(&cfg, global)?)?;

    controller.set_target_temperature(args.temp).await?;
    output::print_output(&format!("Pit set-point changed to {}°F", args.temp), global.quiet);
    Ok(())
}
