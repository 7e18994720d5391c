//! `status`: one refresh, printed once.

use flameboss_core::Controller;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let controller = Controller::oneshot(config::controller_config(&cfg, global)?).await?;

    if let Some(snapshot) = controller.snapshot() {
        let color = output::should_color(global.color);
        let out = output::render_snapshot(global.output, &snapshot, color);
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
