//! `watch`: connect, then print every refreshed snapshot until interrupted.

use flameboss_core::{Controller, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

fn render(format: OutputFormat, snapshot: &Snapshot, color: bool) -> String {
    match format {
        OutputFormat::Table => output::render_watch_line(snapshot, color),
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::render_snapshot(OutputFormat::JsonCompact, snapshot, color)
        }
        OutputFormat::Plain => output::render_snapshot(OutputFormat::Plain, snapshot, color),
    }
}

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    if let Some(secs) = args.interval {
        cfg.polling.interval_secs = secs;
    }
    let controller = Controller::new(config::controller_config(&cfg, global)?)?;
    let color = output::should_color(global.color);

    let mut updates = controller.subscribe();
    let mut states = controller.watch_state();
    controller.connect().await?;

    let mut seen = 0_usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            snapshot = updates.changed() => {
                let Some(snapshot) = snapshot else { break };
                output::print_output(&render(global.output, &snapshot, color), global.quiet);
                seen += 1;
                if args.count.is_some_and(|n| seen >= n) {
                    break;
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                if let Some(line) = output::render_state(&state, color) {
                    eprintln!("{line}");
                }
            }
        }
    }

    controller.disconnect().await;
    Ok(())
}
