//! Output formatting: table, JSON, plain.
//!
//! Renders a snapshot in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits `key=value` lines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use flameboss_core::{Reading, RefreshState, Snapshot, readings};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Reading")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn format_value(reading: &Reading) -> String {
    match (reading.value, reading.unit) {
        (Some(v), Some(unit)) => format!("{v}{unit}"),
        (Some(v), None) => v.to_string(),
        (None, _) => "-".into(),
    }
}

/// Serialized shape for `--output json`.
#[derive(Serialize)]
struct StatusView<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    readings: Vec<Reading>,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one snapshot in the chosen format.
pub fn render_snapshot(format: OutputFormat, snapshot: &Snapshot, color: bool) -> String {
    let all = readings::readings(snapshot);
    match format {
        OutputFormat::Table => {
            let rows: Vec<ReadingRow> = all
                .iter()
                .map(|r| ReadingRow {
                    name: r.name,
                    value: format_value(r),
                })
                .collect();
            let header = title_line(snapshot, color);
            format!("{header}\n{}", Table::new(rows).with(Style::rounded()))
        }
        OutputFormat::Json => render_json(&StatusView { snapshot, readings: all }, false),
        OutputFormat::JsonCompact => render_json(&StatusView { snapshot, readings: all }, true),
        OutputFormat::Plain => all
            .iter()
            .map(|r| {
                let value = r.value.map(|v| v.to_string()).unwrap_or_default();
                format!("{}={value}", r.key)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// One-line summary for `watch` in table mode.
pub fn render_watch_line(snapshot: &Snapshot, color: bool) -> String {
    let time = snapshot
        .timestamp
        .map_or_else(|| "--:--:--".to_owned(), |t| t.format("%H:%M:%S").to_string());
    if !snapshot.online {
        return format!("{time}  {}", state_word(false, color));
    }

    let temp = |v: Option<i32>| v.map_or_else(|| "-".to_owned(), |t| format!("{t}°F"));
    let meats = snapshot
        .meat_temps()
        .iter()
        .map(|t| temp(*t))
        .collect::<Vec<_>>()
        .join(" / ");
    let fan = snapshot
        .fan_duty_percent
        .map_or_else(|| "-".to_owned(), |f| format!("{f}%"));

    format!(
        "{time}  pit {} (set {})  meat {meats}  fan {fan}",
        temp(snapshot.pit_temp),
        temp(snapshot.pit_set_temp),
    )
}

/// Warning line when a refresh failed and the shown data is old.
pub fn render_state(state: &RefreshState, color: bool) -> Option<String> {
    let text = match state {
        RefreshState::Stale { reason } => format!("stale: {reason}"),
        RefreshState::ReauthRequired { reason } => {
            format!("{reason} (run `flameboss reauth`)")
        }
        RefreshState::Idle | RefreshState::Refreshing => return None,
    };
    Some(if color {
        text.yellow().to_string()
    } else {
        text
    })
}

fn title_line(snapshot: &Snapshot, color: bool) -> String {
    let title = if color {
        snapshot.title.bold().to_string()
    } else {
        snapshot.title.clone()
    };
    let mut line = format!("{title}  [{}]", state_word(snapshot.online, color));
    if let Some(ts) = snapshot.timestamp {
        line.push_str(&format!("  {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    line
}

fn state_word(online: bool, color: bool) -> String {
    match (online, color) {
        (true, true) => readings::ONLINE.green().to_string(),
        (false, true) => readings::OFFLINE.red().to_string(),
        (true, false) => readings::ONLINE.to_owned(),
        (false, false) => readings::OFFLINE.to_owned(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            online: true,
            pit_temp: Some(225),
            pit_set_temp: Some(250),
            meat_temp1: Some(160),
            fan_duty_percent: Some(40),
            ..Snapshot::offline("Brisket")
        }
    }

    #[test]
    fn plain_output_lists_every_reading() {
        let out = render_snapshot(OutputFormat::Plain, &snapshot(), false);
        assert!(out.contains("online=Online"));
        assert!(out.contains("pit_temp=225"));
        assert!(out.contains("meat_temp2="));
        assert!(out.contains("fan_speed=40"));
    }

    #[test]
    fn table_output_has_units() {
        let out = render_snapshot(OutputFormat::Table, &snapshot(), false);
        assert!(out.starts_with("Brisket  [Online]"));
        assert!(out.contains("225°F"));
        assert!(out.contains("40%"));
    }

    #[test]
    fn json_output_carries_snapshot_fields() {
        let out = render_snapshot(OutputFormat::JsonCompact, &snapshot(), false);
        assert!(out.contains("\"pit_set_temp\":250"));
        assert!(out.contains("\"key\":\"fan_speed\""));
    }

    #[test]
    fn watch_line_offline() {
        let line = render_watch_line(&Snapshot::offline("Brisket"), false);
        assert!(line.ends_with("Offline"));
    }

    #[test]
    fn healthy_state_is_silent() {
        assert!(render_state(&RefreshState::Idle, false).is_none());
        let stale = RefreshState::Stale {
            reason: "timed out".into(),
        };
        assert_eq!(render_state(&stale, false).as_deref(), Some("stale: timed out"));
    }
}
