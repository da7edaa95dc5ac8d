//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use rackwise_core::{Criticality, DeviceStatus, ServiceStatus};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn device_status(status: DeviceStatus, color: bool) -> String {
    let text = status.to_string();
    if !color {
        return text;
    }
    match status {
        DeviceStatus::Active => text.green().to_string(),
        DeviceStatus::Maintenance => text.yellow().to_string(),
        DeviceStatus::Inactive => text.dimmed().to_string(),
        DeviceStatus::Decommissioned => text.red().to_string(),
    }
}

pub fn service_status(status: ServiceStatus, color: bool) -> String {
    let text = status.to_string();
    if !color {
        return text;
    }
    match status {
        ServiceStatus::Active => text.green().to_string(),
        ServiceStatus::Maintenance => text.yellow().to_string(),
        ServiceStatus::Inactive => text.dimmed().to_string(),
        ServiceStatus::Planned => text.cyan().to_string(),
    }
}

pub fn criticality(level: Criticality, color: bool) -> String {
    let text = level.to_string();
    if !color {
        return text;
    }
    match level {
        Criticality::Critical => text.red().bold().to_string(),
        Criticality::High => text.red().to_string(),
        Criticality::Medium => text.yellow().to_string(),
        Criticality::Low => text.to_string(),
    }
}

/// Percentage with a traffic-light tint above 70% and 90%.
pub fn utilization(pct: f64, color: bool) -> String {
    let text = format!("{pct:.1}%");
    if !color {
        return text;
    }
    if pct >= 90.0 {
        text.red().to_string()
    } else if pct >= 70.0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
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

/// Print a confirmation line to stderr unless `--quiet`.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        id: String,
        units: u32,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "rack-1".into(),
                units: 42,
            },
            Row {
                id: "rack-2".into(),
                units: 24,
            },
        ]
    }

    fn copy(r: &Row) -> Row {
        Row {
            id: r.id.clone(),
            units: r.units,
        }
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(OutputFormat::Plain, &rows(), copy, |r| r.id.clone()).unwrap();
        assert_eq!(out, "rack-1\nrack-2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(OutputFormat::JsonCompact, &rows(), copy, |r| r.id.clone()).unwrap();
        assert_eq!(out, r#"[{"id":"rack-1","units":42},{"id":"rack-2","units":24}]"#);
    }

    #[test]
    fn table_contains_headers_and_values() {
        let out = render_list(OutputFormat::Table, &rows(), copy, |r| r.id.clone()).unwrap();
        assert!(out.contains("units"));
        assert!(out.contains("rack-2"));
    }

    #[test]
    fn uncolored_helpers_are_plain_text() {
        assert_eq!(device_status(DeviceStatus::Active, false), "Active");
        assert_eq!(criticality(Criticality::Critical, false), "Critical");
        assert_eq!(utilization(49.2, false), "49.2%");
    }
}
