//! Report rendering: table, JSON, plain.
//!
//! Table uses `tabled`, JSON serializes the `SyncReport` as-is, plain
//! emits one `gateway status` line per gateway.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use gwsync_core::{GatewayOutcome, GatewayReport, SyncReport};

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

fn paint_status(label: &str, color: bool) -> String {
    if !color {
        return label.to_owned();
    }
    match label {
        "synced" => label.green().to_string(),
        "planned" => label.cyan().to_string(),
        "skipped" => label.yellow().to_string(),
        "failed" => label.red().bold().to_string(),
        _ => label.to_owned(),
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Written")]
    written: String,
    #[tabled(rename = "Deleted")]
    deleted: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&GatewayReport> for GatewayRow {
    fn from(report: &GatewayReport) -> Self {
        let (written, deleted, details) = match &report.outcome {
            GatewayOutcome::Synced {
                written,
                deleted,
                warnings,
            } => (
                written.len().to_string(),
                list_or_dash(deleted),
                warnings.join("; "),
            ),
            GatewayOutcome::Planned { summary, warnings } => (
                format!(
                    "+{} ~{} ={}",
                    summary.created.len(),
                    summary.updated.len(),
                    summary.unchanged.len()
                ),
                list_or_dash(&summary.deleted),
                warnings.join("; "),
            ),
            GatewayOutcome::Skipped { reason } => ("-".into(), "-".into(), reason.clone()),
            GatewayOutcome::Failed { errors, warnings } => (
                "-".into(),
                "-".into(),
                errors.iter().chain(warnings).cloned().collect::<Vec<_>>().join("; "),
            ),
        };

        Self {
            gateway: report.gateway.clone(),
            status: report.outcome.label().to_owned(),
            written,
            deleted,
            details,
        }
    }
}

fn list_or_dash(keys: &[String]) -> String {
    if keys.is_empty() {
        "-".into()
    } else {
        keys.join(", ")
    }
}

// ── Render dispatcher ────────────────────────────────────────────────

/// Render a sync report in the chosen format.
pub fn render_report(
    format: OutputFormat,
    report: &SyncReport,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Plain => Ok(render_plain(report)),
        OutputFormat::Table => Ok(render_table(report, color)),
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

fn render_plain(report: &SyncReport) -> String {
    report
        .gateways
        .iter()
        .map(|g| format!("{} {}", g.gateway, g.outcome.label()))
        .chain(
            report
                .rejected_paths
                .iter()
                .map(|r| format!("{} rejected", r.path)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(report: &SyncReport, color: bool) -> String {
    let mut out = String::new();

    if report.gateways.is_empty() {
        out.push_str("No gateways touched by this change set.");
    } else {
        let rows: Vec<GatewayRow> = report.gateways.iter().map(GatewayRow::from).collect();
        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    }

    for rejected in &report.rejected_paths {
        out.push_str(&format!("\nignored {}: {}", rejected.path, rejected.reason));
    }

    let count = |label: &str| {
        report
            .gateways
            .iter()
            .filter(|g| g.outcome.label() == label)
            .count()
    };
    let summary = ["synced", "planned", "skipped", "failed"]
        .into_iter()
        .filter_map(|label| match count(label) {
            0 => None,
            n => Some(format!("{n} {}", paint_status(label, color))),
        })
        .collect::<Vec<_>>();
    if !summary.is_empty() {
        out.push('\n');
        out.push_str(&summary.join(", "));
    }

    out
}
