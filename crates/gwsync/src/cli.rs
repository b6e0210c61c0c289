//! Clap derive structures for the `gwsync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use clap_complete::Shell;

use gwsync_core::FileChange;

use crate::error::CliError;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gwsync -- converge ThingsBoard gateway connectors to a config repository
#[derive(Debug, Parser)]
#[command(
    name = "gwsync",
    version,
    about = "Sync ThingsBoard gateway connectors from changed config files",
    long_about = "Pushes connector definitions for every gateway touched by a change set.\n\n\
        CHANGES are alternating STATUS PATH pairs, as printed by\n\
        `git diff --name-status`, e.g.:\n\n    \
        gwsync M gateways/gw1/connectors/modbus-1.json D gateways/gw2/connectors/old.yaml",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Change entries: STATUS PATH [STATUS PATH ...]
    #[arg(value_name = "CHANGES")]
    pub changes: Vec<String>,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Pair up the positional arguments into change entries.
    ///
    /// At least one pair is required and the count must be even.
    pub fn file_changes(&self) -> Result<Vec<FileChange>, CliError> {
        let count = self.changes.len();
        if count < 2 || count % 2 != 0 {
            return Err(CliError::Usage {
                message: format!("expected STATUS PATH pairs, got {count} argument(s)"),
            });
        }
        Ok(self
            .changes
            .chunks_exact(2)
            .map(|pair| FileChange::new(&pair[0], &pair[1]))
            .collect())
    }
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "GWSYNC_PROFILE")]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "GWSYNC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// ThingsBoard base URL (overrides profile)
    #[arg(long, env = "TB_URL")]
    pub url: Option<String>,

    /// Tenant username (overrides profile)
    #[arg(long, short = 'u', env = "TB_USER")]
    pub username: Option<String>,

    /// Tenant password
    #[arg(long, env = "TB_PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Root of the local gateway definition tree
    #[arg(long, env = "TB_GATEWAY_CONFIG_PATH", value_name = "DIR")]
    pub config_path: Option<PathBuf>,

    /// Compute and print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, short = 'o', env = "GWSYNC_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Log line format on stderr
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GWSYNC_INSECURE")]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GWSYNC_TIMEOUT")]
    pub timeout: Option<u64>,
}

// ── Output Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON report
    Json,
    /// One `gateway status` line per gateway (scripting)
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}
