mod cli;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use gwsync_core::{CoreError, SyncOrchestrator, ThingsBoardPlatform};

use crate::cli::{Cli, GlobalOpts, LogFormat};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(global: &GlobalOpts) {
    let filter = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false);

    match global.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "gwsync", &mut std::io::stdout());
        return Ok(());
    }

    let changes = cli.file_changes()?;

    let cfg = gwsync_config::load_config(cli.global.config.as_deref())?;
    let profile_name = config::active_profile_name(&cli.global, &cfg);
    let sync_config = config::build_sync_config(&cli.global, &cfg)?;
    let format = config::output_format(&cli.global, &cfg);
    tracing::debug!(
        profile = %profile_name,
        url = %sync_config.url,
        root = %sync_config.config_root.display(),
        changes = changes.len(),
        "resolved configuration"
    );

    if !sync_config.config_root.is_dir() {
        return Err(CliError::Validation {
            field: "config_path".into(),
            reason: format!("{} is not a directory", sync_config.config_root.display()),
        });
    }

    let platform = ThingsBoardPlatform::connect(&sync_config)
        .await
        .map_err(|e| match e {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: profile_name,
                message,
            },
            other => other.into(),
        })?;

    let orchestrator =
        SyncOrchestrator::new(platform, &sync_config.config_root).dry_run(sync_config.dry_run);
    let report = orchestrator.run(&changes).await;

    let rendered = output::render_report(
        format,
        &report,
        output::should_color(cli.global.color),
    )?;
    output::print_output(&rendered, cli.global.quiet);

    if report.has_failures() {
        return Err(CliError::GatewaysFailed {
            failed: report.failed_count(),
            total: report.gateways.len(),
        });
    }
    Ok(())
}
