//! CLI configuration -- thin wrapper around `gwsync_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --username, --password, --config-path, ...).

use secrecy::SecretString;

use gwsync_config::{Config, Profile};
use gwsync_core::SyncConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: flag > config default > table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    use clap::ValueEnum;

    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Build the `SyncConfig` for this run.
///
/// The selected profile may be absent from the file as long as the flags
/// and `TB_*` environment supply everything. Naming a profile explicitly
/// that does not exist is an error.
pub fn build_sync_config(global: &GlobalOpts, config: &Config) -> Result<SyncConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let base = match config.profile(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    let effective = apply_overrides(base, global);

    // Flag / TB_PASS first, then the profile's own chain.
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => gwsync_config::resolve_password(&effective, &profile_name)?,
    };

    let mut sync =
        gwsync_config::profile_to_sync_config(&effective, &profile_name, &config.defaults, password)?;
    sync.dry_run = global.dry_run;
    Ok(sync)
}

/// Overlay CLI flags (and their env vars) on top of a profile.
fn apply_overrides(profile: Profile, global: &GlobalOpts) -> Profile {
    Profile {
        url: global.url.clone().or(profile.url),
        username: global.username.clone().or(profile.username),
        config_path: global.config_path.clone().or(profile.config_path),
        insecure: if global.insecure {
            Some(true)
        } else {
            profile.insecure
        },
        timeout: global.timeout.or(profile.timeout),
        ..profile
    }
}
