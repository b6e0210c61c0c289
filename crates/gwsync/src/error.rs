//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use gwsync_config::ConfigError;
use gwsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(gwsync::usage),
        help(
            "Pass alternating STATUS PATH pairs, e.g.:\n\
             gwsync M gateways/gw1/connectors/modbus-1.json"
        )
    )]
    Usage { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to ThingsBoard at {url}")]
    #[diagnostic(
        code(gwsync::connection_failed),
        help(
            "Check that the platform is running and reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(gwsync::timeout),
        help("Increase timeout with --timeout or check platform responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gwsync::auth_failed),
        help(
            "Verify the tenant username and password.\n\
             Set them with --username/--password, TB_USER/TB_PASS, or profile '{profile}'."
        )
    )]
    AuthFailed { profile: String, message: String },

    /// Rejected credentials when no profile context is at hand.
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gwsync::auth_failed),
        help("Verify the tenant username and password (--username/--password or TB_USER/TB_PASS).")
    )]
    AuthRejected { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(gwsync::no_credentials),
        help(
            "Provide one with --password or TB_PASS, set password_env in the profile,\n\
             or store it in the OS keyring under service 'gwsync', user '{profile}/password'."
        )
    )]
    NoCredentials { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing {field}")]
    #[diagnostic(
        code(gwsync::missing_setting),
        help("Set {hint}, or add it to profile '{profile}' in {path}")
    )]
    MissingSetting {
        field: String,
        hint: String,
        profile: String,
        path: String,
    },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(code(gwsync::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gwsync::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(gwsync::config))]
    Config(Box<figment::Error>),

    // ── Sync outcome ─────────────────────────────────────────────────
    #[error("{failed} of {total} gateway(s) failed to sync")]
    #[diagnostic(
        code(gwsync::sync_failed),
        help("Re-run once the cause is fixed; every pass converges from scratch.")
    )]
    GatewaysFailed { failed: usize, total: usize },

    #[error("API error: {message}")]
    #[diagnostic(code(gwsync::api_error))]
    Api { message: String },

    // ── Serialization ────────────────────────────────────────────────
    #[error("Cannot render report: {0}")]
    #[diagnostic(code(gwsync::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::AuthRejected { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::AuthenticationFailed { message } => CliError::AuthRejected { message },
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Missing { field, profile } => CliError::MissingSetting {
                hint: setting_hint(field).into(),
                field: field.into(),
                profile,
                path: gwsync_config::config_path().display().to_string(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}

fn setting_hint(field: &str) -> &'static str {
    match field {
        "url" => "--url or TB_URL",
        "username" => "--username or TB_USER",
        "config_path" => "--config-path or TB_GATEWAY_CONFIG_PATH",
        _ => "the matching flag",
    }
}
