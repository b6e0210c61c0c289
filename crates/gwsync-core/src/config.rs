// ── Runtime sync configuration ──
//
// These types describe *how* to reach the platform and *where* the local
// connector definitions live. They carry credential data but never touch
// disk or the process environment; the CLI constructs a `SyncConfig` and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Tenant credentials for the platform's username/password login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed on-prem installs).
    DangerAcceptInvalid,
}

/// Everything one sync run needs.
///
/// Built by the CLI/config layer, passed into the platform adapter and the
/// orchestrator -- core never reads config files.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Platform base URL (e.g., `https://thingsboard.example.com`).
    pub url: Url,
    /// Login credentials.
    pub credentials: Credentials,
    /// Root of the local gateway definition tree.
    pub config_root: PathBuf,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Plan only; never write to the platform.
    pub dry_run: bool,
}

impl SyncConfig {
    pub(crate) fn transport(&self) -> gwsync_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => gwsync_api::TlsMode::System,
            TlsVerification::CustomCa(path) => gwsync_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => gwsync_api::TlsMode::DangerAcceptInvalid,
        };
        gwsync_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
