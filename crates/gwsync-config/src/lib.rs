//! Configuration for the gwsync binary.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `gwsync_core::SyncConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gwsync_core::{Credentials, SyncConfig, TlsVerification};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "gwsync";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing {field} for profile '{profile}'")]
    Missing { field: &'static str, profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named ThingsBoard profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named ThingsBoard profile.
///
/// Every field is optional here; flags and the `TB_*` environment fill
/// the gaps, and [`profile_to_sync_config`] rejects what is still missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Platform base URL (e.g., "https://tb.example.com").
    pub url: Option<String>,

    /// Tenant login.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Root of the local gateway definition tree.
    pub config_path: Option<PathBuf>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Config {
    /// The profile called `name`, if configured.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "gwsync", "gwsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gwsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, the TOML file, and `GWSYNC_*` env.
///
/// `path` overrides the platform config location. A missing file is not
/// an error; the defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = file_figment(&path).merge(Env::prefixed("GWSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the password from the credential chain (no CLI flag step).
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env -> env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `SyncConfig` from a profile, with `password` already resolved.
pub fn profile_to_sync_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: SecretString,
) -> Result<SyncConfig, ConfigError> {
    let missing = |field| ConfigError::Missing {
        field,
        profile: profile_name.into(),
    };

    let url_str = profile.url.as_deref().ok_or_else(|| missing("url"))?;
    let url: url::Url = url_str.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let username = profile
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| missing("username"))?;

    let config_root = profile
        .config_path
        .clone()
        .ok_or_else(|| missing("config_path"))?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(SyncConfig {
        url,
        credentials: Credentials { username, password },
        config_root,
        tls,
        timeout,
        dry_run: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use std::fs;
    use tempfile::TempDir;

    fn load_file(contents: &str) -> Config {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        file_figment(&path).extract().expect("valid config")
    }

    fn complete_profile() -> Profile {
        Profile {
            url: Some("https://tb.example.com".into()),
            username: Some("ci@example.com".into()),
            config_path: Some("infra/thingsboard-gateway".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config: Config = file_figment(Path::new("/nonexistent/gwsync.toml"))
            .extract()
            .expect("defaults");
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn profiles_parse_from_toml() {
        let config = load_file(
            r#"
default_profile = "prod"

[defaults]
timeout = 45

[profiles.prod]
url = "https://tb.example.com"
username = "ci@example.com"
password_env = "TB_PASS"
config_path = "infra/thingsboard-gateway"
insecure = true
"#,
        );

        assert_eq!(config.default_profile.as_deref(), Some("prod"));
        assert_eq!(config.defaults.timeout, 45);
        assert_eq!(config.defaults.output, "table");
        let prod = config.profile("prod").expect("prod profile");
        assert_eq!(prod.password_env.as_deref(), Some("TB_PASS"));
        assert_eq!(prod.insecure, Some(true));
        assert!(config.profile("staging").is_none());
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            password: Some("hunter2".into()),
            ..complete_profile()
        };
        let pw = resolve_password(&profile, "gwsync-test-no-keyring-entry").expect("password");
        assert_eq!(pw.expose_secret(), "hunter2");
    }

    #[test]
    fn sync_config_applies_defaults_and_overrides() {
        let defaults = Defaults::default();
        let cfg = profile_to_sync_config(
            &Profile {
                timeout: Some(5),
                ..complete_profile()
            },
            "prod",
            &defaults,
            SecretString::from("pw".to_owned()),
        )
        .expect("valid profile");

        assert_eq!(cfg.url.as_str(), "https://tb.example.com/");
        assert_eq!(cfg.credentials.username, "ci@example.com");
        assert_eq!(cfg.config_root, PathBuf::from("infra/thingsboard-gateway"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn incomplete_profile_is_rejected() {
        let defaults = Defaults::default();
        let result = profile_to_sync_config(
            &Profile {
                config_path: None,
                ..complete_profile()
            },
            "prod",
            &defaults,
            SecretString::from("pw".to_owned()),
        );
        assert!(matches!(
            result,
            Err(ConfigError::Missing {
                field: "config_path",
                ..
            })
        ));

        let result = profile_to_sync_config(
            &Profile {
                url: Some("not a url".into()),
                ..complete_profile()
            },
            "prod",
            &defaults,
            SecretString::from("pw".to_owned()),
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
