// ── Core error types ──
//
// Domain errors of the reconciliation engine. Consumers never see HTTP
// status codes or JSON parse failures from the transport directly; the
// `From<gwsync_api::Error>` impl translates them into connection, auth,
// or generic API variants, and the platform adapter narrows them further
// into the per-phase variants below.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which remote write phase of a gateway pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Delete,
    Upsert,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("delete"),
            Self::Upsert => f.write_str("upsert"),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to ThingsBoard at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Local input errors ───────────────────────────────────────────
    #[error("Cannot parse connector file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Connector '{name}' is defined more than once; ignoring {}", path.display())]
    DuplicateConnector { name: String, path: PathBuf },

    #[error("Path {} does not name a gateway: {reason}", path.display())]
    PathShape { path: PathBuf, reason: &'static str },

    #[error("Gateway folder '{gateway}' not found under {}", root.display())]
    GatewayDirNotFound { gateway: String, root: PathBuf },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Gateway '{gateway}' is not registered on the platform")]
    GatewayNotFound { gateway: String },

    #[error("Cannot read attributes of gateway '{gateway}': {message}")]
    RemoteRead { gateway: String, message: String },

    #[error("Attribute {phase} failed for gateway '{gateway}': {message}")]
    RemoteWrite {
        gateway: String,
        phase: WritePhase,
        message: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gwsync_api::Error> for CoreError {
    fn from(err: gwsync_api::Error) -> Self {
        match err {
            gwsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            gwsync_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "no session -- login has not completed".into(),
            },
            gwsync_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            gwsync_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
                url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
            },
            gwsync_api::Error::Transport(ref e) if e.is_connect() => {
                CoreError::ConnectionFailed {
                    url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                }
            }
            gwsync_api::Error::Transport(e) => CoreError::Api {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            gwsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            gwsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            gwsync_api::Error::NotFound { resource } => CoreError::Api {
                message: format!("not found: {resource}"),
                status: Some(404),
            },
            gwsync_api::Error::Api {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            gwsync_api::Error::InvalidAttributeKey { key } => CoreError::Api {
                message: format!("attribute key '{key}' cannot be sent in a keys list"),
                status: None,
            },
            gwsync_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Deserialization error: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry_becomes_auth_failure() {
        let err: CoreError = gwsync_api::Error::SessionExpired.into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn api_status_survives_conversion() {
        let err: CoreError = gwsync_api::Error::Api {
            status: 500,
            message: "boom".into(),
            error_code: Some(2),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn write_errors_name_their_phase() {
        let err = CoreError::RemoteWrite {
            gateway: "gw1".into(),
            phase: WritePhase::Delete,
            message: "HTTP 500".into(),
        };
        assert_eq!(
            err.to_string(),
            "Attribute delete failed for gateway 'gw1': HTTP 500"
        );
    }
}
