use thiserror::Error;

/// Top-level error type for the `gwsync-api` crate.
///
/// Covers every failure mode of the ThingsBoard REST surface:
/// authentication, transport, API-level rejections, and decoding.
/// `gwsync-core` maps these into reconciliation-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was made before `login()` succeeded.
    #[error("Not authenticated -- call login() first")]
    NotAuthenticated,

    /// JWT expired or was revoked.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The requested entity does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Structured error from the platform (`{status, message, errorCode}`).
    #[error("ThingsBoard API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<i64>,
    },

    /// An attribute key cannot be expressed in a comma-separated `keys` list.
    #[error("Attribute key '{key}' contains ',' and cannot be deleted by name")]
    InvalidAttributeKey { key: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_api_404() {
        let err = Error::Api {
            status: 404,
            message: "Requested item wasn't found!".into(),
            error_code: Some(32),
        };
        assert!(err.is_not_found());
        assert!(!Error::SessionExpired.is_not_found());
    }
}
