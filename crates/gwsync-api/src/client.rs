// ThingsBoard REST HTTP client
//
// Wraps `reqwest::Client` with ThingsBoard URL construction, JWT header
// injection, and error-body decoding. Endpoint groups (auth, devices,
// attributes) are implemented as inherent methods in separate files to
// keep this module focused on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

const AUTH_HEADER: &str = "X-Authorization";

/// Raw HTTP client for the ThingsBoard REST API.
///
/// Holds the JWT obtained by [`login`](Self::login) and attaches it as
/// `X-Authorization: Bearer <token>` to every request. Non-2xx responses
/// are decoded into [`Error`] variants before the caller sees them.
pub struct ThingsBoardClient {
    http: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<SecretString>,
}

impl ThingsBoardClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the platform root, e.g. `https://thingsboard.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// A base path without a trailing `/` gets one, so deployments served
    /// under a prefix (`https://host/thingsboard`) keep it when joining.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            token: ArcSwapOption::empty(),
        }
    }

    /// The platform base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Whether a JWT is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    pub(crate) fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path such as `api/tenant/devices`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let guard = self.token.load();
        let token = guard.as_ref().ok_or(Error::NotAuthenticated)?;
        let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("token is not a valid header value: {e}"),
            })?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, value);
        Ok(headers)
    }

    /// Send an authenticated GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Send an authenticated POST request with a JSON body, ignoring any response body.
    pub(crate) async fn post_empty(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(|_| ())
    }

    /// Send an authenticated DELETE request, ignoring any response body.
    pub(crate) async fn delete_empty(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(|_| ())
    }

    /// Decode a successful response body as JSON.
    pub(crate) async fn parse_json<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Map non-2xx responses into typed errors; pass successful responses through.
    pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let path = resp.url().path().to_owned();
        let body = resp.text().await.unwrap_or_default();
        let decoded: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
        let message = decoded
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Err(Error::SessionExpired),
            reqwest::StatusCode::NOT_FOUND => Err(Error::NotFound { resource: path }),
            _ => Err(Error::Api {
                status: status.as_u16(),
                message,
                error_code: decoded.and_then(|b| b.error_code),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_relative_paths() {
        let base = Url::parse("https://tb.example.com").expect("valid url");
        let client = ThingsBoardClient::with_client(reqwest::Client::new(), base);
        let url = client.api_url("/api/tenant/devices").expect("joinable");
        assert_eq!(url.as_str(), "https://tb.example.com/api/tenant/devices");
    }

    #[test]
    fn api_url_keeps_a_path_prefix() {
        for base in [
            "https://tb.example.com/thingsboard",
            "https://tb.example.com/thingsboard/",
        ] {
            let client = ThingsBoardClient::with_client(
                reqwest::Client::new(),
                Url::parse(base).expect("valid url"),
            );
            let url = client.api_url("api/auth/login").expect("joinable");
            assert_eq!(url.as_str(), "https://tb.example.com/thingsboard/api/auth/login");
        }
    }

    #[test]
    fn requests_require_a_token() {
        let base = Url::parse("https://tb.example.com").expect("valid url");
        let client = ThingsBoardClient::with_client(reqwest::Client::new(), base);
        assert!(!client.is_authenticated());
        assert!(matches!(client.auth_headers(), Err(Error::NotAuthenticated)));

        client.set_token(SecretString::from("abc".to_owned()));
        assert!(client.is_authenticated());
        let headers = client.auth_headers().expect("token set");
        assert_eq!(
            headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()),
            Some("Bearer abc")
        );
    }
}
