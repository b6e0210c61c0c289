// ThingsBoard authentication
//
// Username/password login against `/api/auth/login`. The returned JWT is
// stored on the client and attached to every later request.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ThingsBoardClient;
use crate::error::Error;
use crate::models::LoginResponse;

impl ThingsBoardClient {
    /// Authenticate with the platform using username/password.
    ///
    /// `POST /api/auth/login` with `{"username", "password"}`. On success the
    /// JWT is kept for all subsequent requests.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("api/auth/login")?;
        debug!(username, "logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let login: LoginResponse = Self::parse_json(resp).await?;
        if login.token.is_empty() {
            return Err(Error::Authentication {
                message: "login response carried an empty token".into(),
            });
        }
        self.set_token(SecretString::from(login.token));

        debug!("login successful");
        Ok(())
    }
}
