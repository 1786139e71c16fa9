//! Identity provider client (document-store variant only).
//!
//! The document database's built-in auth service handles accounts and
//! sessions; this client only requests sign-up, sign-in, and the federated
//! code exchange, and observes the resulting session. Who is currently
//! signed in lives in the storefront session as a
//! [`crate::models::CurrentUser`]; see `middleware::auth` for the
//! extractors that gate order submission.
//!
//! Out of scope by design: password strength policy, email verification,
//! account recovery.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::IdentityConfig;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl IdentityError {
    /// Whether this is a bad-credentials style rejection the sign-in form
    /// should absorb, as opposed to provider trouble.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == 400 || *status == 401 || *status == 409)
    }
}

/// A session minted by the identity provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub id_token: String,
    /// Seconds until the token expires. Observed, not managed, here.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Client for the identity provider's REST API.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a new email/password account and sign it in.
    ///
    /// # Errors
    ///
    /// `Api { status: 409, .. }` when the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        self.post(
            "/auth/sign-up",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `Api { status: 400/401, .. }` on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        self.post(
            "/auth/sign-in",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// URL to send the browser to for federated sign-in.
    ///
    /// The provider redirects back to `redirect_uri` with a one-time code;
    /// `state` round-trips for CSRF protection.
    #[must_use]
    pub fn federated_sign_in_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/auth/authorize?provider=google&redirect_uri={}&state={}",
            self.base_url,
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
        )
    }

    /// Exchange a federated one-time code for a session.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthSession, IdentityError> {
        self.post(
            "/auth/token",
            &serde_json::json!({ "code": code, "redirectUri": redirect_uri }),
        )
        .await
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<AuthSession, IdentityError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AuthSession>()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> IdentityClient {
        IdentityClient::new(&IdentityConfig {
            base_url: "https://id.example/".to_owned(),
            api_key: SecretString::from("key"),
        })
    }

    #[test]
    fn test_federated_url_encodes_redirect() {
        let url = client().federated_sign_in_url("https://shop.example/auth/callback", "st8");
        assert_eq!(
            url,
            "https://id.example/auth/authorize?provider=google&redirect_uri=https%3A%2F%2Fshop.example%2Fauth%2Fcallback&state=st8"
        );
    }

    #[test]
    fn test_rejection_classification() {
        let rejected = IdentityError::Api {
            status: 401,
            message: "bad credentials".to_owned(),
        };
        assert!(rejected.is_rejection());

        let broken = IdentityError::Api {
            status: 500,
            message: "boom".to_owned(),
        };
        assert!(!broken.is_rejection());
    }

    #[test]
    fn test_auth_session_parses() {
        let session: AuthSession = serde_json::from_str(
            r#"{"userId": "u1", "email": "a@b.c", "idToken": "tok", "expiresIn": 3600}"#,
        )
        .unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.expires_in, Some(3600));
    }
}
