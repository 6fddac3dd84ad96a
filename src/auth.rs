//! Authentication module for TopstepX.
//!
//! Exchanges a username + API key for a bearer token and keeps that token
//! fresh for the REST client.
//!
//! # Token Lifecycle
//!
//! 1. `POST /api/Auth/loginKey` with `{"userName", "apiKey"}`
//! 2. Store the returned token with a local expiry (`now + token_validity`)
//! 3. Every API call asks [`TopstepXAuth::get_valid_token`] for a token
//! 4. If the token is missing or within `refresh_margin` of expiry, log in
//!    again before returning
//!
//! There is no background timer. Refresh is driven by the next call that
//! needs a token, and the check-and-refresh runs under a single async mutex
//! so concurrent callers never log in twice for the same expiry.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::network::DEFAULT_API_URL;

/// Default request timeout for auth calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How long a freshly issued token is treated as valid.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Tokens closer than this to expiry are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_MINUTES: i64 = 5;

/// Environment variable holding the TopstepX username.
pub const ENV_USERNAME: &str = "TOPSTEPX_USERNAME";
/// Environment variable holding the TopstepX API key.
pub const ENV_API_KEY: &str = "TOPSTEPX_API_KEY";
/// Optional environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "TOPSTEPX_API_URL";

/// Authentication-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server answered but refused the credentials or token.
    #[error("Authentication rejected (error code {error_code:?}): {message}")]
    Rejected {
        message: String,
        error_code: Option<i32>,
    },

    /// HTTP 401 from any endpoint.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success HTTP status from an auth endpoint.
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// HTTP/network error from reqwest
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The auth response body could not be parsed.
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// A required credential was not supplied.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Builder settings that can never produce a usable token.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

// ============================================================================
// Credentials and session state
// ============================================================================

/// Username + API key pair. Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    api_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A bearer token and the instant after which it must not be used.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the token is expired or will expire within `margin` of `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        now >= self.expires_at - margin
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Request body for `POST /api/Auth/loginKey`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginKeyRequest<'a> {
    user_name: &'a str,
    api_key: &'a str,
}

/// Response from `POST /api/Auth/loginKey`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error_code: i32,
    #[serde(default)]
    error_message: Option<String>,
}

/// Response from `POST /api/Auth/validate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    new_token: Option<String>,
}

// ============================================================================
// Authenticator
// ============================================================================

/// Builder for configuring [`TopstepXAuth`].
#[derive(Debug, Clone)]
pub struct TopstepXAuthBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    token_validity: TimeDelta,
    refresh_margin: TimeDelta,
}

impl TopstepXAuthBuilder {
    /// Create a new builder with the given credentials and default settings.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, api_key),
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_validity: TimeDelta::hours(TOKEN_VALIDITY_HOURS),
            refresh_margin: TimeDelta::minutes(TOKEN_REFRESH_MARGIN_MINUTES),
        }
    }

    /// Override the API base URL (trailing `/` is trimmed).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout for login/validate calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long a freshly issued token is considered valid.
    pub fn token_validity(mut self, validity: TimeDelta) -> Self {
        self.token_validity = validity;
        self
    }

    /// How close to expiry a token may get before it is refreshed.
    pub fn refresh_margin(mut self, margin: TimeDelta) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Build the authenticator.
    pub fn build(self) -> AuthResult<TopstepXAuth> {
        if self.credentials.username.is_empty() {
            return Err(AuthError::MissingCredentials("username cannot be empty".to_string()));
        }
        if self.credentials.api_key.is_empty() {
            return Err(AuthError::MissingCredentials("api key cannot be empty".to_string()));
        }
        if self.refresh_margin < TimeDelta::zero() {
            return Err(AuthError::InvalidConfig(
                "refresh margin cannot be negative".to_string(),
            ));
        }
        if self.refresh_margin >= self.token_validity {
            return Err(AuthError::InvalidConfig(format!(
                "refresh margin ({}s) must be shorter than token validity ({}s)",
                self.refresh_margin.num_seconds(),
                self.token_validity.num_seconds()
            )));
        }

        let http_client = Client::builder().timeout(self.timeout).build()?;

        Ok(TopstepXAuth {
            credentials: self.credentials,
            base_url: self.base_url,
            http_client,
            token_validity: self.token_validity,
            refresh_margin: self.refresh_margin,
            session: Mutex::new(None),
        })
    }
}

/// Holds TopstepX credentials and the current session token.
///
/// Share one instance (behind an `Arc`) between every client that talks to
/// the same account so they reuse a single token.
#[derive(Debug)]
pub struct TopstepXAuth {
    credentials: Credentials,
    base_url: String,
    http_client: Client,
    token_validity: TimeDelta,
    refresh_margin: TimeDelta,
    session: Mutex<Option<SessionToken>>,
}

impl TopstepXAuth {
    /// Create an authenticator with default settings.
    ///
    /// No network call is made until a token is first needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is empty or the HTTP client cannot be initialized.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> AuthResult<Self> {
        TopstepXAuthBuilder::new(username, api_key).build()
    }

    /// Create a builder for custom configuration.
    pub fn builder(username: impl Into<String>, api_key: impl Into<String>) -> TopstepXAuthBuilder {
        TopstepXAuthBuilder::new(username, api_key)
    }

    /// Create an authenticator from `TOPSTEPX_USERNAME` / `TOPSTEPX_API_KEY`,
    /// honouring `TOPSTEPX_API_URL` when set.
    pub fn from_env() -> AuthResult<Self> {
        let username = std::env::var(ENV_USERNAME)
            .map_err(|_| AuthError::MissingCredentials(format!("{} is not set", ENV_USERNAME)))?;
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| AuthError::MissingCredentials(format!("{} is not set", ENV_API_KEY)))?;

        let mut builder = TopstepXAuthBuilder::new(username, api_key);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and replace the current session token.
    ///
    /// On failure the previous session (if any) is left untouched.
    pub async fn login(&self) -> AuthResult<()> {
        let mut session = self.session.lock().await;
        *session = Some(self.request_token().await?);
        Ok(())
    }

    /// Return a token that is safe to use right now, logging in first when the
    /// cached one is missing or within the refresh margin of expiry.
    ///
    /// Concurrent callers wait on the same lock, so at most one login is in
    /// flight and the others reuse its result.
    pub async fn get_valid_token(&self) -> AuthResult<String> {
        let mut session = self.session.lock().await;

        if let Some(current) = session.as_ref() {
            if !current.needs_refresh(Utc::now(), self.refresh_margin) {
                return Ok(current.token.clone());
            }
            tracing::info!(
                username = %self.credentials.username,
                expires_at = %current.expires_at,
                "Session token expiring, refreshing"
            );
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *session = Some(fresh);
        Ok(token)
    }

    /// Ask the server whether the current token is still accepted.
    ///
    /// Returns `Ok(false)` without a network call when no token is held. When
    /// the server hands back a replacement token it is adopted and the local
    /// expiry is extended.
    pub async fn validate_token(&self) -> AuthResult<bool> {
        let mut session = self.session.lock().await;
        let Some(current) = session.as_mut() else {
            return Ok(false);
        };

        let url = format!("{}/api/Auth/validate", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&current.token)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Validated session token");
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                *session = None;
            }
            return Ok(false);
        }

        let body = match response.json::<ValidateResponse>().await {
            Ok(body) => body,
            // 2xx without a readable body still means the token was accepted
            Err(_) => return Ok(true),
        };

        if let Some(new_token) = body.new_token.filter(|t| !t.is_empty()) {
            *current = SessionToken::new(new_token, Utc::now() + self.token_validity);
        }

        Ok(body.success.unwrap_or(true))
    }

    /// Install a token obtained elsewhere.
    pub async fn set_session(&self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        *self.session.lock().await = Some(SessionToken::new(token, expires_at));
    }

    /// Drop the cached token; the next call will log in again.
    pub async fn clear_session(&self) {
        *self.session.lock().await = None;
    }

    /// Drop the cached session only if it still holds `token`.
    ///
    /// A rejection for a token that has since been replaced leaves the newer
    /// session alone. Returns whether the session was cleared.
    pub async fn invalidate_token(&self, token: &str) -> bool {
        let mut session = self.session.lock().await;
        match session.as_ref() {
            Some(current) if current.token == token => {
                *session = None;
                true
            }
            _ => false,
        }
    }

    /// Check whether a token is cached (it may still be expired).
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Expiry of the cached token, if any.
    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.lock().await.as_ref().map(|s| s.expires_at)
    }

    /// Perform the login call. Does not touch the cached session.
    async fn request_token(&self) -> AuthResult<SessionToken> {
        let url = format!("{}/api/Auth/loginKey", self.base_url);
        let request = LoginKeyRequest {
            user_name: self.credentials.username(),
            api_key: self.credentials.api_key(),
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = %status, "Login response received");

        if !status.is_success() {
            let message = serde_json::from_str::<LoginResponse>(&text)
                .ok()
                .and_then(|r| r.error_message)
                .unwrap_or(text);
            return Err(match status {
                StatusCode::UNAUTHORIZED => AuthError::Unauthorized(message),
                _ => AuthError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let login: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Deserialize(format!("Failed to parse login response: {}", e)))?;

        match login.token {
            Some(token) if login.success && login.error_code == 0 && !token.is_empty() => {
                tracing::info!(username = %self.credentials.username, "Logged in to TopstepX");
                Ok(SessionToken::new(token, Utc::now() + self.token_validity))
            }
            _ => {
                let message = login
                    .error_message
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::warn!(
                    username = %self.credentials.username,
                    error_code = login.error_code,
                    "Login rejected: {}",
                    message
                );
                Err(AuthError::Rejected {
                    message,
                    error_code: Some(login.error_code),
                })
            }
        }
    }
}
