//! HTTP client for the task service API.
//!
//! Wraps a `reqwest::Client` with the service base URL, attaches the bearer
//! token from the injected [`TokenStore`] to every request, and classifies
//! failures. A 401 from any endpoint evicts the stored token.

use std::sync::Arc;

use eyre::{Result, eyre};
use log::{debug, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::token::TokenStore;
use crate::types::{User, ValidationError};

/// Errors surfaced by API calls.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Rejected credentials or an expired/invalid token.
    Auth(String),
    /// Client-side validation failure, raised before any network call.
    Validation(ValidationError),
    /// Non-2xx response from the service. `message` is taken from the
    /// response body when the service provided one.
    Server { status: u16, message: Option<String> },
    /// Transport-level failure (unreachable host, closed connection).
    Network(String),
}

impl ApiError {
    /// Human-readable message for store state: the server's message when
    /// there is one, otherwise the caller's fallback.
    pub fn surface(&self, fallback: &str) -> String {
        match self {
            ApiError::Auth(message) => message.clone(),
            ApiError::Validation(e) => e.to_string(),
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { message: None, .. } | ApiError::Network(_) => {
                fallback.to_string()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Auth(message) => write!(f, "{}", message),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Server {
                status,
                message: Some(message),
            } => write!(f, "{} (HTTP {})", message, status),
            ApiError::Server {
                status,
                message: None,
            } => write!(f, "HTTP {}", status),
            ApiError::Network(message) => write!(f, "network error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Store-boundary message for a failed call: the typed error's surface when
/// one is present, otherwise the caller's fallback.
pub(crate) fn surface(err: &eyre::Report, fallback: &str) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.surface(fallback),
        None => fallback.to_string(),
    }
}

/// Login request body.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration request body.
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response to login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Error body shape used by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the task service API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client for the service at `base_url` (e.g.
    /// `http://localhost:5000/api`), persisting the session token through
    /// the given store.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            tokens,
        }
    }

    /// The service base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser handoff URL for redirect-based OAuth. The service redirects
    /// back with a token, which callers feed to
    /// [`SessionStore::complete_token_login`](crate::SessionStore::complete_token_login).
    pub fn auth_url(&self, provider: &str) -> String {
        format!("{}/auth/{}", self.base_url, provider)
    }

    /// Current persisted token, if any.
    pub fn token(&self) -> Result<Option<String>> {
        self.tokens.load()
    }

    pub(crate) fn save_token(&self, token: &str) -> Result<()> {
        self.tokens.save(token)
    }

    pub(crate) fn clear_token(&self) -> Result<()> {
        self.tokens.clear()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self.send(self.http.get(self.url(path))).await?;
        Self::parse(response).await
    }

    /// POST a JSON body, returning the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", path);
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::parse(response).await
    }

    /// PUT a JSON body, returning the JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("PUT {}", path);
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;
        Self::parse(response).await
    }

    /// DELETE a resource, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        debug!("DELETE {}", path);
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    /// Attach the bearer token, send, and classify the response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = match self.tokens.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| eyre!(ApiError::Network(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_message(response).await;

        if status == StatusCode::UNAUTHORIZED {
            // Token is no longer valid; evict it so the next action starts
            // from an unauthenticated state.
            warn!("service returned 401, clearing stored token");
            if let Err(e) = self.tokens.clear() {
                warn!("failed to clear stored token: {}", e);
            }
            let message = message.unwrap_or_else(|| "unauthorized".to_string());
            return Err(eyre!(ApiError::Auth(message)));
        }

        Err(eyre!(ApiError::Server {
            status: status.as_u16(),
            message,
        }))
    }

    /// Pull the `{"message": ...}` out of an error body, if present.
    async fn error_message(response: reqwest::Response) -> Option<String> {
        let body = response.text().await.ok()?;
        let parsed: ErrorBody = serde_json::from_str(&body).ok()?;
        parsed.message
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| eyre!(ApiError::Network(format!("invalid response body: {}", e))))
    }
}
