//! Session state: the authenticated user and token lifecycle.

use std::sync::Arc;

use eyre::{Result, eyre};
use log::{info, warn};

use crate::api::{ApiClient, ApiError, AuthResponse, Credentials, Registration, surface};
use crate::token::mask_token;
use crate::types::User;

/// Holds the current user identity and drives the token lifecycle.
///
/// Login and registration failures are re-raised so callers can show them
/// inline; everything else is recorded in [`error`](Self::error). The only
/// states are unauthenticated and authenticated.
pub struct SessionStore {
    client: Arc<ApiClient>,
    user: Option<User>,
    error: Option<String>,
}

impl SessionStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            user: None,
            error: None,
        }
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Last recorded session error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Browser handoff URL for redirect-based OAuth with the given provider.
    pub fn auth_url(&self, provider: &str) -> String {
        self.client.auth_url(provider)
    }

    /// Log in with email and password. On success the token is persisted and
    /// the user is set; on rejection the server's message is re-raised as an
    /// auth error.
    pub async fn login_with_credentials(&mut self, email: &str, password: &str) -> Result<User> {
        let response: AuthResponse = self
            .client
            .post_json("/auth/login", &Credentials { email, password })
            .await
            .map_err(|e| as_auth_error(e, "Invalid email or password"))?;

        self.establish(response)
    }

    /// Create an account. Same contract as login.
    pub async fn register_with_credentials(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let response: AuthResponse = self
            .client
            .post_json(
                "/auth/register",
                &Registration {
                    name,
                    email,
                    password,
                },
            )
            .await
            .map_err(|e| as_auth_error(e, "Registration failed"))?;

        self.establish(response)
    }

    /// Resume a session from a token obtained out-of-band (OAuth redirect or
    /// persisted storage): persist it and fetch the profile. On failure the
    /// token is cleared and the error recorded, not re-raised.
    pub async fn complete_token_login(&mut self, token: &str) -> Result<()> {
        self.client.save_token(token)?;
        info!("completing token login with {}", mask_token(token));

        match self.client.get_json::<User>("/auth/me").await {
            Ok(user) => {
                info!("authenticated as {}", user.id);
                self.user = Some(user);
                self.error = None;
            }
            Err(e) => {
                if let Err(clear_err) = self.client.clear_token() {
                    warn!("failed to clear rejected token: {}", clear_err);
                }
                self.user = None;
                self.error = Some(surface(&e, "Failed to authenticate"));
            }
        }

        Ok(())
    }

    /// Clear the token and user unconditionally. Always succeeds; a failure
    /// to remove the persisted token is logged, not raised.
    pub fn logout(&mut self) {
        if let Err(e) = self.client.clear_token() {
            warn!("failed to clear token on logout: {}", e);
        }
        self.user = None;
        self.error = None;
        info!("logged out");
    }

    fn establish(&mut self, response: AuthResponse) -> Result<User> {
        self.client.save_token(&response.token)?;
        info!(
            "session established for {} with token {}",
            response.user.id,
            mask_token(&response.token)
        );
        self.user = Some(response.user.clone());
        self.error = None;
        Ok(response.user)
    }
}

/// Re-shape a failed login/registration into an auth error carrying the
/// server's message; network failures pass through unchanged.
fn as_auth_error(err: eyre::Report, fallback: &str) -> eyre::Report {
    let rewrapped = match err.downcast_ref::<ApiError>() {
        Some(api @ ApiError::Server { .. }) => Some(ApiError::Auth(api.surface(fallback))),
        _ => None,
    };
    match rewrapped {
        Some(auth) => eyre!(auth),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_auth_error_rewraps_server_errors() {
        let err = eyre!(ApiError::Server {
            status: 400,
            message: Some("Email already registered".to_string()),
        });
        let rewrapped = as_auth_error(err, "Registration failed");
        assert_eq!(
            rewrapped.downcast_ref::<ApiError>(),
            Some(&ApiError::Auth("Email already registered".to_string()))
        );
    }

    #[test]
    fn test_as_auth_error_passes_network_through() {
        let err = eyre!(ApiError::Network("connection refused".to_string()));
        let passed = as_auth_error(err, "Invalid email or password");
        assert!(matches!(
            passed.downcast_ref::<ApiError>(),
            Some(ApiError::Network(_))
        ));
    }

}
