//! Hosted auth API client
//!
//! Talks to the GoTrue endpoints of the hosted backend: user lookup for an
//! access token and the refresh-token grant.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::config::SupabaseConfig;
use crate::services::auth::{AuthError, AuthProvider, AuthenticatedCaller, SessionTokens};

/// Auth API client
#[derive(Clone)]
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl SupabaseAuthClient {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: String, anon_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            anon_key,
        }
    }

    /// Map an error status onto rejection or unavailability
    async fn check_status(response: Response) -> Result<Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Err(AuthError::Unavailable(format!("{}: {}", status, body)))
        } else {
            Err(AuthError::Rejected(format!("{}: {}", status, body)))
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn get_user(&self, access_token: &str) -> Result<AuthenticatedCaller, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::MissingSession);
        }

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json::<AuthenticatedCaller>()
            .await
            .map_err(|e| AuthError::Unavailable(format!("invalid user payload: {}", e)))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingSession);
        }

        let response = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json::<SessionTokens>()
            .await
            .map_err(|e| AuthError::Unavailable(format!("invalid session payload: {}", e)))
    }
}
