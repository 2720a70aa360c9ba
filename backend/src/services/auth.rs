//! Authentication collaborator contract
//!
//! Sign-in, token issuance and token verification all live in the hosted
//! auth service. This module describes the calls the onboarding workflow
//! makes against it, and the per-request session update built on them.

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of the signed-in user, resolved per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedCaller {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens returned by a session refresh
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no active session")]
    MissingSession,

    /// The auth service answered and refused the token
    #[error("session rejected: {0}")]
    Rejected(String),

    /// The auth service could not be reached or answered with a server error
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// Session tokens carried by a request's cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionCookies {
    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the user owning `access_token`
    async fn get_user(&self, access_token: &str) -> Result<AuthenticatedCaller, AuthError>;

    /// Exchange a refresh token for a new token pair
    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthError>;

    /// Bring the session of one request up to date.
    ///
    /// Returns the rotated token pair when the session was refreshed and
    /// `None` when the current access token is still good.
    async fn update_session(
        &self,
        cookies: &SessionCookies,
        leeway_secs: i64,
    ) -> Result<Option<SessionTokens>, AuthError> {
        validate_or_refresh(self, cookies, leeway_secs).await
    }
}

/// Validate the access token with the auth service, or exchange the
/// refresh token when the access token is missing, expiring or refused.
pub async fn validate_or_refresh<A>(
    auth: &A,
    cookies: &SessionCookies,
    leeway_secs: i64,
) -> Result<Option<SessionTokens>, AuthError>
where
    A: AuthProvider + ?Sized,
{
    let now = chrono::Utc::now().timestamp();
    let refresh_token = cookies.refresh_token();

    if let Some(access_token) = cookies.access_token() {
        // An expiring token is only worth checking when it cannot be replaced
        if refresh_token.is_none() || !needs_refresh(Some(access_token), now, leeway_secs) {
            match auth.get_user(access_token).await {
                Ok(_) => return Ok(None),
                Err(AuthError::Rejected(_)) if refresh_token.is_some() => {}
                Err(e) => return Err(e),
            }
        }
    }

    match refresh_token {
        Some(refresh_token) => auth.refresh_session(refresh_token).await.map(Some),
        None => Err(AuthError::MissingSession),
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Read `exp` from a JWT without checking its signature.
/// The auth service verifies tokens; this is only used to decide when to
/// refresh.
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.exp)
}

/// Whether the access token should be exchanged rather than validated
pub fn needs_refresh(access_token: Option<&str>, now: i64, leeway_secs: i64) -> bool {
    match access_token.filter(|t| !t.is_empty()) {
        None => true,
        Some(token) => match token_expiry(token) {
            Some(exp) => exp <= now + leeway_secs,
            None => true,
        },
    }
}
