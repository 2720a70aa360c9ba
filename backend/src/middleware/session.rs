//! Session middleware
//!
//! Runs in front of every page. Hands the session cookies to the auth
//! service, which validates the session or rotates it, and passes the
//! result to handlers as a per-request [`Session`]. The request path is
//! never changed and no response is produced here.

use std::convert::Infallible;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::SessionConfig;
use crate::services::auth::{AuthError, SessionCookies, SessionTokens};
use crate::AppState;

/// Session state of the current request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
        }
    }

    /// Access token, if the caller has one
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Extractor for the session resolved by [`session_middleware`].
/// Requests that bypassed the middleware get an anonymous session.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().unwrap_or_default())
    }
}

fn session_cookie(name: String, value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .build()
}

/// Write a refreshed token pair into the cookie jar
fn store_tokens(jar: CookieJar, tokens: &SessionTokens, config: &SessionConfig) -> CookieJar {
    jar.add(session_cookie(
        config.access_cookie.clone(),
        tokens.access_token.clone(),
        config,
    ))
    .add(session_cookie(
        config.refresh_cookie.clone(),
        tokens.refresh_token.clone(),
        config,
    ))
}

/// Session refresh middleware
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config.session;

    if config.is_excluded(request.uri().path()) {
        return next.run(request).await;
    }

    let cookies = SessionCookies {
        access_token: jar.get(&config.access_cookie).map(|c| c.value().to_string()),
        refresh_token: jar.get(&config.refresh_cookie).map(|c| c.value().to_string()),
    };

    let mut session = Session {
        access_token: cookies.access_token.clone(),
    };
    let mut jar = jar;

    match state
        .auth
        .update_session(&cookies, config.refresh_leeway_secs)
        .await
    {
        Ok(Some(tokens)) => {
            tracing::debug!("Session refreshed for {}", request.uri().path());
            jar = store_tokens(jar, &tokens, config);
            session.access_token = Some(tokens.access_token);
        }
        Ok(None) => {}
        Err(AuthError::MissingSession) => {}
        Err(AuthError::Unavailable(e)) => {
            tracing::warn!("Session update failed: {}", e);
        }
        Err(e) => {
            tracing::debug!("Session update rejected: {}", e);
        }
    }

    request.extensions_mut().insert(session);

    let response = next.run(request).await;
    (jar, response).into_response()
}
