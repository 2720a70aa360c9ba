//! In-memory collaborators and request helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use review_desk::{
    create_app,
    services::{
        validate_or_refresh, AuthError, AuthProvider, AuthenticatedCaller,
        BusinessStore, CallerContext, SessionCookies, SessionTokens, StoreError,
    },
    AppState, Config,
};
use serde::{Deserialize, Serialize};
use shared::{BusinessCreationRequest, BusinessId};

pub const VALID_TOKEN: &str = "valid-access-token";
pub const VALID_REFRESH: &str = "valid-refresh-token";
pub const REFRESHED_TOKEN: &str = "refreshed-access-token";
pub const ROTATED_REFRESH: &str = "rotated-refresh-token";
pub const USER_ID: &str = "8f8e5b1c-0000-4000-8000-000000000001";

const SIGNING_SECRET: &[u8] = b"test-secret";

/// Auth service fake: knows two opaque access tokens, any unexpired JWT
/// signed with the test secret
/// and one refresh token
#[derive(Default)]
pub struct FakeAuth {
    pub unavailable: bool,
    pub get_user_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub update_session_calls: AtomicUsize,
}

impl FakeAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            unavailable: true,
            ..Default::default()
        })
    }

    pub fn get_user_calls(&self) -> usize {
        self.get_user_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn update_session_calls(&self) -> usize {
        self.update_session_calls.load(Ordering::SeqCst)
    }

    fn accepts(access_token: &str) -> bool {
        access_token == VALID_TOKEN
            || access_token == REFRESHED_TOKEN
            || {
                let mut validation = Validation::default();
                validation.leeway = 0;
                decode::<Claims>(
                    access_token,
                    &DecodingKey::from_secret(SIGNING_SECRET),
                    &validation,
                )
                .is_ok()
            }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn get_user(&self, access_token: &str) -> Result<AuthenticatedCaller, AuthError> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AuthError::Unavailable("connection refused".to_string()));
        }
        if Self::accepts(access_token) {
            Ok(AuthenticatedCaller {
                id: USER_ID.to_string(),
                email: Some("owner@example.com".to_string()),
            })
        } else {
            Err(AuthError::Rejected("401: invalid JWT".to_string()))
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AuthError::Unavailable("connection refused".to_string()));
        }
        if refresh_token == VALID_REFRESH {
            Ok(SessionTokens {
                access_token: REFRESHED_TOKEN.to_string(),
                refresh_token: ROTATED_REFRESH.to_string(),
                expires_in: Some(3600),
            })
        } else {
            Err(AuthError::Rejected("400: invalid refresh token".to_string()))
        }
    }

    async fn update_session(
        &self,
        cookies: &SessionCookies,
        leeway_secs: i64,
    ) -> Result<Option<SessionTokens>, AuthError> {
        self.update_session_calls.fetch_add(1, Ordering::SeqCst);
        validate_or_refresh(self, cookies, leeway_secs).await
    }
}

/// What the fake procedure does when called
#[derive(Clone)]
pub enum StoreBehavior {
    Create(&'static str),
    Fail(&'static str),
    Unreachable,
    Panic,
}

/// Business store fake recording every procedure call
pub struct FakeStore {
    behavior: StoreBehavior,
    calls: Mutex<Vec<(String, BusinessCreationRequest)>>,
}

impl FakeStore {
    pub fn new(behavior: StoreBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn creating(id: &'static str) -> Arc<Self> {
        Self::new(StoreBehavior::Create(id))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, BusinessCreationRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BusinessStore for FakeStore {
    async fn create_business(
        &self,
        caller: &CallerContext,
        request: &BusinessCreationRequest,
    ) -> Result<BusinessId, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((caller.caller.id.clone(), request.clone()));

        match &self.behavior {
            StoreBehavior::Create(id) => Ok(BusinessId::new(*id)),
            StoreBehavior::Fail(msg) => Err(StoreError::Procedure(msg.to_string())),
            StoreBehavior::Unreachable => {
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
            StoreBehavior::Panic => panic!("store blew up"),
        }
    }

    fn kind(&self) -> &'static str {
        "fake"
    }
}

pub fn state(auth: Arc<FakeAuth>, store: Arc<FakeStore>) -> AppState {
    AppState::new(auth, store, Config::default()).expect("templates compile")
}

pub fn app(auth: Arc<FakeAuth>, store: Arc<FakeStore>) -> Router {
    create_app(state(auth, store))
}

/// POST the onboarding form
pub fn submit(body: &str, cookie: Option<&str>, json: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/dashboard/create-business")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if json {
        builder = builder.header(header::ACCEPT, "application/json");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn access_cookie(token: &str) -> String {
    format!("sb-access-token={}", token)
}

pub async fn body_string(response: Response<Body>) -> String {
    let collected = response
        .into_body()
        .collect()
        .await
        .expect("body should read");
    String::from_utf8(collected.to_bytes().to_vec()).expect("utf-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("json body")
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

fn signed_jwt(offset_secs: i64, secret: &[u8]) -> String {
    encode(
        &Header::default(),
        &Claims {
            sub: USER_ID.to_string(),
            exp: chrono::Utc::now().timestamp() + offset_secs,
        },
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// A JWT expiring `offset_secs` from now
pub fn jwt_expiring_in(offset_secs: i64) -> String {
    signed_jwt(offset_secs, SIGNING_SECRET)
}

/// An unexpired JWT the auth service no longer honours
pub fn revoked_jwt() -> String {
    signed_jwt(3600, b"rotated-secret")
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
