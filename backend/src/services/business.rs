//! Business creation service
//!
//! Backs the onboarding form. One attempt per submission, no retries:
//! 1. resolve the caller (fails closed before looking at any field)
//! 2. parse and validate every field, collecting all errors
//! 3. run the atomic `create_business` procedure
//!
//! Every failure is turned into a [`BusinessCreationResult`]; upstream and
//! internal details are logged and never returned to the browser.

use std::sync::Arc;

use shared::{
    BusinessCreationRequest, BusinessCreationResult, BusinessId, ErrorKey, FieldErrors,
    RawBusinessFields, CREATE_FAILED, NOT_LOGGED_IN, UNEXPECTED_ERROR,
};
use thiserror::Error;

use crate::middleware::Session;
use crate::services::auth::{AuthError, AuthProvider};
use crate::services::store::{BusinessStore, CallerContext, StoreError};

/// Why a submission did not create a business
#[derive(Debug, Error)]
pub enum CreateBusinessError {
    #[error("caller is not authenticated")]
    Unauthenticated,

    #[error("invalid business fields")]
    Validation(FieldErrors),

    #[error("create_business procedure failed: {0}")]
    Upstream(String),

    #[error("unexpected error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for CreateBusinessError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Procedure(msg) => CreateBusinessError::Upstream(msg),
            other => CreateBusinessError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<CreateBusinessError> for BusinessCreationResult {
    fn from(e: CreateBusinessError) -> Self {
        match e {
            CreateBusinessError::Unauthenticated => {
                BusinessCreationResult::failure(ErrorKey::Auth, NOT_LOGGED_IN)
            }
            CreateBusinessError::Validation(errors) => BusinessCreationResult::failed(errors),
            CreateBusinessError::Upstream(_) => {
                BusinessCreationResult::failure(ErrorKey::General, CREATE_FAILED)
            }
            CreateBusinessError::Internal(_) => {
                BusinessCreationResult::failure(ErrorKey::General, UNEXPECTED_ERROR)
            }
        }
    }
}

/// Business creation service
#[derive(Clone)]
pub struct BusinessService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn BusinessStore>,
}

impl BusinessService {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn BusinessStore>) -> Self {
        Self { auth, store }
    }

    /// Handle one submission of the onboarding form.
    ///
    /// `fields` is `Err` when the submitted body could not be decoded at
    /// all. This never fails: every outcome is a `BusinessCreationResult`.
    pub async fn create_business(
        &self,
        session: &Session,
        fields: Result<RawBusinessFields, anyhow::Error>,
    ) -> BusinessCreationResult {
        match self.try_create_business(session, fields).await {
            Ok(business_id) => {
                tracing::info!("Business {} created", business_id);
                BusinessCreationResult::created(business_id)
            }
            Err(e) => {
                match &e {
                    CreateBusinessError::Unauthenticated => {
                        tracing::info!("Business creation refused: not logged in");
                    }
                    CreateBusinessError::Validation(errors) => {
                        tracing::debug!(
                            "Business creation rejected, invalid fields: {:?}",
                            errors.keys().collect::<Vec<_>>()
                        );
                    }
                    CreateBusinessError::Upstream(msg) => {
                        tracing::error!("Business creation error: {}", msg);
                    }
                    CreateBusinessError::Internal(err) => {
                        tracing::error!("Unexpected error in create_business: {:?}", err);
                    }
                }
                e.into()
            }
        }
    }

    async fn try_create_business(
        &self,
        session: &Session,
        fields: Result<RawBusinessFields, anyhow::Error>,
    ) -> Result<BusinessId, CreateBusinessError> {
        let caller = self.resolve_caller(session).await?;

        let fields = fields?;
        let request =
            BusinessCreationRequest::parse(fields).map_err(CreateBusinessError::Validation)?;

        let business_id = self
            .store
            .create_business(&caller, &request)
            .await
            .map_err(|e| match e {
                StoreError::Procedure(detail) => CreateBusinessError::Upstream(format!(
                    "user {}: {}",
                    caller.caller.id, detail
                )),
                other => other.into(),
            })?;
        Ok(business_id)
    }

    /// Resolve the signed-in user. Anything short of a confirmed user is
    /// treated as logged out, except an unreachable auth service.
    async fn resolve_caller(&self, session: &Session) -> Result<CallerContext, CreateBusinessError> {
        let access_token = session
            .access_token()
            .ok_or(CreateBusinessError::Unauthenticated)?;

        match self.auth.get_user(access_token).await {
            Ok(caller) => Ok(CallerContext {
                caller,
                access_token: access_token.to_string(),
            }),
            Err(AuthError::MissingSession) | Err(AuthError::Rejected(_)) => {
                Err(CreateBusinessError::Unauthenticated)
            }
            Err(e @ AuthError::Unavailable(_)) => Err(CreateBusinessError::Internal(e.into())),
        }
    }
}
