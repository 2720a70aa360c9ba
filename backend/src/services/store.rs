//! Business store: runs the atomic `create_business` procedure
//!
//! The procedure creates the business row and the caller's ownership link
//! in one transaction and returns the new id. Optional arguments are only
//! passed when present so the procedure can apply its own defaults.

use async_trait::async_trait;
use shared::{BusinessCreationRequest, BusinessId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::services::auth::AuthenticatedCaller;

/// Who is asking for the business, with the token the procedure runs under
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub caller: AuthenticatedCaller,
    pub access_token: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The procedure ran and reported an error
    #[error("create_business failed: {0}")]
    Procedure(String),

    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected response from create_business: {0}")]
    InvalidResponse(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => StoreError::Procedure(db.message().to_string()),
            sqlx::Error::RowNotFound
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => StoreError::InvalidResponse(e.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// Create a business owned by the caller and return its id
    async fn create_business(
        &self,
        caller: &CallerContext,
        request: &BusinessCreationRequest,
    ) -> Result<BusinessId, StoreError>;

    /// Short name reported by the health check
    fn kind(&self) -> &'static str;
}

/// Calls the procedure over a direct Postgres connection
#[derive(Clone)]
pub struct PgBusinessStore {
    db: PgPool,
}

impl PgBusinessStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build `SELECT create_business(p_name => $1, ...)` with only the
    /// arguments that were supplied
    fn build_call(request: &BusinessCreationRequest) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT create_business(p_name => ");
        query.push_bind(request.name.clone());

        let optional = [
            ("p_industry", &request.industry),
            ("p_timezone", &request.timezone),
            ("p_default_reply_tone", &request.default_reply_tone),
        ];
        for (param, value) in optional {
            if let Some(value) = value {
                query.push(format!(", {} => ", param));
                query.push_bind(value.clone());
            }
        }

        query.push(")::text");
        query
    }
}

#[async_trait]
impl BusinessStore for PgBusinessStore {
    async fn create_business(
        &self,
        caller: &CallerContext,
        request: &BusinessCreationRequest,
    ) -> Result<BusinessId, StoreError> {
        // The procedure resolves the owner from the request claims
        let claims = serde_json::json!({
            "sub": caller.caller.id,
            "email": caller.caller.email,
            "role": "authenticated",
        })
        .to_string();

        let mut tx = self.db.begin().await?;

        sqlx::query("SELECT set_config('request.jwt.claims', $1, true)")
            .bind(&claims)
            .execute(&mut *tx)
            .await?;

        let mut call = Self::build_call(request);
        let business_id = call
            .build_query_scalar::<String>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(BusinessId::new(business_id))
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(industry: Option<&str>, timezone: Option<&str>) -> BusinessCreationRequest {
        BusinessCreationRequest {
            name: "Joe's Diner".to_string(),
            industry: industry.map(str::to_string),
            timezone: timezone.map(str::to_string),
            default_reply_tone: None,
        }
    }

    #[test]
    fn test_call_includes_only_present_arguments() {
        let query = PgBusinessStore::build_call(&request(Some("restaurant"), None));
        assert_eq!(
            query.sql(),
            "SELECT create_business(p_name => $1, p_industry => $2)::text"
        );
    }

    #[test]
    fn test_call_keeps_empty_strings() {
        let query = PgBusinessStore::build_call(&request(None, Some("")));
        assert_eq!(
            query.sql(),
            "SELECT create_business(p_name => $1, p_timezone => $2)::text"
        );
    }
}
