//! REST gateway client for the `create_business` procedure
//!
//! The call is made with the caller's own access token so the procedure
//! runs as that user and records them as the owner.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{BusinessCreationRequest, BusinessId};

use crate::config::SupabaseConfig;
use crate::services::store::{BusinessStore, CallerContext, StoreError};

/// RPC client for the hosted database
#[derive(Clone)]
pub struct SupabaseRpcClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

/// Named procedure arguments. Absent values are left out of the body so
/// the procedure falls back to its defaults.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CreateBusinessParams<'a> {
    pub p_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_industry: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_timezone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_default_reply_tone: Option<&'a str>,
}

impl<'a> From<&'a BusinessCreationRequest> for CreateBusinessParams<'a> {
    fn from(request: &'a BusinessCreationRequest) -> Self {
        Self {
            p_name: &request.name,
            p_industry: request.industry.as_deref(),
            p_timezone: request.timezone.as_deref(),
            p_default_reply_tone: request.default_reply_tone.as_deref(),
        }
    }
}

impl SupabaseRpcClient {
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
}

#[async_trait]
impl BusinessStore for SupabaseRpcClient {
    async fn create_business(
        &self,
        caller: &CallerContext,
        request: &BusinessCreationRequest,
    ) -> Result<BusinessId, StoreError> {
        let response = self
            .client
            .post(format!("{}/rest/v1/rpc/create_business", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&caller.access_token)
            .json(&CreateBusinessParams::from(request))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Procedure(format!("{}: {}", status, body)));
        }

        let business_id = response
            .json::<BusinessId>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        if business_id.as_str().is_empty() {
            return Err(StoreError::InvalidResponse("empty business id".to_string()));
        }

        Ok(business_id)
    }

    fn kind(&self) -> &'static str {
        "rest"
    }
}
