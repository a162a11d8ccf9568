//! HTTP client for the Arcade API

use super::error::{ArcadeError, Result};
use super::protocol::{
    ArcadeToolDefinition, AuthorizationResponseBody, AuthorizeRequest, ExecuteRequest,
    ExecuteResponse, ToolListResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default Arcade API base URL
pub const DEFAULT_ARCADE_BASE: &str = "https://api.arcade.dev";

/// Seconds the status endpoint may hold a long-poll open
const AUTH_STATUS_WAIT_SECS: u64 = 59;

/// Thin typed wrapper over the Arcade REST endpoints.
pub struct ArcadeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ArcadeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ArcadeError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            base_url: DEFAULT_ARCADE_BASE.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List up to `limit` tool definitions of one toolkit
    pub async fn list_tools(&self, toolkit: &str, limit: usize) -> Result<Vec<ArcadeToolDefinition>> {
        let url = format!("{}/v1/tools", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("toolkit", toolkit), ("limit", limit.to_string().as_str())])
            .send()
            .await?;
        let page: ToolListResponse = Self::parse(response).await?;
        debug!(toolkit, count = page.items.len(), "Fetched tool definitions");
        Ok(page.items)
    }

    /// Fetch one tool definition by its Arcade name, e.g. `Stripe.CreateInvoice`
    pub async fn get_tool(&self, tool_name: &str) -> Result<ArcadeToolDefinition> {
        let url = format!("{}/v1/tools/{}", self.base_url, tool_name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Start (or check) the authorization flow for a tool and user
    pub async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthorizationResponseBody> {
        let url = format!("{}/v1/tools/authorize", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&AuthorizeRequest { tool_name, user_id })
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Long-poll the status of an authorization flow
    pub async fn auth_status(&self, flow_id: &str) -> Result<AuthorizationResponseBody> {
        let url = format!("{}/v1/auth/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("id", flow_id), ("wait", AUTH_STATUS_WAIT_SECS.to_string().as_str())])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Execute a tool on behalf of a user
    pub async fn execute(
        &self,
        tool_name: &str,
        input: serde_json::Value,
        user_id: &str,
    ) -> Result<ExecuteResponse> {
        let url = format!("{}/v1/tools/execute", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ExecuteRequest {
                tool_name,
                input,
                user_id,
            })
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArcadeError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ArcadeError::Parse(e.to_string()))
    }
}
