//! Authorization flows backed by Arcade

use super::client::ArcadeClient;
use super::error::ArcadeError;
use super::protocol::{AuthorizationResponseBody, qualified_name};
use async_trait::async_trait;
use std::sync::Arc;
use toolgate_application::ports::authorization::{
    AuthorizationError, AuthorizationPort, AuthorizationResponse, AuthorizationStatus,
};
use tracing::debug;

/// Long-polls before a pending flow is given up
const DEFAULT_MAX_POLLS: usize = 10;

pub struct ArcadeAuthorizer {
    client: Arc<ArcadeClient>,
    max_polls: usize,
}

impl ArcadeAuthorizer {
    pub fn new(client: Arc<ArcadeClient>) -> Self {
        Self {
            client,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    pub fn with_max_polls(mut self, max_polls: usize) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    fn convert(
        tool_name: &str,
        body: AuthorizationResponseBody,
    ) -> Result<AuthorizationResponse, AuthorizationError> {
        let status = match body.status.to_ascii_lowercase().as_str() {
            "completed" => AuthorizationStatus::Completed,
            "pending" => AuthorizationStatus::Pending,
            "failed" => AuthorizationStatus::Failed,
            other => {
                return Err(AuthorizationError::FlowFailed {
                    tool: tool_name.to_string(),
                    reason: format!("unknown authorization status '{}'", other),
                });
            }
        };
        Ok(AuthorizationResponse {
            id: body.id,
            status,
            url: body.url,
        })
    }

    fn flow_error(tool_name: &str, e: ArcadeError) -> AuthorizationError {
        match e {
            ArcadeError::Api { status, body } if status == 401 || status == 403 => {
                AuthorizationError::Refused {
                    tool: tool_name.to_string(),
                    reason: body,
                }
            }
            other => AuthorizationError::FlowFailed {
                tool: tool_name.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl AuthorizationPort for ArcadeAuthorizer {
    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, AuthorizationError> {
        let body = self
            .client
            .authorize(&qualified_name(tool_name), user_id)
            .await
            .map_err(|e| Self::flow_error(tool_name, e))?;
        Self::convert(tool_name, body)
    }

    async fn wait_for_completion(
        &self,
        tool_name: &str,
        flow_id: &str,
    ) -> Result<AuthorizationResponse, AuthorizationError> {
        for attempt in 1..=self.max_polls {
            let body = self
                .client
                .auth_status(flow_id)
                .await
                .map_err(|e| Self::flow_error(tool_name, e))?;
            let response = Self::convert(tool_name, body)?;
            if response.status != AuthorizationStatus::Pending {
                return Ok(response);
            }
            debug!(tool = tool_name, attempt, "Authorization still pending");
        }
        Err(AuthorizationError::FlowFailed {
            tool: tool_name.to_string(),
            reason: format!("still pending after {} polls", self.max_polls),
        })
    }
}
