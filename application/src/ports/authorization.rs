//! Authorization port for per-(user, tool) permission with the tool provider.
//!
//! The provider owns the authorization record. Starting a flow either
//! completes immediately (already authorized) or returns a pending response
//! with a consent URL the user must visit out of band:
//!
//! ```text
//! authorize(tool, user)
//!        ↓
//!   Completed ──────────────────────────────▶ tool available
//!   Pending(url, id) ─▶ notify operator ─▶ wait_for_completion(id)
//!                                                ↓
//!                                  Completed ─▶ tool available
//!                                  Failed    ─▶ tool dropped for the session
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while running an authorization flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Authorization refused for {tool}: {reason}")]
    Refused { tool: String, reason: String },

    #[error("Authorization flow failed for {tool}: {reason}")]
    FlowFailed { tool: String, reason: String },

    #[error("Authorization for {0} is still pending and has no flow id to wait on")]
    NoFlowId(String),
}

/// Terminal or intermediate status of an authorization flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    Completed,
    Pending,
    Failed,
}

/// Provider's answer to an authorization request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    /// Flow ID, used to wait for a pending flow
    pub id: Option<String>,
    pub status: AuthorizationStatus,
    /// Consent URL for pending flows
    pub url: Option<String>,
}

impl AuthorizationResponse {
    pub fn completed() -> Self {
        Self {
            id: None,
            status: AuthorizationStatus::Completed,
            url: None,
        }
    }

    pub fn pending(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: AuthorizationStatus::Pending,
            url: Some(url.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            id: None,
            status: AuthorizationStatus::Failed,
            url: None,
        }
    }
}

/// Port to the external authorization provider.
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    /// Start (or check) the authorization flow for `tool_name` and `user_id`
    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, AuthorizationError>;

    /// Block until the pending flow `flow_id` reaches a terminal status
    async fn wait_for_completion(
        &self,
        tool_name: &str,
        flow_id: &str,
    ) -> Result<AuthorizationResponse, AuthorizationError>;
}

/// Operator-facing notifications during session setup.
pub trait AuthorizationNotifier: Send + Sync {
    /// A consent URL must be visited before `tool_name` can be used
    fn on_authorization_required(&self, tool_name: &str, url: &str);

    fn on_authorization_granted(&self, _tool_name: &str) {}

    /// `tool_name` will not be available this session
    fn on_authorization_failed(&self, tool_name: &str, error: &AuthorizationError);
}

/// No-op notifier for tests and non-interactive runs
pub struct NoAuthorizationNotifier;

impl AuthorizationNotifier for NoAuthorizationNotifier {
    fn on_authorization_required(&self, _tool_name: &str, _url: &str) {}
    fn on_authorization_failed(&self, _tool_name: &str, _error: &AuthorizationError) {}
}
