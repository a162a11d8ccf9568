//! Confirmation port for gated tool calls.
//!
//! This module defines the port (interface) for asking a human whether a
//! specific pending tool call may run.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`ConfirmationPort`] - defined here in application layer
//! - **Adapter**: `InteractiveConfirmation` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! model requests Stripe_CreateInvoice
//!        ↓
//! policy: gated
//!        ↓
//! ConfirmationPort::request_confirmation()
//!        ↓
//! Approve → call runs    Deny → turn aborts, history repaired
//! ```
//!
//! # Built-in Implementations
//!
//! - [`AutoRejectConfirmation`] - Always returns `HumanDecision::Deny`
//! - [`AutoApproveConfirmation`] - Always returns `HumanDecision::Approve`

use async_trait::async_trait;
use thiserror::Error;
use toolgate_domain::{ExecutionContext, HumanDecision, ToolCall};

/// Error type for confirmation operations.
///
/// These are failures to obtain a decision, not decisions. The gate treats
/// every one of them as a denial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// User cancelled the prompt (e.g., Ctrl+D)
    #[error("Confirmation cancelled")]
    Cancelled,

    /// Terminal read/write failure
    #[error("I/O error: {0}")]
    IoError(String),
}

/// A pending gated call, as shown to the human.
#[derive(Debug, Clone)]
pub struct ConfirmationRequest {
    pub tool_name: String,
    pub description: String,
    /// Call arguments as a JSON object
    pub arguments: serde_json::Value,
    pub user_id: String,
}

impl ConfirmationRequest {
    pub fn new(call: &ToolCall, description: &str, context: &ExecutionContext) -> Self {
        Self {
            tool_name: call.tool_name.clone(),
            description: description.to_string(),
            arguments: call.arguments_json(),
            user_id: context.user_id().to_string(),
        }
    }
}

/// Port for obtaining a human decision on a gated call.
///
/// # Implementations
///
/// - **Interactive (CLI)**: `InteractiveConfirmation` in presentation layer
/// - **Auto-reject**: [`AutoRejectConfirmation`]
/// - **Auto-approve**: [`AutoApproveConfirmation`]
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Ask whether the pending call may run.
    ///
    /// Must not hold any state shared across sessions while waiting.
    async fn request_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<HumanDecision, ConfirmationError>;
}

/// Denies every gated call. The safest non-interactive mode.
pub struct AutoRejectConfirmation;

#[async_trait]
impl ConfirmationPort for AutoRejectConfirmation {
    async fn request_confirmation(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<HumanDecision, ConfirmationError> {
        Ok(HumanDecision::Deny)
    }
}

/// Approves every gated call.
///
/// # Warning
///
/// **Use with caution!** Gated tools move money. Only for sandboxed Stripe
/// accounts and scripted runs.
pub struct AutoApproveConfirmation;

#[async_trait]
impl ConfirmationPort for AutoApproveConfirmation {
    async fn request_confirmation(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<HumanDecision, ConfirmationError> {
        Ok(HumanDecision::Approve)
    }
}
