//! Agent runtime port
//!
//! Defines the interface to the LLM agent runtime: given the agent, the full
//! history and the gated toolset for this turn, drive the model until it
//! produces a final answer, or stop at the first denied call.

use crate::use_cases::confirm_tool::TurnTools;
use async_trait::async_trait;
use thiserror::Error;
use toolgate_domain::{AgentDefinition, DenialSignal, ExecutionContext, Message};

/// Errors that can occur while running a turn
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Max iterations exceeded ({0})")]
    MaxIterationsExceeded(usize),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Everything the runtime needs for one turn
pub struct RunRequest<'a> {
    pub agent: &'a AgentDefinition,
    /// Full history, ending with the turn's user message
    pub history: &'a [Message],
    pub context: &'a ExecutionContext,
    /// Gated tools, bound to this turn
    pub tools: &'a TurnTools<'a>,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The model finished. `produced` holds every message the run added
    /// (tool-call requests, tool results, final answer), in order.
    Completed {
        output: String,
        produced: Vec<Message>,
    },
    /// A gated call was denied; the run stopped and its partial messages
    /// are discarded.
    Denied(DenialSignal),
}

/// Port for the agent runtime.
///
/// Implementations must stop dispatching tool calls as soon as a call
/// comes back denied and return [`RunOutcome::Denied`].
#[async_trait]
pub trait AgentRuntimePort: Send + Sync {
    async fn run(&self, request: RunRequest<'_>) -> Result<RunOutcome, RuntimeError>;
}
