//! Turn progress notification port
//!
//! Lifecycle hooks fired while a turn runs: agent start/end, tool
//! start/end, and confirmation events. Implementations live in the
//! presentation layer.

use toolgate_domain::{HumanDecision, ToolResult};

/// Callback for progress updates during a turn.
///
/// Every method has a no-op default so adapters only override what they
/// display.
pub trait TurnProgressNotifier: Send + Sync {
    /// Called before the runtime is invoked for a turn
    fn on_agent_start(&self, _agent_name: &str) {}

    /// Called once the runtime returns, whatever the outcome
    fn on_agent_end(&self, _agent_name: &str) {}

    /// Called right before a tool's real invocation
    fn on_tool_start(&self, _tool_name: &str) {}

    /// Called with the wrapped tool's result
    fn on_tool_end(&self, _tool_name: &str, _result: &ToolResult) {}

    /// Called when a gated call is about to wait for a human decision
    fn on_confirmation_required(&self, _tool_name: &str) {}

    /// Called once a decision for a gated call is known
    fn on_confirmation_decided(&self, _tool_name: &str, _decision: HumanDecision) {}
}

/// No-op progress notifier
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
