//! Outcome of pushing one tool call through the confirmation gate

use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Signal raised when a human declines a gated call.
///
/// Carries the denied tool's name; the turn driver turns it into the
/// conversation repair block exactly once per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialSignal {
    pub tool_name: String,
}

impl DenialSignal {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
        }
    }
}

impl std::fmt::Display for DenialSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call to {} was denied", self.tool_name)
    }
}

/// What happened to a tool call at the gate.
///
/// `Executed` holds the wrapped tool's result untouched, including failed
/// results. `Denied` means the wrapped tool was never invoked and the run
/// must stop.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Executed(ToolResult),
    Denied(DenialSignal),
}

impl GateOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, GateOutcome::Denied(_))
    }

    pub fn denial(&self) -> Option<&DenialSignal> {
        match self {
            GateOutcome::Denied(signal) => Some(signal),
            GateOutcome::Executed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<ToolResult, DenialSignal> {
        match self {
            GateOutcome::Executed(result) => Ok(result),
            GateOutcome::Denied(signal) => Err(signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        let executed = GateOutcome::Executed(ToolResult::success("Stripe_RetrieveBalance", "ok"));
        assert!(!executed.is_denied());
        assert_eq!(executed.into_result().unwrap().output(), Some("ok"));

        let denied = GateOutcome::Denied(DenialSignal::new("Stripe_CreateInvoice"));
        assert_eq!(denied.denial().unwrap().tool_name, "Stripe_CreateInvoice");
        assert_eq!(
            denied.into_result().unwrap_err().to_string(),
            "call to Stripe_CreateInvoice was denied"
        );
    }
}
