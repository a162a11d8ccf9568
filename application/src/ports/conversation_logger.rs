//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording what happens in a
//! session (user input, gated decisions, denials, history repair) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! transcript (JSONL).

use serde_json::{Value, json};
use toolgate_domain::HumanDecision;

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload. The adapter adds the
/// timestamp.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_input", "tool_denied").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn user_input(text: &str) -> Self {
        Self::new("user_input", json!({ "text": text }))
    }

    pub fn tool_call(tool_name: &str, success: bool, duration_ms: Option<u64>) -> Self {
        Self::new(
            "tool_call",
            json!({ "tool": tool_name, "success": success, "duration_ms": duration_ms }),
        )
    }

    pub fn confirmation_decision(tool_name: &str, decision: HumanDecision) -> Self {
        Self::new(
            "confirmation_decision",
            json!({ "tool": tool_name, "approved": decision.is_approved() }),
        )
    }

    pub fn tool_denied(tool_name: &str) -> Self {
        Self::new("tool_denied", json!({ "tool": tool_name }))
    }

    /// History was repaired after a denial; `history_len` is the new length.
    pub fn reconciled(tool_name: &str, history_len: usize) -> Self {
        Self::new(
            "reconciled",
            json!({ "tool": tool_name, "history_len": history_len }),
        )
    }

    pub fn assistant_output(text: &str, produced_messages: usize) -> Self {
        Self::new(
            "assistant_output",
            json!({ "text": text, "produced_messages": produced_messages }),
        )
    }

    /// A failed turn; `executed_gated` names approved gated calls that ran
    /// before the failure and are no longer in the history.
    pub fn turn_error(error: &str, executed_gated: &[String]) -> Self {
        Self::new(
            "turn_error",
            json!({ "error": error, "executed_gated": executed_gated }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and non-fallible; adapters swallow write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_event_payload() {
        let event = ConversationEvent::confirmation_decision("Stripe_CreateInvoice", HumanDecision::Deny);
        assert_eq!(event.event_type, "confirmation_decision");
        assert_eq!(event.payload["tool"], "Stripe_CreateInvoice");
        assert_eq!(event.payload["approved"], false);
    }

    #[test]
    fn test_reconciled_event_payload() {
        let event = ConversationEvent::reconciled("Stripe_CreateInvoice", 4);
        assert_eq!(event.event_type, "reconciled");
        assert_eq!(event.payload["history_len"], 4);
    }
}
