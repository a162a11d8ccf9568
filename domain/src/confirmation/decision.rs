//! Human decisions and the per-call confirmation state machine

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A human's answer to a pending gated call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanDecision {
    Approve,
    Deny,
}

impl HumanDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, HumanDecision::Approve)
    }
}

/// Where decisions for gated calls come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMode {
    /// Ask the operator at the terminal
    #[default]
    Interactive,
    /// Deny every gated call without asking
    AutoReject,
    /// Approve every gated call without asking
    AutoApprove,
}

impl ConfirmationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationMode::Interactive => "interactive",
            ConfirmationMode::AutoReject => "auto_reject",
            ConfirmationMode::AutoApprove => "auto_approve",
        }
    }
}

impl std::fmt::Display for ConfirmationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfirmationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "interactive" => Ok(ConfirmationMode::Interactive),
            "auto_reject" | "reject" => Ok(ConfirmationMode::AutoReject),
            "auto_approve" | "approve" => Ok(ConfirmationMode::AutoApprove),
            other => Err(format!("Unknown confirmation mode: {}", other)),
        }
    }
}

/// Lifecycle of a single tool call through the confirmation gate.
///
/// ```text
/// PendingDecision ──approve──▶ Approved ──▶ Executed
///        │
///        └────────deny───────▶ Denied ───▶ Aborted
/// ```
///
/// Ungated calls start directly in `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    PendingDecision,
    Approved,
    Executed,
    Denied,
    Aborted,
}

impl ConfirmationState {
    /// Initial state for a call, depending on whether it is gated
    pub fn initial(gated: bool) -> Self {
        if gated {
            ConfirmationState::PendingDecision
        } else {
            ConfirmationState::Approved
        }
    }

    /// Apply a human decision. Only valid from `PendingDecision`.
    pub fn decide(self, decision: HumanDecision) -> Self {
        match (self, decision) {
            (ConfirmationState::PendingDecision, HumanDecision::Approve) => ConfirmationState::Approved,
            (ConfirmationState::PendingDecision, HumanDecision::Deny) => ConfirmationState::Denied,
            (other, _) => other,
        }
    }

    /// Advance past the decision: approved calls execute, denied calls abort.
    pub fn finish(self) -> Self {
        match self {
            ConfirmationState::Approved => ConfirmationState::Executed,
            ConfirmationState::Denied => ConfirmationState::Aborted,
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConfirmationState::Executed | ConfirmationState::Aborted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationState::PendingDecision => "pending_decision",
            ConfirmationState::Approved => "approved",
            ConfirmationState::Executed => "executed",
            ConfirmationState::Denied => "denied",
            ConfirmationState::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for ConfirmationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
