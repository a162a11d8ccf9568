//! Application-level configuration.
//!
//! Session-wide settings that control how the confirmation gate and the
//! session setup behave. Built once from the file config at startup.

use crate::ports::tool_catalog::ToolSelection;
use std::time::Duration;
use toolgate_domain::{ConfirmationMode, ConfirmationPolicy};

/// Default wait for a human decision on a gated call
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(300);

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Toolkits to pull tools from (e.g. "Stripe")
    pub toolkits: Vec<String>,
    /// Individually named tools fetched alongside the toolkits
    pub tools: Vec<String>,
    /// Maximum number of tools in the session catalog, across all sources
    pub tool_limit: usize,
    /// Tools that need an explicit human decision
    pub policy: ConfirmationPolicy,
    /// Where decisions come from
    pub confirmation_mode: ConfirmationMode,
    /// How long a gated call may wait for a decision; elapsed means denied
    pub decision_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            toolkits: vec!["Stripe".to_string()],
            tools: Vec::new(),
            tool_limit: 100,
            policy: ConfirmationPolicy::stripe_defaults(),
            confirmation_mode: ConfirmationMode::Interactive,
            decision_timeout: DEFAULT_DECISION_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn with_toolkits(mut self, toolkits: Vec<String>) -> Self {
        self.toolkits = toolkits;
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_limit(mut self, tool_limit: usize) -> Self {
        self.tool_limit = tool_limit;
        self
    }

    pub fn with_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_confirmation_mode(mut self, mode: ConfirmationMode) -> Self {
        self.confirmation_mode = mode;
        self
    }

    pub fn tool_selection(&self) -> ToolSelection {
        ToolSelection::new(self.tool_limit)
            .with_toolkits(self.toolkits.clone())
            .with_tools(self.tools.clone())
    }

    /// Creates the timeout from seconds; `0` falls back to the default.
    pub fn with_decision_timeout_seconds(mut self, seconds: u64) -> Self {
        self.decision_timeout = if seconds == 0 {
            DEFAULT_DECISION_TIMEOUT
        } else {
            Duration::from_secs(seconds)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_gate_stripe_money_movers() {
        let config = SessionConfig::default();
        assert_eq!(config.toolkits, vec!["Stripe".to_string()]);
        assert!(config.policy.requires_confirmation("Stripe_CreateInvoice"));
        assert_eq!(config.decision_timeout, DEFAULT_DECISION_TIMEOUT);
    }

    #[test]
    fn test_tool_selection() {
        let selection = SessionConfig::default()
            .with_tools(vec!["Gmail.SendEmail".to_string()])
            .with_tool_limit(10)
            .tool_selection();
        assert_eq!(selection.toolkits, vec!["Stripe".to_string()]);
        assert_eq!(selection.tools, vec!["Gmail.SendEmail".to_string()]);
        assert_eq!(selection.limit, 10);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = SessionConfig::default().with_decision_timeout_seconds(0);
        assert_eq!(config.decision_timeout, DEFAULT_DECISION_TIMEOUT);

        let config = SessionConfig::default().with_decision_timeout_seconds(30);
        assert_eq!(config.decision_timeout, Duration::from_secs(30));
    }
}
