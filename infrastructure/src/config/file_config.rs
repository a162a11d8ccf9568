//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application and domain
//! types at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use toolgate_application::SessionConfig;
use toolgate_domain::{
    AgentDefinition, ConfirmationMode, ConfirmationPolicy, DEFAULT_GATED_TOOLS,
    DEFAULT_INSTRUCTIONS,
};

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("confirmation.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("openai.model cannot be empty")]
    EmptyModelName,

    #[error("arcade.user_id is not set (use --user or ARCADE_USER_ID)")]
    MissingUserId,

    #[error("arcade.api_key is not set (use ARCADE_API_KEY)")]
    MissingArcadeKey,

    #[error("openai.api_key is not set (use OPENAI_API_KEY)")]
    MissingOpenAiKey,

    #[error("agent.max_iterations cannot be 0")]
    InvalidMaxIterations,

    #[error("confirmation.mode: {0}")]
    InvalidMode(String),
}

/// `[arcade]` section: the tool provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArcadeConfig {
    /// API key (prefer the ARCADE_API_KEY environment variable)
    pub api_key: Option<String>,
    pub base_url: String,
    /// Acting user identity, usually an email address
    pub user_id: Option<String>,
    /// Toolkits whose tools are offered to the agent
    pub toolkits: Vec<String>,
    /// Individual tools offered alongside the toolkits, e.g. "Gmail.SendEmail"
    pub tools: Vec<String>,
    /// Maximum number of tools in the catalog, across toolkits and named tools
    pub tool_limit: usize,
}

impl Default for FileArcadeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.arcade.dev".to_string(),
            user_id: None,
            toolkits: vec!["Stripe".to_string()],
            tools: Vec::new(),
            tool_limit: 100,
        }
    }
}

/// `[openai]` section: the model behind the agent runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// API key (prefer the OPENAI_API_KEY environment variable)
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL, can point at any chat-completions compatible endpoint
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// `[agent]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub name: String,
    /// Replaces the built-in Stripe instructions
    pub instructions: Option<String>,
    /// Model round-trips allowed per turn
    pub max_iterations: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            name: toolgate_domain::session::DEFAULT_AGENT_NAME.to_string(),
            instructions: None,
            max_iterations: 10,
        }
    }
}

/// `[confirmation]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfirmationConfig {
    /// Tools that need explicit approval for every call
    pub tools: Vec<String>,
    /// How long to wait for a decision before denying
    pub timeout_seconds: u64,
    /// "interactive", "auto_reject" or "auto_approve"
    pub mode: String,
}

impl Default for FileConfirmationConfig {
    fn default() -> Self {
        Self {
            tools: DEFAULT_GATED_TOOLS.iter().map(|t| t.to_string()).collect(),
            timeout_seconds: 300,
            mode: ConfirmationMode::default().as_str().to_string(),
        }
    }
}

impl FileConfirmationConfig {
    pub fn parse_mode(&self) -> Result<ConfirmationMode, ConfigValidationError> {
        self.mode
            .parse()
            .map_err(ConfigValidationError::InvalidMode)
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.tools.iter().cloned().collect()
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation transcript; disabled when unset
    pub conversation_log: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub arcade: FileArcadeConfig,
    pub openai: FileOpenAiConfig,
    pub agent: FileAgentConfig,
    pub confirmation: FileConfirmationConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.confirmation.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if let Err(e) = self.confirmation.parse_mode() {
            issues.push(e);
        }
        if self.openai.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.agent.max_iterations == 0 {
            issues.push(ConfigValidationError::InvalidMaxIterations);
        }
        if is_blank(&self.arcade.user_id) {
            issues.push(ConfigValidationError::MissingUserId);
        }
        if is_blank(&self.arcade.api_key) {
            issues.push(ConfigValidationError::MissingArcadeKey);
        }
        if is_blank(&self.openai.api_key) {
            issues.push(ConfigValidationError::MissingOpenAiKey);
        }

        issues
    }

    /// Session settings for the application layer.
    ///
    /// Call after [`validate`](Self::validate); an unparseable mode falls
    /// back to interactive.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_toolkits(self.arcade.toolkits.clone())
            .with_tools(self.arcade.tools.clone())
            .with_tool_limit(self.arcade.tool_limit)
            .with_policy(self.confirmation.policy())
            .with_confirmation_mode(self.confirmation.parse_mode().unwrap_or_default())
            .with_decision_timeout_seconds(self.confirmation.timeout_seconds)
    }

    pub fn agent_definition(&self) -> AgentDefinition {
        AgentDefinition::new(&self.openai.model)
            .with_name(&self.agent.name)
            .with_instructions(
                self.agent
                    .instructions
                    .as_deref()
                    .unwrap_or(DEFAULT_INSTRUCTIONS),
            )
            .with_max_iterations(self.agent.max_iterations)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
