//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No acting user id configured")]
    MissingUserId,

    #[error("Tool not in toolset: {0}")]
    UnknownTool(String),

    #[error("History would contain unanswered tool calls: {}", .0.join(", "))]
    DanglingToolCalls(Vec<String>),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
