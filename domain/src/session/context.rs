//! Per-run execution context

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Identity of the acting user, handed by reference to every tool call.
///
/// Built once per session; the confirmation gate only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    user_id: String,
    session_id: String,
}

impl ExecutionContext {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Result<Self, DomainError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(DomainError::MissingUserId);
        }
        Ok(Self {
            user_id,
            session_id: session_id.into(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_requires_user() {
        assert!(matches!(
            ExecutionContext::new("  ", "s1"),
            Err(DomainError::MissingUserId)
        ));

        let ctx = ExecutionContext::new("user@example.com", "s1").unwrap();
        assert_eq!(ctx.user_id(), "user@example.com");
        assert_eq!(ctx.session_id(), "s1");
    }
}
