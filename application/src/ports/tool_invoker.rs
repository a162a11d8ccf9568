//! Tool invocation port
//!
//! A tool's invocation entry point. The catalog hands out one invoker per
//! tool; the confirmation gate wraps it without ever mutating it.

use async_trait::async_trait;
use std::sync::Arc;
use toolgate_domain::{ExecutionContext, ToolCall, ToolDefinition, ToolResult};

/// Executes a single tool call against the external system.
///
/// Failures are reported inside the [`ToolResult`] and travel back to the
/// model unchanged.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, call: &ToolCall, context: &ExecutionContext) -> ToolResult;
}

/// A tool as obtained from the catalog: definition plus entry point.
///
/// Cloning shares the invoker; descriptors are immutable once listed.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub definition: ToolDefinition,
    pub invoker: Arc<dyn ToolInvoker>,
}

impl ToolDescriptor {
    pub fn new(definition: ToolDefinition, invoker: Arc<dyn ToolInvoker>) -> Self {
        Self { definition, invoker }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}
