//! Tool catalog port
//!
//! Lists the tools of one or more toolkits, plus individually named tools,
//! from the tool provider.

use super::tool_invoker::ToolDescriptor;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while listing tools
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Provider rejected the request: {0}")]
    RequestFailed(String),

    #[error("Malformed tool definition: {0}")]
    InvalidDefinition(String),
}

/// Which tools a session asks the catalog for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSelection {
    /// Whole toolkits, e.g. "Stripe"
    pub toolkits: Vec<String>,
    /// Individually named tools, e.g. "Stripe.CreateInvoice"
    pub tools: Vec<String>,
    /// Cap on the size of the whole catalog
    pub limit: usize,
}

impl ToolSelection {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn with_toolkits(mut self, toolkits: Vec<String>) -> Self {
        self.toolkits = toolkits;
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }
}

/// Source of tool descriptors for a session.
#[async_trait]
pub trait ToolCatalogPort: Send + Sync {
    /// List at most `selection.limit` tools, named tools first
    async fn list_tools(
        &self,
        selection: &ToolSelection,
    ) -> Result<Vec<ToolDescriptor>, CatalogError>;
}
