//! Wire types for the Arcade REST API.
//!
//! - `GET  /v1/tools?toolkit=..&limit=..`        list tool definitions
//! - `GET  /v1/tools/{Toolkit.Name}`              fetch one tool definition
//! - `POST /v1/tools/authorize`                   start an authorization flow
//! - `GET  /v1/auth/status?id=..&wait=..`         long-poll a pending flow
//! - `POST /v1/tools/execute`                     run a tool for a user
//!
//! Arcade names tools `Toolkit.Name`; the agent sees `Toolkit_Name`, since
//! dots are not allowed in model-facing function names.

use serde::{Deserialize, Serialize};
use toolgate_domain::{ToolDefinition, ToolParameter};

/// Page of tool definitions
#[derive(Debug, Clone, Deserialize)]
pub struct ToolListResponse {
    #[serde(default)]
    pub items: Vec<ArcadeToolDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcadeToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub toolkit: ArcadeToolkit,
    #[serde(default)]
    pub input: ArcadeToolInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcadeToolkit {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArcadeToolInput {
    #[serde(default)]
    pub parameters: Vec<ArcadeParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcadeParameter {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub value_schema: ArcadeValueSchema,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcadeValueSchema {
    pub val_type: String,
}

impl ArcadeToolDefinition {
    /// Model-facing name, e.g. `Stripe_CreateInvoice`
    pub fn agent_name(&self) -> String {
        format!("{}_{}", self.toolkit.name, self.name)
    }

    pub fn to_definition(&self) -> ToolDefinition {
        self.input.parameters.iter().fold(
            ToolDefinition::new(self.agent_name(), &self.description)
                .with_toolkit(&self.toolkit.name),
            |definition, param| {
                definition.with_parameter(
                    ToolParameter::new(
                        &param.name,
                        param.description.as_deref().unwrap_or_default(),
                        param.required,
                    )
                    .with_type(&param.value_schema.val_type),
                )
            },
        )
    }
}

/// Arcade-side name for a model-facing name: `Stripe_CreateInvoice` →
/// `Stripe.CreateInvoice`. Names without a toolkit prefix pass through.
pub fn qualified_name(agent_name: &str) -> String {
    agent_name.replacen('_', ".", 1)
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest<'a> {
    pub tool_name: &'a str,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationResponseBody {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub tool_name: &'a str,
    pub input: serde_json::Value,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub success: bool,
    /// Milliseconds, as reported by the engine
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub output: Option<ExecuteOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteOutput {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ExecuteError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteError {
    pub message: String,
    #[serde(default)]
    pub developer_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_conversion() {
        let raw = serde_json::json!({
            "name": "CreateInvoice",
            "description": "Create an invoice for a customer",
            "toolkit": { "name": "Stripe" },
            "input": {
                "parameters": [
                    {
                        "name": "customer",
                        "required": true,
                        "description": "Customer ID",
                        "value_schema": { "val_type": "string" }
                    },
                    {
                        "name": "days_until_due",
                        "value_schema": { "val_type": "integer" }
                    }
                ]
            }
        });

        let tool: ArcadeToolDefinition = serde_json::from_value(raw).unwrap();
        let definition = tool.to_definition();

        assert_eq!(definition.name, "Stripe_CreateInvoice");
        assert_eq!(definition.toolkit.as_deref(), Some("Stripe"));
        assert_eq!(definition.parameters.len(), 2);
        assert_eq!(definition.required_parameters().collect::<Vec<_>>(), vec!["customer"]);
        assert_eq!(definition.parameters[1].param_type, "integer");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("Stripe_CreateInvoice"), "Stripe.CreateInvoice");
        assert_eq!(qualified_name("Stripe_Create_Thing"), "Stripe.Create_Thing");
        assert_eq!(qualified_name("Plain"), "Plain");
    }
}
