//! Tool catalog and tool execution backed by Arcade

use super::client::ArcadeClient;
use super::error::ArcadeError;
use super::protocol::{ExecuteResponse, qualified_name};
use async_trait::async_trait;
use std::sync::Arc;
use super::protocol::ArcadeToolDefinition;
use toolgate_application::ports::tool_catalog::{CatalogError, ToolCatalogPort, ToolSelection};
use toolgate_application::ports::tool_invoker::{ToolDescriptor, ToolInvoker};
use toolgate_domain::{ExecutionContext, ToolCall, ToolError, ToolResult};
use tracing::{debug, warn};

impl From<ArcadeError> for CatalogError {
    fn from(e: ArcadeError) -> Self {
        match e {
            ArcadeError::Parse(msg) => CatalogError::InvalidDefinition(msg),
            other if other.is_connection() => CatalogError::ConnectionError(other.to_string()),
            other => CatalogError::RequestFailed(other.to_string()),
        }
    }
}

/// Lists tools from Arcade toolkits and hands out invokers that execute
/// them through the same client.
pub struct ArcadeToolCatalog {
    client: Arc<ArcadeClient>,
}

impl ArcadeToolCatalog {
    pub fn new(client: Arc<ArcadeClient>) -> Self {
        Self { client }
    }

    /// Add a tool unless its name is taken. Returns false once `limit` is reached.
    fn push(
        &self,
        descriptors: &mut Vec<ToolDescriptor>,
        tool: ArcadeToolDefinition,
        limit: usize,
    ) -> bool {
        if descriptors.len() >= limit {
            return false;
        }
        let definition = tool.to_definition();
        if descriptors.iter().any(|d| d.name() == definition.name) {
            warn!(tool = %definition.name, "Duplicate tool name, keeping the first");
            return true;
        }
        let invoker = Arc::new(ArcadeToolInvoker::new(
            Arc::clone(&self.client),
            qualified_name(&definition.name),
        ));
        descriptors.push(ToolDescriptor::new(definition, invoker));
        descriptors.len() < limit
    }
}

/// Arcade name for a configured tool; `Stripe_CreateInvoice` and
/// `Stripe.CreateInvoice` both work.
fn arcade_tool_name(configured: &str) -> String {
    if configured.contains('.') {
        configured.to_string()
    } else {
        qualified_name(configured)
    }
}

#[async_trait]
impl ToolCatalogPort for ArcadeToolCatalog {
    async fn list_tools(
        &self,
        selection: &ToolSelection,
    ) -> Result<Vec<ToolDescriptor>, CatalogError> {
        let limit = selection.limit;
        let mut descriptors: Vec<ToolDescriptor> = Vec::new();
        if limit == 0 {
            return Ok(descriptors);
        }

        for name in &selection.tools {
            let tool = self.client.get_tool(&arcade_tool_name(name)).await?;
            if !self.push(&mut descriptors, tool, limit) {
                debug!(limit, "Tool limit reached");
                return Ok(descriptors);
            }
        }

        for toolkit in &selection.toolkits {
            let remaining = limit - descriptors.len();
            for tool in self.client.list_tools(toolkit, remaining).await? {
                if !self.push(&mut descriptors, tool, limit) {
                    debug!(limit, "Tool limit reached");
                    return Ok(descriptors);
                }
            }
        }
        Ok(descriptors)
    }
}

/// Invocation entry point for one Arcade tool
pub struct ArcadeToolInvoker {
    client: Arc<ArcadeClient>,
    /// Arcade-side name, e.g. `Stripe.CreateInvoice`
    arcade_name: String,
}

impl ArcadeToolInvoker {
    pub fn new(client: Arc<ArcadeClient>, arcade_name: impl Into<String>) -> Self {
        Self {
            client,
            arcade_name: arcade_name.into(),
        }
    }

    fn to_result(tool_name: &str, response: ExecuteResponse) -> ToolResult {
        let output = response.output.unwrap_or_default();

        let result = match (response.success, output.error) {
            (_, Some(error)) => {
                let mut tool_error = ToolError::execution_failed(error.message);
                if let Some(details) = error.developer_message {
                    tool_error = tool_error.with_details(details);
                }
                ToolResult::failure(tool_name, tool_error)
            }
            (false, None) => ToolResult::failure(
                tool_name,
                ToolError::execution_failed("tool reported failure without details"),
            ),
            (true, None) => {
                let text = match output.value {
                    Some(serde_json::Value::String(s)) => s,
                    Some(value) => value.to_string(),
                    None => String::new(),
                };
                ToolResult::success(tool_name, text)
            }
        };

        match response.duration {
            Some(ms) if ms >= 0.0 => result.with_duration(ms.round() as u64),
            _ => result,
        }
    }
}

#[async_trait]
impl ToolInvoker for ArcadeToolInvoker {
    async fn invoke(&self, call: &ToolCall, context: &ExecutionContext) -> ToolResult {
        debug!(tool = %self.arcade_name, user = context.user_id(), "Executing tool");
        match self
            .client
            .execute(&self.arcade_name, call.arguments_json(), context.user_id())
            .await
        {
            Ok(response) => Self::to_result(&call.tool_name, response),
            Err(e) => {
                warn!(tool = %self.arcade_name, error = %e, "Tool execution request failed");
                ToolResult::failure(&call.tool_name, ToolError::execution_failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Arc<ArcadeClient> {
        Arc::new(
            ArcadeClient::new("arc_test")
                .unwrap()
                .with_base_url(server.uri()),
        )
    }

    fn stripe(limit: usize) -> ToolSelection {
        ToolSelection::new(limit).with_toolkits(vec!["Stripe".to_string()])
    }

    fn tool_json(toolkit: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "description": format!("{} tool", name),
            "toolkit": { "name": toolkit }
        })
    }

    fn context() -> ExecutionContext {
        ExecutionContext::new("user@example.com", "s1").unwrap()
    }

    #[tokio::test]
    async fn test_list_tools_builds_descriptors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tools"))
            .and(query_param("toolkit", "Stripe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "name": "CreateInvoice",
                        "description": "Create an invoice",
                        "toolkit": { "name": "Stripe" },
                        "input": { "parameters": [] }
                    },
                    {
                        "name": "RetrieveBalance",
                        "description": "Retrieve the balance",
                        "toolkit": { "name": "Stripe" }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let tools = ArcadeToolCatalog::new(client(&server))
            .list_tools(&stripe(100))
            .await
            .unwrap();

        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Stripe_CreateInvoice", "Stripe_RetrieveBalance"]);
    }

    #[tokio::test]
    async fn test_list_tools_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tools"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = ArcadeToolCatalog::new(client(&server))
            .list_tools(&stripe(100))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_limit_caps_whole_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tools"))
            .and(query_param("toolkit", "Stripe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    tool_json("Stripe", "CreateInvoice"),
                    tool_json("Stripe", "RetrieveBalance"),
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/tools"))
            .and(query_param("toolkit", "Gmail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [tool_json("Gmail", "SendEmail"), tool_json("Gmail", "ListEmails")]
            })))
            .mount(&server)
            .await;

        let selection = ToolSelection::new(3)
            .with_toolkits(vec!["Stripe".to_string(), "Gmail".to_string()]);
        let tools = ArcadeToolCatalog::new(client(&server))
            .list_tools(&selection)
            .await
            .unwrap();

        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec!["Stripe_CreateInvoice", "Stripe_RetrieveBalance", "Gmail_SendEmail"]
        );
    }

    #[tokio::test]
    async fn test_named_tools_merge_with_toolkits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tools/Gmail.SendEmail"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(tool_json("Gmail", "SendEmail")),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/tools/Stripe.CreateInvoice"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(tool_json("Stripe", "CreateInvoice")),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/tools"))
            .and(query_param("toolkit", "Stripe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    tool_json("Stripe", "CreateInvoice"),
                    tool_json("Stripe", "RetrieveBalance"),
                ]
            })))
            .mount(&server)
            .await;

        let selection = stripe(100).with_tools(vec![
            "Gmail.SendEmail".to_string(),
            "Stripe_CreateInvoice".to_string(),
        ]);
        let tools = ArcadeToolCatalog::new(client(&server))
            .list_tools(&selection)
            .await
            .unwrap();

        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec!["Gmail_SendEmail", "Stripe_CreateInvoice", "Stripe_RetrieveBalance"]
        );
    }

    #[tokio::test]
    async fn test_invoke_sends_qualified_name_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tools/execute"))
            .and(body_partial_json(serde_json::json!({
                "tool_name": "Stripe.RetrieveBalance",
                "user_id": "user@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "duration": 12.4,
                "output": { "value": { "available": [] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = ArcadeToolInvoker::new(client(&server), "Stripe.RetrieveBalance");
        let result = invoker
            .invoke(&ToolCall::new("Stripe_RetrieveBalance"), &context())
            .await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("{\"available\":[]}"));
        assert_eq!(result.duration_ms, Some(12));
    }

    #[tokio::test]
    async fn test_invoke_reports_tool_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tools/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "output": { "error": { "message": "No such customer: cus_x" } }
            })))
            .mount(&server)
            .await;

        let invoker = ArcadeToolInvoker::new(client(&server), "Stripe.CreateInvoice");
        let result = invoker
            .invoke(&ToolCall::new("Stripe_CreateInvoice"), &context())
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().message, "No such customer: cus_x");
    }
}
