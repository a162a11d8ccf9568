//! Function-tool schemas for the Chat Completions API.
//!
//! Parameter type mapping:
//! - `"string"` → `"string"`
//! - `"integer"` → `"integer"`
//! - `"number"` → `"number"`
//! - `"boolean"` → `"boolean"`
//! - `"array"` → `"array"`
//! - `"json"` → `"object"`
//! - anything else → `"string"`

use toolgate_domain::ToolDefinition;

pub fn tool_to_function(tool: &ToolDefinition) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in &tool.parameters {
        let mut prop = serde_json::Map::new();
        let schema_type = match param.param_type.to_ascii_lowercase().as_str() {
            "integer" => "integer",
            "number" => "number",
            "boolean" => "boolean",
            "array" => {
                prop.insert("items".to_string(), serde_json::json!({}));
                "array"
            }
            "json" | "object" => "object",
            _ => "string",
        };
        prop.insert("type".to_string(), serde_json::json!(schema_type));
        if !param.description.is_empty() {
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
        }
        properties.insert(param.name.clone(), serde_json::Value::Object(prop));

        if param.required {
            required.push(serde_json::json!(param.name));
        }
    }

    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        }
    })
}

/// Schemas for every tool, sorted by name for stable requests
pub fn all_functions<'a>(tools: impl Iterator<Item = &'a ToolDefinition>) -> Vec<serde_json::Value> {
    let mut tools: Vec<&ToolDefinition> = tools.collect();
    tools.sort_by(|a, b| a.name.cmp(&b.name));
    tools.into_iter().map(tool_to_function).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_domain::ToolParameter;

    #[test]
    fn test_tool_to_function() {
        let tool = ToolDefinition::new("Stripe_CreateInvoice", "Create an invoice")
            .with_parameter(ToolParameter::new("customer", "Customer ID", true))
            .with_parameter(
                ToolParameter::new("days_until_due", "Days until due", false).with_type("integer"),
            )
            .with_parameter(ToolParameter::new("metadata", "", false).with_type("json"));

        let schema = tool_to_function(&tool);
        let function = &schema["function"];
        assert_eq!(schema["type"], "function");
        assert_eq!(function["name"], "Stripe_CreateInvoice");
        assert_eq!(function["parameters"]["properties"]["customer"]["type"], "string");
        assert_eq!(function["parameters"]["properties"]["days_until_due"]["type"], "integer");
        assert_eq!(function["parameters"]["properties"]["metadata"]["type"], "object");
        assert!(function["parameters"]["properties"]["metadata"].get("description").is_none());
        assert_eq!(function["parameters"]["required"], serde_json::json!(["customer"]));
    }

    #[test]
    fn test_all_functions_sorted() {
        let tools = [
            ToolDefinition::new("Stripe_RetrieveBalance", "b"),
            ToolDefinition::new("Stripe_CreateInvoice", "a"),
        ];
        let schemas = all_functions(tools.iter());
        assert_eq!(schemas[0]["function"]["name"], "Stripe_CreateInvoice");
        assert_eq!(schemas[1]["function"]["name"], "Stripe_RetrieveBalance");
    }
}
