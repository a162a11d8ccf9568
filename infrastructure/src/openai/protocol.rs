//! Chat Completions wire types and conversion from conversation messages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use toolgate_domain::{Message, Role, ToolCallRequest};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// Null for assistant messages that only carry tool calls
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ChatToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: ChatFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: &str, content: &str) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.to_string()),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let content = if message.role == Role::Assistant
            && message.has_tool_calls()
            && message.content.is_empty()
        {
            None
        } else {
            Some(message.content.clone())
        };

        Self {
            role: message.role.as_str().to_string(),
            content,
            tool_calls: message.tool_calls.iter().map(ChatToolCall::from).collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

impl From<&ToolCallRequest> for ChatToolCall {
    fn from(call: &ToolCallRequest) -> Self {
        let arguments = serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".to_string());
        Self {
            id: call.id.clone(),
            call_type: function_type(),
            function: ChatFunctionCall {
                name: call.name.clone(),
                arguments,
            },
        }
    }
}

impl ChatToolCall {
    /// Decode the model's argument string.
    ///
    /// An empty string means no arguments.
    pub fn parse_arguments(&self) -> Result<HashMap<String, serde_json::Value>, String> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(raw).map_err(|e| format!("invalid tool arguments: {}", e))
    }
}
