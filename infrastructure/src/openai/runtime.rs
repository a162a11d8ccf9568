//! Agent runtime on top of the OpenAI Chat Completions API.
//!
//! Each iteration sends the whole conversation plus the gated tool schemas.
//! When the model asks for tools, every requested call goes through
//! [`TurnTools::call`]; the first denied call ends the run.

use super::protocol::{ChatMessage, ChatRequest, ChatResponse, ChatToolCall};
use super::schema;
use async_trait::async_trait;
use reqwest::Client;
use toolgate_application::ports::agent_runtime::{
    AgentRuntimePort, RunOutcome, RunRequest, RuntimeError,
};
use toolgate_application::TurnTools;
use toolgate_domain::{
    ExecutionContext, GateOutcome, Message, ToolCall, ToolCallRequest, ToolError, ToolResult,
};
use tracing::{debug, info, warn};

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiAgentRuntime {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiAgentRuntime {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[serde_json::Value],
    ) -> Result<ChatMessage, RuntimeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model,
            messages,
            tools: tools.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RuntimeError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RuntimeError::ProviderError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| RuntimeError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| {
                debug!(finish_reason = ?choice.finish_reason, "Model responded");
                choice.message
            })
            .ok_or_else(|| RuntimeError::InvalidResponse("response has no choices".to_string()))
    }
}

/// Run one model-requested call through the gate.
///
/// Unparseable arguments never reach the gate; the model gets an
/// invalid-argument result instead.
async fn dispatch(
    requested: &ChatToolCall,
    tools: &TurnTools<'_>,
    context: &ExecutionContext,
) -> GateOutcome {
    match requested.parse_arguments() {
        Ok(arguments) => {
            let call = ToolCall {
                id: requested.id.clone(),
                tool_name: requested.function.name.clone(),
                arguments,
            };
            tools.call(&call, context).await
        }
        Err(message) => {
            warn!(tool = %requested.function.name, "{}", message);
            GateOutcome::Executed(ToolResult::failure(
                &requested.function.name,
                ToolError::invalid_argument(message),
            ))
        }
    }
}

#[async_trait]
impl AgentRuntimePort for OpenAiAgentRuntime {
    async fn run(&self, request: RunRequest<'_>) -> Result<RunOutcome, RuntimeError> {
        let RunRequest {
            agent,
            history,
            context,
            tools,
        } = request;

        let mut wire: Vec<ChatMessage> = Vec::with_capacity(history.len() + 1);
        if !agent.instructions.is_empty() {
            wire.push(ChatMessage::system(&agent.instructions));
        }
        wire.extend(history.iter().map(ChatMessage::from));

        let functions = schema::all_functions(tools.definitions());
        let cancel = tools.cancellation_token();
        let mut produced = Vec::new();

        for iteration in 1..=agent.max_iterations {
            debug!(agent = %agent.name, iteration, "Requesting completion");

            let message = tokio::select! {
                _ = cancel.cancelled() => return Err(RuntimeError::Cancelled),
                message = self.complete(&agent.model, &wire, &functions) => message?,
            };

            if message.tool_calls.is_empty() {
                let output = message.content.unwrap_or_default();
                produced.push(Message::assistant(&output));
                return Ok(RunOutcome::Completed { output, produced });
            }

            let requests: Vec<ToolCallRequest> = message
                .tool_calls
                .iter()
                .map(|c| ToolCallRequest {
                    id: c.id.clone(),
                    name: c.function.name.clone(),
                    arguments: c.parse_arguments().unwrap_or_default(),
                })
                .collect();
            info!(
                agent = %agent.name,
                calls = requests.len(),
                "Model requested tool calls"
            );
            produced.push(Message::assistant_tool_calls(
                message.content.clone().unwrap_or_default(),
                requests,
            ));

            let outcomes = futures::future::join_all(
                message
                    .tool_calls
                    .iter()
                    .map(|requested| dispatch(requested, tools, context)),
            )
            .await;

            let calls = message.tool_calls.clone();
            wire.push(message);

            for (requested, outcome) in calls.iter().zip(outcomes) {
                match outcome {
                    GateOutcome::Denied(signal) => {
                        info!(tool = %signal.tool_name, "Run stopped by denied tool call");
                        return Ok(RunOutcome::Denied(signal));
                    }
                    GateOutcome::Executed(result) => {
                        let content = result.to_model_content();
                        wire.push(ChatMessage::tool_result(&requested.id, &content));
                        produced.push(Message::tool(&requested.id, content));
                    }
                }
            }
        }

        Err(RuntimeError::MaxIterationsExceeded(agent.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use toolgate_application::{
        AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationInterceptor,
        ConfirmationPort, GatedToolset, ToolDescriptor, ToolInvoker, TurnGuard,
    };
    use toolgate_domain::{
        AgentDefinition, ConfirmationPolicy, DenialSignal, ToolDefinition, ToolParameter,
    };
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct CountingInvoker(AtomicUsize);

    #[async_trait]
    impl ToolInvoker for CountingInvoker {
        async fn invoke(&self, call: &ToolCall, _context: &ExecutionContext) -> ToolResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            ToolResult::success(&call.tool_name, "{\"id\":\"in_1\"}")
        }
    }

    fn toolset(
        confirmation: Arc<dyn ConfirmationPort>,
        invoker: Arc<CountingInvoker>,
    ) -> GatedToolset {
        let descriptors = ["Stripe_CreateInvoice", "Stripe_RetrieveBalance"].map(|name| {
            ToolDescriptor::new(
                ToolDefinition::new(name, "Stripe operation")
                    .with_parameter(ToolParameter::new("customer", "Customer ID", false)),
                invoker.clone(),
            )
        });
        let interceptor = ConfirmationInterceptor::new(
            ConfirmationPolicy::empty().with_tool("Stripe_CreateInvoice"),
            confirmation,
        );
        GatedToolset::new(descriptors, Arc::new(interceptor))
    }

    fn context() -> ExecutionContext {
        ExecutionContext::new("user@example.com", "s1").unwrap()
    }

    fn agent() -> AgentDefinition {
        AgentDefinition::new("gpt-4o").with_instructions("Be brief.")
    }

    fn tool_call_response(name: &str, arguments: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": name, "arguments": arguments }
                    }]
                }
            }]
        }))
    }

    fn answer_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": text }
            }]
        }))
    }

    #[tokio::test]
    async fn test_plain_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "model": "gpt-4o" })))
            .and(body_string_contains("Be brief."))
            .respond_with(answer_response("Hello!"))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoApproveConfirmation), invoker);
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("hi")];
        let ctx = context();
        let agent = agent();

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let outcome = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Completed {
                output: "Hello!".to_string(),
                produced: vec![Message::assistant("Hello!")],
            }
        );
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_response("Stripe_RetrieveBalance", "{}"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("\"role\":\"tool\""))
            .respond_with(answer_response("Your balance is zero."))
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoApproveConfirmation), invoker.clone());
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("balance?")];
        let ctx = context();
        let agent = agent();

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let outcome = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap();

        let RunOutcome::Completed { output, produced } = outcome else {
            panic!("expected completion");
        };
        assert_eq!(output, "Your balance is zero.");
        assert_eq!(produced.len(), 3);
        assert_eq!(produced[0].tool_calls[0].name, "Stripe_RetrieveBalance");
        assert_eq!(produced[1].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(invoker.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_call_stops_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_response(
                "Stripe_CreateInvoice",
                "{\"customer\":\"cus_1\"}",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoRejectConfirmation), invoker.clone());
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("invoice cus_1")];
        let ctx = context();
        let agent = agent();

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let outcome = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Denied(DenialSignal::new("Stripe_CreateInvoice"))
        );
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_reported_to_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_response("Stripe_RetrieveBalance", "{broken"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("INVALID_ARGUMENT"))
            .respond_with(answer_response("Sorry."))
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoApproveConfirmation), invoker.clone());
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("balance?")];
        let ctx = context();
        let agent = agent();

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let outcome = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_response("Stripe_RetrieveBalance", "{}"))
            .expect(2)
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoApproveConfirmation), invoker);
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("loop")];
        let ctx = context();
        let agent = agent().with_max_iterations(2);

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let err = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::MaxIterationsExceeded(2)));
    }

    #[tokio::test]
    async fn test_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let tools = toolset(Arc::new(AutoApproveConfirmation), invoker);
        let guard = TurnGuard::new();
        let turn_tools = tools.for_turn(&guard);
        let history = vec![Message::user("hi")];
        let ctx = context();
        let agent = agent();

        let runtime = OpenAiAgentRuntime::new("sk-test").with_base_url(server.uri());
        let err = runtime
            .run(RunRequest {
                agent: &agent,
                history: &history,
                context: &ctx,
                tools: &turn_tools,
            })
            .await
            .unwrap_err();

        match err {
            RuntimeError::ProviderError(msg) => assert!(msg.contains("429")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
