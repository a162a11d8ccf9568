//! Confirm Tool use case
//!
//! The human-in-the-loop gate. Every tool handed to the agent runtime is
//! wrapped in a [`GatedTool`], which routes each call through the session's
//! [`ConfirmationInterceptor`]:
//!
//! ```text
//! call ─▶ turn already denied? ──yes──▶ Denied(first signal)
//!              │ no
//!              ▼
//!          gated? ──no──▶ invoke ─▶ Executed(result)
//!              │ yes
//!              ▼
//!     wait for decision (serialized per turn, bounded by timeout)
//!        Approve ─▶ invoke ─▶ Executed(result)
//!        Deny    ─▶ record denial, cancel turn ─▶ Denied(signal)
//! ```
//!
//! Denial state lives in a per-turn [`TurnGuard`], never in the shared
//! toolset, so concurrent sessions do not contend on anything here.

use crate::ports::confirmation::{ConfirmationError, ConfirmationPort, ConfirmationRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::tool_invoker::ToolDescriptor;
use crate::ports::turn_progress::{NoTurnProgress, TurnProgressNotifier};
use crate::config::DEFAULT_DECISION_TIMEOUT;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use toolgate_domain::{
    ConfirmationMode, ConfirmationPolicy, ConfirmationState, DenialSignal, ExecutionContext,
    GateOutcome, HumanDecision, ToolCall, ToolDefinition, ToolError, ToolResult,
};
use tracing::{debug, info, warn};

/// Denial bookkeeping for one turn.
///
/// The first recorded denial wins; later ones are ignored. Recording a
/// denial cancels [`TurnGuard::cancellation_token`] so the runtime can stop
/// in-flight work.
pub struct TurnGuard {
    denial: OnceLock<DenialSignal>,
    cancel: CancellationToken,
    /// Serializes decisions and gated executions within the turn
    decision_lock: Mutex<()>,
    /// Approved gated calls that ran, in execution order
    executed_gated: std::sync::Mutex<Vec<String>>,
}

impl TurnGuard {
    pub fn new() -> Self {
        Self {
            denial: OnceLock::new(),
            cancel: CancellationToken::new(),
            decision_lock: Mutex::new(()),
            executed_gated: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The denial that aborted this turn, if any
    pub fn denial(&self) -> Option<&DenialSignal> {
        self.denial.get()
    }

    pub fn is_aborted(&self) -> bool {
        self.denial.get().is_some()
    }

    /// Record a denial and return the one that actually aborted the turn.
    pub fn record_denial(&self, signal: DenialSignal) -> DenialSignal {
        let first = self.denial.get_or_init(|| signal).clone();
        self.cancel.cancel();
        first
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn record_gated_execution(&self, tool_name: &str) {
        self.executed_gated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tool_name.to_string());
    }

    /// Gated tools that were approved and executed during this turn
    pub fn executed_gated_calls(&self) -> Vec<String> {
        self.executed_gated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for TurnGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-wide confirmation gate.
///
/// Holds the policy, the decision source and the hooks. Stateless across
/// calls; all per-turn state is passed in through [`TurnGuard`].
pub struct ConfirmationInterceptor {
    policy: ConfirmationPolicy,
    mode: ConfirmationMode,
    confirmation: Arc<dyn ConfirmationPort>,
    decision_timeout: Duration,
    progress: Arc<dyn TurnProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
}

impl ConfirmationInterceptor {
    pub fn new(policy: ConfirmationPolicy, confirmation: Arc<dyn ConfirmationPort>) -> Self {
        Self {
            policy,
            mode: ConfirmationMode::Interactive,
            confirmation,
            decision_timeout: DEFAULT_DECISION_TIMEOUT,
            progress: Arc::new(NoTurnProgress),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_mode(mut self, mode: ConfirmationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_decision_timeout(mut self, timeout: Duration) -> Self {
        self.decision_timeout = timeout;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn TurnProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn policy(&self) -> &ConfirmationPolicy {
        &self.policy
    }

    pub fn mode(&self) -> ConfirmationMode {
        self.mode
    }

    /// Run `call` against `tool`, asking for a decision first when the
    /// policy gates the tool.
    ///
    /// Tool failures come back as `Executed` with a failed result, exactly
    /// as the wrapped tool reported them.
    pub async fn intercept(
        &self,
        tool: &ToolDescriptor,
        call: &ToolCall,
        context: &ExecutionContext,
        guard: &TurnGuard,
    ) -> GateOutcome {
        if let Some(denial) = guard.denial() {
            debug!(tool = %call.tool_name, "Turn already aborted, skipping call");
            return GateOutcome::Denied(denial.clone());
        }

        let gated = self.policy.requires_confirmation(&call.tool_name);
        let state = ConfirmationState::initial(gated);

        if !gated {
            return GateOutcome::Executed(self.execute(tool, call, context, state).await);
        }

        // Held until the approved call has run, so no gated call can start
        // once another call in this turn has been denied.
        let _decision = guard.decision_lock.lock().await;
        if let Some(denial) = guard.denial() {
            debug!(tool = %call.tool_name, "Turn aborted while waiting for decision");
            return GateOutcome::Denied(denial.clone());
        }

        self.progress.on_confirmation_required(&call.tool_name);
        let decision = self.decide(tool, call, context).await;
        self.progress.on_confirmation_decided(&call.tool_name, decision);
        self.logger
            .log(ConversationEvent::confirmation_decision(&call.tool_name, decision));

        let state = state.decide(decision);
        debug!(tool = %call.tool_name, state = %state, "Decision recorded");

        match decision {
            HumanDecision::Approve => {
                let result = self.execute(tool, call, context, state).await;
                guard.record_gated_execution(&call.tool_name);
                GateOutcome::Executed(result)
            }
            HumanDecision::Deny => {
                let signal = guard.record_denial(DenialSignal::new(&call.tool_name));
                info!(
                    tool = %call.tool_name,
                    state = %state.finish(),
                    "Gated call denied, aborting turn"
                );
                self.logger.log(ConversationEvent::tool_denied(&call.tool_name));
                GateOutcome::Denied(signal)
            }
        }
    }

    /// Obtain a decision for a gated call.
    ///
    /// Anything short of an explicit approval is a denial: timeouts,
    /// cancelled prompts and I/O failures all deny.
    async fn decide(
        &self,
        tool: &ToolDescriptor,
        call: &ToolCall,
        context: &ExecutionContext,
    ) -> HumanDecision {
        match self.mode {
            ConfirmationMode::AutoReject => {
                info!(tool = %call.tool_name, "Auto-rejecting gated call");
                HumanDecision::Deny
            }
            ConfirmationMode::AutoApprove => {
                warn!(tool = %call.tool_name, "Auto-approving gated call - use with caution!");
                HumanDecision::Approve
            }
            ConfirmationMode::Interactive => {
                let request =
                    ConfirmationRequest::new(call, &tool.definition.description, context);
                match tokio::time::timeout(
                    self.decision_timeout,
                    self.confirmation.request_confirmation(&request),
                )
                .await
                {
                    Ok(Ok(decision)) => decision,
                    Ok(Err(ConfirmationError::Cancelled)) => {
                        info!(tool = %call.tool_name, "Confirmation cancelled, denying");
                        HumanDecision::Deny
                    }
                    Ok(Err(e)) => {
                        warn!(tool = %call.tool_name, error = %e, "Confirmation failed, denying");
                        HumanDecision::Deny
                    }
                    Err(_) => {
                        warn!(
                            tool = %call.tool_name,
                            timeout_secs = self.decision_timeout.as_secs(),
                            "No decision before timeout, denying"
                        );
                        HumanDecision::Deny
                    }
                }
            }
        }
    }

    async fn execute(
        &self,
        tool: &ToolDescriptor,
        call: &ToolCall,
        context: &ExecutionContext,
        state: ConfirmationState,
    ) -> ToolResult {
        self.progress.on_tool_start(&call.tool_name);
        let result = tool.invoker.invoke(call, context).await;
        self.progress.on_tool_end(&call.tool_name, &result);
        self.logger.log(ConversationEvent::tool_call(
            &call.tool_name,
            result.is_success(),
            result.duration_ms,
        ));
        debug!(
            tool = %call.tool_name,
            state = %state.finish(),
            success = result.is_success(),
            "Tool call finished"
        );
        result
    }
}

/// A tool descriptor composed with the confirmation gate.
///
/// The descriptor itself is never modified; the same descriptor can back
/// gated tools in any number of sessions.
#[derive(Clone)]
pub struct GatedTool {
    inner: ToolDescriptor,
    interceptor: Arc<ConfirmationInterceptor>,
}

impl GatedTool {
    pub fn new(inner: ToolDescriptor, interceptor: Arc<ConfirmationInterceptor>) -> Self {
        Self { inner, interceptor }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.inner.definition
    }

    pub fn requires_confirmation(&self) -> bool {
        self.interceptor.policy().requires_confirmation(self.name())
    }

    pub async fn invoke(
        &self,
        call: &ToolCall,
        context: &ExecutionContext,
        guard: &TurnGuard,
    ) -> GateOutcome {
        self.interceptor
            .intercept(&self.inner, call, context, guard)
            .await
    }
}

/// The session's available tools, all behind the same interceptor.
#[derive(Clone, Default)]
pub struct GatedToolset {
    tools: BTreeMap<String, GatedTool>,
}

impl GatedToolset {
    pub fn new(
        descriptors: impl IntoIterator<Item = ToolDescriptor>,
        interceptor: Arc<ConfirmationInterceptor>,
    ) -> Self {
        let tools = descriptors
            .into_iter()
            .map(|d| {
                (
                    d.name().to_string(),
                    GatedTool::new(d, Arc::clone(&interceptor)),
                )
            })
            .collect();
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&GatedTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|k| k.as_str())
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values().map(|t| t.definition())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Bind the toolset to one turn's guard
    pub fn for_turn<'a>(&'a self, guard: &'a TurnGuard) -> TurnTools<'a> {
        TurnTools {
            toolset: self,
            guard,
        }
    }
}

/// Tools as seen by the agent runtime during one turn.
pub struct TurnTools<'a> {
    toolset: &'a GatedToolset,
    guard: &'a TurnGuard,
}

impl<'a> TurnTools<'a> {
    pub fn definitions(&self) -> impl Iterator<Item = &'a ToolDefinition> {
        self.toolset.definitions()
    }

    pub fn is_empty(&self) -> bool {
        self.toolset.is_empty()
    }

    pub fn is_aborted(&self) -> bool {
        self.guard.is_aborted()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.guard.cancellation_token()
    }

    /// Dispatch one call requested by the model.
    ///
    /// Calls to tools outside the session's toolset never reach any
    /// invoker; the model gets a not-found failure back.
    pub async fn call(&self, call: &ToolCall, context: &ExecutionContext) -> GateOutcome {
        match self.toolset.get(&call.tool_name) {
            Some(tool) => tool.invoke(call, context, self.guard).await,
            None => {
                if let Some(denial) = self.guard.denial() {
                    return GateOutcome::Denied(denial.clone());
                }
                warn!(tool = %call.tool_name, "Model requested a tool that is not available");
                GateOutcome::Executed(ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found(&call.tool_name),
                ))
            }
        }
    }
}
