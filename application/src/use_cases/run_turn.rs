//! Run Turn use case
//!
//! One turn: append the user's input, run the agent over the full history
//! with the session's gated tools, then either append what the run produced
//! or, if a gated call was denied, append the repair block instead.
//!
//! A turn that fails for any other reason leaves the history exactly as it
//! was before the turn started. Approved gated calls that already ran are
//! not undone; they are named in the warning and the `turn_error` event.

use super::confirm_tool::{GatedToolset, TurnGuard};
use super::reconcile::{ConversationReconciler, Repair};
use crate::ports::agent_runtime::{AgentRuntimePort, RunOutcome, RunRequest, RuntimeError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::turn_progress::{NoTurnProgress, TurnProgressNotifier};
use std::sync::Arc;
use thiserror::Error;
use toolgate_domain::{AgentDefinition, DenialSignal, DomainError, ExecutionContext, TurnHistory};
use tracing::{info, warn};

/// Errors that end a turn without changing the history
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Agent run failed: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Agent produced an inconsistent history: {0}")]
    InconsistentHistory(#[from] DomainError),
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The agent answered
    Reply { output: String },
    /// A gated call was denied and the history repaired
    Cancelled(Repair),
}

pub struct RunTurnUseCase {
    runtime: Arc<dyn AgentRuntimePort>,
    agent: AgentDefinition,
    toolset: GatedToolset,
    reconciler: ConversationReconciler,
    progress: Arc<dyn TurnProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunTurnUseCase {
    pub fn new(
        runtime: Arc<dyn AgentRuntimePort>,
        agent: AgentDefinition,
        toolset: GatedToolset,
    ) -> Self {
        Self {
            runtime,
            agent,
            toolset,
            reconciler: ConversationReconciler::new(),
            progress: Arc::new(NoTurnProgress),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn TurnProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.reconciler = ConversationReconciler::new().with_logger(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    pub fn agent(&self) -> &AgentDefinition {
        &self.agent
    }

    pub fn toolset(&self) -> &GatedToolset {
        &self.toolset
    }

    pub async fn execute(
        &self,
        history: &mut TurnHistory,
        input: &str,
        context: &ExecutionContext,
    ) -> Result<TurnOutcome, TurnError> {
        let pre_turn_len = history.len();
        history.push_user(input);
        self.logger.log(ConversationEvent::user_input(input));

        let guard = TurnGuard::new();
        let tools = self.toolset.for_turn(&guard);

        self.progress.on_agent_start(&self.agent.name);
        let result = self
            .runtime
            .run(RunRequest {
                agent: &self.agent,
                history: history.messages(),
                context,
                tools: &tools,
            })
            .await;
        self.progress.on_agent_end(&self.agent.name);

        // The gate's record of the first denial wins over whatever the
        // runtime reported.
        if let Some(denial) = guard.denial() {
            if let Err(e) = &result {
                warn!(error = %e, "Runtime error after denial, reconciling the denial");
            }
            return Ok(self.cancel(history, denial));
        }

        match result {
            Ok(RunOutcome::Completed { output, produced }) => {
                let produced_len = produced.len();
                if let Err(e) = self.reconciler.append_completed(history, produced) {
                    history.truncate(pre_turn_len);
                    self.log_failure(&e.to_string(), &guard);
                    return Err(e.into());
                }
                self.logger
                    .log(ConversationEvent::assistant_output(&output, produced_len));
                info!(produced = produced_len, history_len = history.len(), "Turn completed");
                Ok(TurnOutcome::Reply { output })
            }
            Ok(RunOutcome::Denied(signal)) => Ok(self.cancel(history, &signal)),
            Err(e) => {
                history.truncate(pre_turn_len);
                self.log_failure(&e.to_string(), &guard);
                Err(e.into())
            }
        }
    }

    fn log_failure(&self, error: &str, guard: &TurnGuard) {
        let executed = guard.executed_gated_calls();
        if executed.is_empty() {
            warn!(error, "Turn failed, history restored");
        } else {
            warn!(
                error,
                executed_gated = ?executed,
                "Turn failed after approved gated calls ran; they are not in the restored history"
            );
        }
        self.logger.log(ConversationEvent::turn_error(error, &executed));
    }

    fn cancel(&self, history: &mut TurnHistory, denial: &DenialSignal) -> TurnOutcome {
        info!(tool = %denial.tool_name, "Turn cancelled by denial");
        TurnOutcome::Cancelled(self.reconciler.repair_denial(history, denial))
    }
}
