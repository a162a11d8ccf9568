//! Conversation reconciliation
//!
//! Keeps the turn history continuable. A completed run's messages are
//! appended as produced; a denied run's partial messages are discarded and
//! replaced with the fixed repair block naming the denied tool.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use std::sync::Arc;
use toolgate_domain::{DenialSignal, DomainError, Message, TurnHistory, repair_block};
use tracing::debug;

/// The user-visible part of a repair: the synthetic confirmation question
/// and the closing acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub tool_name: String,
    pub question: String,
    pub acknowledgment: String,
}

pub struct ConversationReconciler {
    logger: Arc<dyn ConversationLogger>,
}

impl ConversationReconciler {
    pub fn new() -> Self {
        Self {
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Append a completed run's messages.
    ///
    /// Refuses (and leaves history untouched) if the messages would leave a
    /// tool call without a result.
    pub fn append_completed(
        &self,
        history: &mut TurnHistory,
        produced: Vec<Message>,
    ) -> Result<usize, DomainError> {
        if history.would_dangle(&produced) {
            let mut combined = history.clone();
            combined.extend(produced);
            return Err(DomainError::DanglingToolCalls(
                combined.dangling_tool_calls(),
            ));
        }
        let count = produced.len();
        history.extend(produced);
        debug!(appended = count, history_len = history.len(), "Turn appended");
        Ok(count)
    }

    /// Append the repair block for `signal`.
    ///
    /// Prior messages are never touched; exactly three are added.
    pub fn repair_denial(&self, history: &mut TurnHistory, signal: &DenialSignal) -> Repair {
        let [question, refusal, acknowledgment] = repair_block(&signal.tool_name);
        let repair = Repair {
            tool_name: signal.tool_name.clone(),
            question: question.content.clone(),
            acknowledgment: acknowledgment.content.clone(),
        };

        history.extend([question, refusal, acknowledgment]);
        self.logger.log(ConversationEvent::reconciled(
            &signal.tool_name,
            history.len(),
        ));
        debug!(tool = %signal.tool_name, history_len = history.len(), "History repaired after denial");
        repair
    }
}

impl Default for ConversationReconciler {
    fn default() -> Self {
        Self::new()
    }
}
