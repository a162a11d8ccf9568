//! Turn history - the full dialogue handed to the agent runtime every turn

use super::entities::{Message, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, role-tagged dialogue for one session.
///
/// The history is the only continuity mechanism between turns: it is
/// passed in full to the agent runtime on every turn. It never holds an
/// assistant tool call without a matching `tool` message; see
/// [`TurnHistory::dangling_tool_calls`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnHistory {
    messages: Vec<Message>,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The last `n` messages (fewer if the history is shorter)
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// Drop everything after the first `len` messages.
    ///
    /// Used to restore the pre-turn state when a turn fails.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// IDs of assistant tool calls that have no answering `tool` message.
    pub fn dangling_tool_calls(&self) -> Vec<String> {
        dangling_tool_calls(&self.messages)
    }

    /// Whether appending `messages` would leave a tool call unanswered.
    pub fn would_dangle(&self, messages: &[Message]) -> bool {
        let mut combined: Vec<Message> = self.messages.clone();
        combined.extend_from_slice(messages);
        !dangling_tool_calls(&combined).is_empty()
    }

    /// Number of messages with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

fn dangling_tool_calls(messages: &[Message]) -> Vec<String> {
    let answered: HashSet<&str> = messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .filter_map(|m| m.tool_call_id.as_deref())
        .collect();

    messages
        .iter()
        .flat_map(|m| m.tool_calls.iter())
        .filter(|call| !answered.contains(call.id.as_str()))
        .map(|call| call.id.clone())
        .collect()
}
