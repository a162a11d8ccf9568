//! OpenAI adapter
//!
//! Drives the agent with the Chat Completions API and function tools.

pub mod protocol;
pub mod runtime;
pub mod schema;

pub use runtime::{DEFAULT_OPENAI_BASE, OpenAiAgentRuntime};
