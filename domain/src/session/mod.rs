//! Session domain.
//!
//! - [`context::ExecutionContext`]: who is acting, passed to every tool call
//! - [`agent::AgentDefinition`]: the agent handed to the runtime each turn

pub mod agent;
pub mod context;

pub use agent::{AgentDefinition, DEFAULT_AGENT_NAME, DEFAULT_INSTRUCTIONS};
pub use context::ExecutionContext;
