//! Domain layer for toolgate
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Gated tools
//!
//! An agent may call side-effecting tools (Stripe operations). Tools named in
//! the [`ConfirmationPolicy`] are **gated**: a human has to approve each
//! individual call before it reaches the remote system.
//!
//! ## Reconciliation
//!
//! A denied call aborts the agent's turn mid-flight. The conversation is
//! repaired with a fixed three-message block (see [`conversation::repair`])
//! so the next turn's history reads like a completed, cancelled exchange.

pub mod confirmation;
pub mod conversation;
pub mod core;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use confirmation::{
    ConfirmationMode, ConfirmationPolicy, ConfirmationState, DEFAULT_GATED_TOOLS, DenialSignal,
    GateOutcome, HumanDecision,
};
pub use conversation::{Message, REPAIR_BLOCK_LEN, Role, ToolCallRequest, TurnHistory, repair_block};
pub use core::{error::DomainError, string::truncate};
pub use session::{AgentDefinition, DEFAULT_INSTRUCTIONS, ExecutionContext};
pub use tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
