//! Tool domain module
//!
//! Tools are the agent's side-effecting capabilities (here, Stripe operations
//! served by a remote tool-calling provider). Every tool is described by a
//! [`ToolDefinition`], invoked via a [`ToolCall`] and answers with a
//! [`ToolResult`].
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schema)       │    │ (invocation) │    │ (output)     │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Whether a call needs a human decision first is not a property of the
//! tool itself; see [`crate::confirmation::ConfirmationPolicy`].

pub mod entities;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter};
pub use value_objects::{ToolError, ToolResult};
