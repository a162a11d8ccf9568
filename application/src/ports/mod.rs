//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod agent_runtime;
pub mod authorization;
pub mod confirmation;
pub mod console;
pub mod conversation_logger;
pub mod tool_catalog;
pub mod tool_invoker;
pub mod turn_progress;
