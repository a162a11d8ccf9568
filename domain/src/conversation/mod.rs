//! Conversation domain.
//!
//! - [`entities::Message`]: a role-tagged message, optionally carrying tool calls
//! - [`history::TurnHistory`]: the full dialogue replayed to the runtime each turn
//! - [`repair`]: the synthetic 3-message block appended after a denial

pub mod entities;
pub mod history;
pub mod repair;

pub use entities::{Message, Role, ToolCallRequest};
pub use history::TurnHistory;
pub use repair::{REPAIR_BLOCK_LEN, repair_block};
