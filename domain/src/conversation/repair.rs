//! Denial repair block.
//!
//! When a gated tool call is denied the agent run is abandoned partway, so
//! whatever the model had produced for that turn is thrown away. In its
//! place the history receives three synthetic messages that read, from the
//! model's point of view, like a normal exchange ending in a cancelled
//! action:
//!
//! ```text
//! assistant: Please confirm the call to Stripe_CreateInvoice
//! user:      I changed my mind, please don't do it!
//! assistant: Sure, I cancelled the call to Stripe_CreateInvoice. What else can I do for you today?
//! ```

use super::entities::Message;

/// Number of messages in a repair block
pub const REPAIR_BLOCK_LEN: usize = 3;

/// The user's refusal line
pub const REFUSAL: &str = "I changed my mind, please don't do it!";

pub fn confirmation_request(tool_name: &str) -> String {
    format!("Please confirm the call to {}", tool_name)
}

pub fn cancellation_ack(tool_name: &str) -> String {
    format!(
        "Sure, I cancelled the call to {}. What else can I do for you today?",
        tool_name
    )
}

/// Build the repair block for a denied call to `tool_name`.
pub fn repair_block(tool_name: &str) -> [Message; REPAIR_BLOCK_LEN] {
    [
        Message::assistant(confirmation_request(tool_name)),
        Message::user(REFUSAL),
        Message::assistant(cancellation_ack(tool_name)),
    ]
}
