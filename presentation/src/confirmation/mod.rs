//! Terminal confirmation for gated tool calls.

mod prompt;

pub use prompt::{InteractiveConfirmation, parse_answer};
