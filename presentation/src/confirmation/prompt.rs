//! Interactive confirmation of gated tool calls.
//!
//! When a gated call is pending, the operator sees:
//!
//! ```text
//! ───────────────────────────────────────────────────────────────
//!   ⚠️  Confirmation required: Stripe_CreateInvoice
//! ───────────────────────────────────────────────────────────────
//! Create an invoice for a customer
//!
//! Arguments:
//!   {
//!     "customer": "cus_123",
//!     "days_until_due": 30
//!   }
//!
//! Run this call? [y/N]
//! ```
//!
//! | Input | Decision |
//! |-------|----------|
//! | `y`, `yes` | Approve |
//! | `n`, `no`, empty | Deny |
//! | end of input | Cancelled (treated as a denial by the gate) |

use crate::input::LineSource;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use toolgate_application::ports::confirmation::{
    ConfirmationError, ConfirmationPort, ConfirmationRequest,
};
use toolgate_domain::HumanDecision;

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Map an answer to a decision. `None` means "ask again".
pub fn parse_answer(input: &str) -> Option<HumanDecision> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(HumanDecision::Approve),
        "" | "n" | "no" => Some(HumanDecision::Deny),
        _ => None,
    }
}

pub struct InteractiveConfirmation {
    lines: Arc<LineSource>,
}

impl InteractiveConfirmation {
    pub fn new(lines: Arc<LineSource>) -> Self {
        Self { lines }
    }

    fn render(request: &ConfirmationRequest) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("{}\n", RULE.yellow()));
        out.push_str(&format!(
            "  {} {}\n",
            "⚠️  Confirmation required:".yellow().bold(),
            request.tool_name.bold()
        ));
        out.push_str(&format!("{}\n", RULE.yellow()));
        if !request.description.is_empty() {
            out.push_str(&format!("{}\n", request.description.dimmed()));
        }
        out.push('\n');

        out.push_str(&format!("{}\n", "Arguments:".cyan().bold()));
        let arguments = serde_json::to_string_pretty(&request.arguments)
            .unwrap_or_else(|_| request.arguments.to_string());
        for line in arguments.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out
    }

    fn prompt() -> Result<(), ConfirmationError> {
        print!("\n{} ", "Run this call? [y/N]".magenta().bold());
        io::stdout()
            .flush()
            .map_err(|e| ConfirmationError::IoError(format!("Failed to flush stdout: {}", e)))
    }
}

#[async_trait]
impl ConfirmationPort for InteractiveConfirmation {
    async fn request_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<HumanDecision, ConfirmationError> {
        print!("{}", Self::render(request));

        loop {
            Self::prompt()?;
            let Some(input) = self.lines.next_line().await else {
                println!();
                return Err(ConfirmationError::Cancelled);
            };

            match parse_answer(&input) {
                Some(HumanDecision::Approve) => {
                    println!("{}", "✓ Approved".green());
                    return Ok(HumanDecision::Approve);
                }
                Some(HumanDecision::Deny) => {
                    println!("{}", "✗ Denied".red());
                    return Ok(HumanDecision::Deny);
                }
                None => {
                    println!("Please answer {} or {}.", "y".green(), "n".red());
                }
            }
        }
    }
}
