//! Console turn I/O
//!
//! Terminal side of the turn driver: the input prompt, the agent's replies,
//! and the transcript of a cancelled call.

use crate::input::LineSource;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use toolgate_application::ports::console::ConsolePort;
use toolgate_domain::ConfirmationPolicy;

pub struct ConsoleTurnIo {
    lines: Arc<LineSource>,
}

impl ConsoleTurnIo {
    pub fn new(lines: Arc<LineSource>) -> Self {
        Self { lines }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!(
            "{}\n{}\n{}",
            line.cyan(),
            format!("  {}", title).cyan().bold(),
            line.cyan()
        )
    }

    /// Banner listing the session's tools; gated ones are marked.
    pub fn welcome(agent_name: &str, tools: &[&str], policy: &ConfirmationPolicy) -> String {
        let mut out = String::new();
        out.push_str(&Self::header(agent_name));
        out.push('\n');

        if tools.is_empty() {
            out.push_str(&format!("{}\n", "No tools available this session.".yellow()));
        } else {
            out.push_str(&format!("{}\n", "Tools:".cyan().bold()));
            for tool in tools {
                if policy.requires_confirmation(tool) {
                    out.push_str(&format!("  {} {}\n", tool, "(requires confirmation)".yellow()));
                } else {
                    out.push_str(&format!("  {}\n", tool));
                }
            }
        }

        out.push_str(&format!("\nType {} to quit.\n", "exit".bold()));
        out
    }

    pub fn print_welcome(agent_name: &str, tools: &[&str], policy: &ConfirmationPolicy) {
        println!("{}", Self::welcome(agent_name, tools, policy));
    }
}

#[async_trait]
impl ConsolePort for ConsoleTurnIo {
    async fn read_line(&self) -> Option<String> {
        print!("{} ", ">>>".green().bold());
        let _ = io::stdout().flush();

        let line = self.lines.next_line().await;
        if line.is_none() {
            println!();
        }
        line
    }

    fn show_reply(&self, text: &str) {
        println!();
        println!("{}", text);
        println!();
    }

    fn show_cancellation(&self, question: &str, acknowledgment: &str) {
        println!();
        println!("{}", question.yellow());
        println!("{}", acknowledgment);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    fn show_farewell(&self) {
        println!("{}", "Goodbye!".cyan());
    }
}
