//! Progress reporting while a turn runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolgate_application::TurnProgressNotifier;
use toolgate_domain::{HumanDecision, ToolResult, truncate};

/// Spinner while the agent works; with `verbose`, one line per tool event.
///
/// The spinner is cleared before a confirmation prompt so the prompt is
/// never drawn over.
pub struct ConsoleTurnProgress {
    spinner: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ConsoleTurnProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: false,
        }
    }

    pub fn verbose() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: true,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, prefix: &str, message: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Ok(slot) = self.spinner.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Print a line without tearing the spinner
    fn line(&self, text: String) {
        if let Ok(slot) = self.spinner.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.println(text);
        } else {
            println!("{}", text);
        }
    }

    pub fn tool_line(tool_name: &str, result: &ToolResult) -> String {
        let duration = result
            .duration_ms
            .map(|ms| format!(" ({} ms)", ms))
            .unwrap_or_default();
        if result.is_success() {
            format!("  {} {}{}", "✓".green(), tool_name, duration.as_str().dimmed())
        } else {
            let reason = result
                .error()
                .map(|e| truncate(&e.message, 80))
                .unwrap_or_else(|| "failed".to_string());
            format!("  {} {}: {}{}", "✗".red(), tool_name, reason, duration.as_str().dimmed())
        }
    }
}

impl Default for ConsoleTurnProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ConsoleTurnProgress {
    fn on_agent_start(&self, agent_name: &str) {
        self.start_spinner(agent_name, "thinking...");
    }

    fn on_agent_end(&self, _agent_name: &str) {
        self.clear_spinner();
    }

    fn on_tool_start(&self, tool_name: &str) {
        self.set_message(format!("running {}...", tool_name));
        if self.verbose {
            self.line(format!("  {} {}", "→".cyan(), tool_name));
        }
    }

    fn on_tool_end(&self, tool_name: &str, result: &ToolResult) {
        self.set_message("thinking...".to_string());
        if self.verbose {
            self.line(Self::tool_line(tool_name, result));
        }
    }

    fn on_confirmation_required(&self, _tool_name: &str) {
        self.clear_spinner();
    }

    fn on_confirmation_decided(&self, tool_name: &str, decision: HumanDecision) {
        if self.verbose {
            let verdict = if decision.is_approved() {
                "approved".green()
            } else {
                "denied".red()
            };
            println!("  {} {} {}", "⚖".yellow(), tool_name, verdict);
        }
        if decision.is_approved() {
            self.start_spinner("", &format!("running {}...", tool_name));
        }
    }
}

/// Plain-text progress for quiet runs
pub struct SimpleTurnProgress;

impl TurnProgressNotifier for SimpleTurnProgress {
    fn on_tool_end(&self, tool_name: &str, result: &ToolResult) {
        if !result.is_success() {
            println!("{}", ConsoleTurnProgress::tool_line(tool_name, result));
        }
    }
}
