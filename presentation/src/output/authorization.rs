//! Console notices for the tool authorization flow

use colored::Colorize;
use toolgate_application::ports::authorization::{AuthorizationError, AuthorizationNotifier};

/// Prints consent URLs and authorization failures.
pub struct ConsoleAuthorizationNotifier {
    verbose: bool,
}

impl ConsoleAuthorizationNotifier {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Also report each granted tool
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Default for ConsoleAuthorizationNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationNotifier for ConsoleAuthorizationNotifier {
    fn on_authorization_required(&self, tool_name: &str, url: &str) {
        println!();
        println!(
            "{} {}",
            "🔐 Authorization required for".yellow().bold(),
            tool_name.bold()
        );
        println!("   Open this URL to grant access:");
        println!("   {}", url.underline());
        println!("   {}", "Waiting for completion...".dimmed());
    }

    fn on_authorization_granted(&self, tool_name: &str) {
        if self.verbose {
            println!("  {} {}", "✓".green(), tool_name);
        }
    }

    fn on_authorization_failed(&self, tool_name: &str, error: &AuthorizationError) {
        eprintln!(
            "  {} {} is unavailable this session: {}",
            "✗".red(),
            tool_name.bold(),
            error
        );
    }
}
