//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use toolgate_domain::ConfirmationMode;

/// Where decisions for gated tool calls come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfirmModeArg {
    /// Ask at the terminal for every gated call
    Interactive,
    /// Deny every gated call
    AutoReject,
    /// Approve every gated call (sandbox accounts only)
    AutoApprove,
}

impl From<ConfirmModeArg> for ConfirmationMode {
    fn from(arg: ConfirmModeArg) -> Self {
        match arg {
            ConfirmModeArg::Interactive => ConfirmationMode::Interactive,
            ConfirmModeArg::AutoReject => ConfirmationMode::AutoReject,
            ConfirmModeArg::AutoApprove => ConfirmationMode::AutoApprove,
        }
    }
}

/// CLI arguments for toolgate
#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(author, version, about = "Stripe agent with human confirmation for money-moving tools")]
#[command(long_about = r#"
toolgate runs a Stripe management agent with Arcade tools. Tools that move
money (invoices, payment links) wait for your explicit approval before
they run. Denying a call cancels the whole turn.

Type a request at the prompt; type `exit` (or press Ctrl+D) to quit.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./toolgate.toml     Project-level config
3. ~/.config/toolgate/config.toml   Global config

ARCADE_API_KEY, ARCADE_USER_ID and OPENAI_API_KEY override the files.

Example:
  toolgate --user me@example.com
  toolgate --confirm Stripe_CreateRefund
  toolgate --confirm-mode auto-reject
"#)]
pub struct Cli {
    /// Arcade user the tools act for (overrides arcade.user_id)
    #[arg(short, long, value_name = "USER_ID")]
    pub user: Option<String>,

    /// Additionally require confirmation for TOOL (can be specified multiple times)
    #[arg(long = "confirm", value_name = "TOOL")]
    pub confirm: Vec<String>,

    /// How gated calls are decided (overrides confirmation.mode)
    #[arg(long, value_enum, value_name = "MODE")]
    pub confirm_mode: Option<ConfirmModeArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
