//! Presentation layer for toolgate
//!
//! This crate contains the CLI definition, the interactive confirmation
//! prompt, console turn I/O, authorization notices and progress display.

pub mod cli;
pub mod confirmation;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, ConfirmModeArg};
pub use confirmation::{InteractiveConfirmation, parse_answer};
pub use input::LineSource;
pub use output::authorization::ConsoleAuthorizationNotifier;
pub use output::console::ConsoleTurnIo;
pub use progress::reporter::{ConsoleTurnProgress, SimpleTurnProgress};
