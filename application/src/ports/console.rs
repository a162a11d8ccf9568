//! Console port
//!
//! Line-oriented I/O for the turn driver. The terminal adapter lives in
//! the presentation layer; tests use scripted implementations.

use async_trait::async_trait;

/// Line-oriented operator console.
#[async_trait]
pub trait ConsolePort: Send + Sync {
    /// Read the next input line. `None` means end of input.
    async fn read_line(&self) -> Option<String>;

    /// Show the agent's final answer for a turn
    fn show_reply(&self, text: &str);

    /// Show the synthetic exchange recorded after a denied call
    fn show_cancellation(&self, question: &str, acknowledgment: &str);

    /// Show a turn failure. The session keeps going.
    fn show_error(&self, message: &str);

    fn show_farewell(&self);
}
