//! Session transcript logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](toolgate_application::ConversationLogger) port by
//! appending JSON lines to a file.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
