//! Infrastructure layer for toolgate
//!
//! Adapters for the application ports: the Arcade tool catalog, invoker and
//! authorizer, the OpenAI agent runtime, the JSONL transcript logger and
//! configuration file loading.

pub mod arcade;
pub mod config;
pub mod logging;
pub mod openai;

// Re-export commonly used types
pub use arcade::{
    authorization::ArcadeAuthorizer,
    catalog::{ArcadeToolCatalog, ArcadeToolInvoker},
    client::ArcadeClient,
    error::{ArcadeError, Result},
};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileArcadeConfig, FileConfig,
    FileConfirmationConfig, FileLoggingConfig, FileOpenAiConfig,
};
pub use logging::JsonlConversationLogger;
pub use openai::{DEFAULT_OPENAI_BASE, OpenAiAgentRuntime};
