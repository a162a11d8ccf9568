//! Application layer for toolgate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_DECISION_TIMEOUT, SessionConfig};
pub use ports::{
    agent_runtime::{AgentRuntimePort, RunOutcome, RunRequest, RuntimeError},
    authorization::{
        AuthorizationError, AuthorizationNotifier, AuthorizationPort, AuthorizationResponse,
        AuthorizationStatus, NoAuthorizationNotifier,
    },
    confirmation::{
        AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationError, ConfirmationPort,
        ConfirmationRequest,
    },
    console::ConsolePort,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    tool_catalog::{CatalogError, ToolCatalogPort, ToolSelection},
    tool_invoker::{ToolDescriptor, ToolInvoker},
    turn_progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::authorize_tools::{AuthorizationReport, AuthorizeToolsUseCase};
pub use use_cases::confirm_tool::{
    ConfirmationInterceptor, GatedTool, GatedToolset, TurnGuard, TurnTools,
};
pub use use_cases::reconcile::{ConversationReconciler, Repair};
pub use use_cases::run_turn::{RunTurnUseCase, TurnError, TurnOutcome};
pub use use_cases::start_session::{StartSessionError, StartSessionUseCase, StartedSession};
pub use use_cases::turn_driver::{TurnDriver, is_exit_command};
