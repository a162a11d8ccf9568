//! Start Session use case
//!
//! Session setup: list the configured toolkits and named tools, authorize every tool for
//! the acting user, and wrap the survivors behind the confirmation gate.

use super::authorize_tools::{AuthorizationReport, AuthorizeToolsUseCase};
use super::confirm_tool::{ConfirmationInterceptor, GatedToolset};
use crate::config::SessionConfig;
use crate::ports::confirmation::ConfirmationPort;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::tool_catalog::{CatalogError, ToolCatalogPort};
use crate::ports::turn_progress::{NoTurnProgress, TurnProgressNotifier};
use std::sync::Arc;
use thiserror::Error;
use toolgate_domain::ExecutionContext;
use tracing::info;

#[derive(Error, Debug)]
pub enum StartSessionError {
    #[error("Failed to list tools: {0}")]
    Catalog(#[from] CatalogError),
}

/// A ready session: the gated toolset plus how authorization went
pub struct StartedSession {
    pub toolset: GatedToolset,
    pub authorization: AuthorizationReport,
}

pub struct StartSessionUseCase {
    catalog: Arc<dyn ToolCatalogPort>,
    authorizer: AuthorizeToolsUseCase,
    confirmation: Arc<dyn ConfirmationPort>,
    progress: Arc<dyn TurnProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
}

impl StartSessionUseCase {
    pub fn new(
        catalog: Arc<dyn ToolCatalogPort>,
        authorizer: AuthorizeToolsUseCase,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            catalog,
            authorizer,
            confirmation,
            progress: Arc::new(NoTurnProgress),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn TurnProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(
        &self,
        config: &SessionConfig,
        context: &ExecutionContext,
    ) -> Result<StartedSession, StartSessionError> {
        let descriptors = self.catalog.list_tools(&config.tool_selection()).await?;
        info!(
            count = descriptors.len(),
            toolkits = ?config.toolkits,
            tools = ?config.tools,
            "Listed tools"
        );

        let names: Vec<String> = descriptors.iter().map(|d| d.name().to_string()).collect();
        let authorization = self
            .authorizer
            .authorize_all(&names, context.user_id())
            .await;

        let interceptor = Arc::new(
            ConfirmationInterceptor::new(config.policy.clone(), Arc::clone(&self.confirmation))
                .with_mode(config.confirmation_mode)
                .with_decision_timeout(config.decision_timeout)
                .with_progress(Arc::clone(&self.progress))
                .with_logger(Arc::clone(&self.logger)),
        );

        let available = descriptors
            .into_iter()
            .filter(|d| authorization.is_authorized(d.name()));
        let toolset = GatedToolset::new(available, interceptor);

        info!(
            available = toolset.len(),
            gated = toolset
                .names()
                .filter(|n| config.policy.requires_confirmation(n))
                .count(),
            mode = %config.confirmation_mode,
            "Session tools ready"
        );

        Ok(StartedSession {
            toolset,
            authorization,
        })
    }
}
