//! Authorize Tools use case
//!
//! Makes sure the acting user is authorized for each tool before the tool
//! is exposed to the agent. Authorization gates availability for the whole
//! session; failures are reported to the operator and the tool is dropped.

use crate::ports::authorization::{
    AuthorizationError, AuthorizationNotifier, AuthorizationPort, AuthorizationStatus,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of authorizing a batch of tools
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationReport {
    pub authorized: Vec<String>,
    pub failed: Vec<(String, AuthorizationError)>,
}

impl AuthorizationReport {
    pub fn is_authorized(&self, tool_name: &str) -> bool {
        self.authorized.iter().any(|t| t == tool_name)
    }

    pub fn all_authorized(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Use case for per-(user, tool) authorization.
///
/// Nothing is cached locally: every call goes to the provider, which owns
/// the authorization record.
pub struct AuthorizeToolsUseCase {
    provider: Arc<dyn AuthorizationPort>,
    notifier: Arc<dyn AuthorizationNotifier>,
}

impl AuthorizeToolsUseCase {
    pub fn new(
        provider: Arc<dyn AuthorizationPort>,
        notifier: Arc<dyn AuthorizationNotifier>,
    ) -> Self {
        Self { provider, notifier }
    }

    /// Authorize a single tool, waiting out any pending consent flow.
    pub async fn ensure_authorized(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<(), AuthorizationError> {
        let response = self.provider.authorize(tool_name, user_id).await?;

        let response = match response.status {
            AuthorizationStatus::Completed => response,
            AuthorizationStatus::Pending => {
                if let Some(url) = response.url.as_deref() {
                    self.notifier.on_authorization_required(tool_name, url);
                }
                let flow_id = response
                    .id
                    .as_deref()
                    .ok_or_else(|| AuthorizationError::NoFlowId(tool_name.to_string()))?;
                debug!(tool = tool_name, flow_id, "Waiting for authorization flow");
                self.provider.wait_for_completion(tool_name, flow_id).await?
            }
            AuthorizationStatus::Failed => response,
        };

        match response.status {
            AuthorizationStatus::Completed => {
                self.notifier.on_authorization_granted(tool_name);
                Ok(())
            }
            AuthorizationStatus::Pending => Err(AuthorizationError::FlowFailed {
                tool: tool_name.to_string(),
                reason: "flow did not complete".to_string(),
            }),
            AuthorizationStatus::Failed => Err(AuthorizationError::Refused {
                tool: tool_name.to_string(),
                reason: "provider reported failure".to_string(),
            }),
        }
    }

    /// Authorize every tool in parallel.
    ///
    /// Each failure is surfaced through the notifier; the report preserves
    /// the input order.
    pub async fn authorize_all(&self, tool_names: &[String], user_id: &str) -> AuthorizationReport {
        let results = join_all(
            tool_names
                .iter()
                .map(|name| self.ensure_authorized(name, user_id)),
        )
        .await;

        let mut report = AuthorizationReport::default();
        for (name, result) in tool_names.iter().zip(results) {
            match result {
                Ok(()) => report.authorized.push(name.clone()),
                Err(e) => {
                    warn!(tool = %name, error = %e, "Tool unavailable for this session");
                    self.notifier.on_authorization_failed(name, &e);
                    report.failed.push((name.clone(), e));
                }
            }
        }

        info!(
            authorized = report.authorized.len(),
            failed = report.failed.len(),
            "Authorization complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::authorization::AuthorizationResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Provider scripted per tool name
    struct ScriptedProvider {
        initial: HashMap<String, Result<AuthorizationResponse, AuthorizationError>>,
        after_wait: AuthorizationResponse,
        authorize_calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                initial: HashMap::new(),
                after_wait: AuthorizationResponse::completed(),
                authorize_calls: Mutex::new(Vec::new()),
            }
        }

        fn with(mut self, tool: &str, response: Result<AuthorizationResponse, AuthorizationError>) -> Self {
            self.initial.insert(tool.to_string(), response);
            self
        }

        fn after_wait(mut self, response: AuthorizationResponse) -> Self {
            self.after_wait = response;
            self
        }
    }

    #[async_trait]
    impl AuthorizationPort for ScriptedProvider {
        async fn authorize(
            &self,
            tool_name: &str,
            _user_id: &str,
        ) -> Result<AuthorizationResponse, AuthorizationError> {
            self.authorize_calls
                .lock()
                .unwrap()
                .push(tool_name.to_string());
            self.initial
                .get(tool_name)
                .cloned()
                .unwrap_or_else(|| Ok(AuthorizationResponse::completed()))
        }

        async fn wait_for_completion(
            &self,
            _tool_name: &str,
            _flow_id: &str,
        ) -> Result<AuthorizationResponse, AuthorizationError> {
            Ok(self.after_wait.clone())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        urls: Mutex<Vec<String>>,
        failures: Mutex<Vec<String>>,
    }

    impl AuthorizationNotifier for RecordingNotifier {
        fn on_authorization_required(&self, _tool_name: &str, url: &str) {
            self.urls.lock().unwrap().push(url.to_string());
        }

        fn on_authorization_failed(&self, tool_name: &str, _error: &AuthorizationError) {
            self.failures.lock().unwrap().push(tool_name.to_string());
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_completed_authorization() {
        let gate = AuthorizeToolsUseCase::new(
            Arc::new(ScriptedProvider::new()),
            Arc::new(RecordingNotifier::default()),
        );

        assert!(gate
            .ensure_authorized("Stripe_RetrieveBalance", "user@example.com")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_pending_flow_shows_url_and_waits() {
        let provider = ScriptedProvider::new().with(
            "Stripe_CreateInvoice",
            Ok(AuthorizationResponse::pending("flow_1", "https://consent.example/abc")),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = AuthorizeToolsUseCase::new(Arc::new(provider), notifier.clone());

        gate.ensure_authorized("Stripe_CreateInvoice", "user@example.com")
            .await
            .unwrap();

        assert_eq!(
            notifier.urls.lock().unwrap().as_slice(),
            ["https://consent.example/abc"]
        );
    }

    #[tokio::test]
    async fn test_pending_flow_that_fails() {
        let provider = ScriptedProvider::new()
            .with(
                "Stripe_CreateInvoice",
                Ok(AuthorizationResponse::pending("flow_1", "https://consent.example/abc")),
            )
            .after_wait(AuthorizationResponse::failed());
        let gate = AuthorizeToolsUseCase::new(
            Arc::new(provider),
            Arc::new(RecordingNotifier::default()),
        );

        let err = gate
            .ensure_authorized("Stripe_CreateInvoice", "user@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthorizationError::Refused { .. }));
    }

    #[tokio::test]
    async fn test_authorize_all_drops_failures() {
        let provider = Arc::new(ScriptedProvider::new().with(
            "Stripe_CreateRefund",
            Err(AuthorizationError::Refused {
                tool: "Stripe_CreateRefund".to_string(),
                reason: "scope not granted".to_string(),
            }),
        ));
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = AuthorizeToolsUseCase::new(provider.clone(), notifier.clone());

        let report = gate
            .authorize_all(
                &names(&["Stripe_RetrieveBalance", "Stripe_CreateRefund", "Stripe_CreateInvoice"]),
                "user@example.com",
            )
            .await;

        assert_eq!(report.authorized, names(&["Stripe_RetrieveBalance", "Stripe_CreateInvoice"]));
        assert!(!report.is_authorized("Stripe_CreateRefund"));
        assert!(!report.all_authorized());
        assert_eq!(
            notifier.failures.lock().unwrap().as_slice(),
            ["Stripe_CreateRefund"]
        );
        assert_eq!(provider.authorize_calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_pending_without_flow_id() {
        let response = AuthorizationResponse {
            id: None,
            status: AuthorizationStatus::Pending,
            url: Some("https://consent.example/abc".to_string()),
        };
        let provider = ScriptedProvider::new().with("Stripe_CreateInvoice", Ok(response));
        let gate = AuthorizeToolsUseCase::new(
            Arc::new(provider),
            Arc::new(RecordingNotifier::default()),
        );

        let err = gate
            .ensure_authorized("Stripe_CreateInvoice", "user@example.com")
            .await
            .unwrap_err();

        assert_eq!(err, AuthorizationError::NoFlowId("Stripe_CreateInvoice".to_string()));
    }
}
