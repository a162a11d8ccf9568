//! Turn driver
//!
//! The read-eval loop. One input line per cycle; `exit` in any letter case
//! (or end of input) ends the session. Every other non-blank line is one
//! turn, run to completion or cancellation before the next line is read.

use super::run_turn::{RunTurnUseCase, TurnOutcome};
use crate::ports::console::ConsolePort;
use std::sync::Arc;
use toolgate_domain::{ExecutionContext, TurnHistory};
use tracing::{debug, error};

/// Whether `line` ends the session.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit")
}

pub struct TurnDriver {
    run_turn: RunTurnUseCase,
    console: Arc<dyn ConsolePort>,
    context: ExecutionContext,
    history: TurnHistory,
}

impl TurnDriver {
    pub fn new(
        run_turn: RunTurnUseCase,
        console: Arc<dyn ConsolePort>,
        context: ExecutionContext,
    ) -> Self {
        Self {
            run_turn,
            console,
            context,
            history: TurnHistory::new(),
        }
    }

    /// Start from an existing history instead of an empty one
    pub fn with_history(mut self, history: TurnHistory) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    /// Run until `exit` or end of input.
    pub async fn run(&mut self) {
        loop {
            let Some(line) = self.console.read_line().await else {
                debug!("End of input");
                break;
            };

            if is_exit_command(&line) {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            self.turn(&line).await;
        }
        self.console.show_farewell();
    }

    async fn turn(&mut self, input: &str) {
        match self
            .run_turn
            .execute(&mut self.history, input, &self.context)
            .await
        {
            Ok(TurnOutcome::Reply { output }) => self.console.show_reply(&output),
            Ok(TurnOutcome::Cancelled(repair)) => self
                .console
                .show_cancellation(&repair.question, &repair.acknowledgment),
            Err(e) => {
                error!(error = %e, "Turn failed");
                self.console.show_error(&e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::run_turn::tests::{CountingInvoker, ScriptedRuntime, toolset};
    use crate::ports::confirmation::AutoRejectConfirmation;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use toolgate_domain::{AgentDefinition, ConfirmationPolicy, REPAIR_BLOCK_LEN};

    /// Feeds scripted lines and records everything printed
    struct ScriptedConsole {
        input: Mutex<VecDeque<String>>,
        printed: Mutex<Vec<String>>,
    }

    impl ScriptedConsole {
        fn new(lines: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                input: Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
                printed: Mutex::new(Vec::new()),
            })
        }

        fn printed(&self) -> Vec<String> {
            self.printed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConsolePort for ScriptedConsole {
        async fn read_line(&self) -> Option<String> {
            self.input.lock().unwrap().pop_front()
        }

        fn show_reply(&self, text: &str) {
            self.printed.lock().unwrap().push(text.to_string());
        }

        fn show_cancellation(&self, question: &str, acknowledgment: &str) {
            let mut printed = self.printed.lock().unwrap();
            printed.push(question.to_string());
            printed.push(acknowledgment.to_string());
        }

        fn show_error(&self, message: &str) {
            self.printed.lock().unwrap().push(format!("error: {}", message));
        }

        fn show_farewell(&self) {
            self.printed.lock().unwrap().push("Goodbye!".to_string());
        }
    }

    fn driver(
        calls: Vec<&'static str>,
        policy: ConfirmationPolicy,
        console: Arc<ScriptedConsole>,
        invoker: Arc<CountingInvoker>,
    ) -> TurnDriver {
        let run_turn = RunTurnUseCase::new(
            Arc::new(ScriptedRuntime {
                calls,
                output: "Done.",
            }),
            AgentDefinition::new("gpt-4o"),
            toolset(policy, Arc::new(AutoRejectConfirmation), invoker),
        );
        TurnDriver::new(
            run_turn,
            console,
            ExecutionContext::new("user@example.com", "s1").unwrap(),
        )
    }

    #[test]
    fn test_exit_any_case() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("Exit"));
        assert!(is_exit_command("EXIT"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("quit"));
    }

    #[tokio::test]
    async fn test_exit_does_not_touch_history() {
        let console = ScriptedConsole::new(&["EXIT", "never read"]);
        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let mut driver = driver(vec![], ConfirmationPolicy::empty(), console.clone(), invoker);

        driver.run().await;

        assert!(driver.history().is_empty());
        assert_eq!(console.printed(), vec!["Goodbye!".to_string()]);
        assert_eq!(console.input.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_denied_invoice_prints_question_then_acknowledgment() {
        let console = ScriptedConsole::new(&["create an invoice for cus_1", "exit"]);
        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let mut driver = driver(
            vec!["Stripe_CreateInvoice"],
            ConfirmationPolicy::empty().with_tool("Stripe_CreateInvoice"),
            console.clone(),
            invoker.clone(),
        );

        driver.run().await;

        let printed = console.printed();
        assert_eq!(
            printed,
            vec![
                "Please confirm the call to Stripe_CreateInvoice".to_string(),
                "Sure, I cancelled the call to Stripe_CreateInvoice. What else can I do for you today?"
                    .to_string(),
                "Goodbye!".to_string(),
            ]
        );
        assert_eq!(driver.history().len(), 1 + REPAIR_BLOCK_LEN);
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ungated_balance_runs_without_confirmation() {
        let console = ScriptedConsole::new(&["what's my balance?", "", "exit"]);
        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let mut driver = driver(
            vec!["Stripe_RetrieveBalance"],
            ConfirmationPolicy::empty(),
            console.clone(),
            invoker.clone(),
        );

        driver.run().await;

        assert_eq!(console.printed(), vec!["Done.".to_string(), "Goodbye!".to_string()]);
        assert_eq!(invoker.0.load(Ordering::SeqCst), 1);
        assert_eq!(driver.history().len(), 4);
    }

    #[tokio::test]
    async fn test_end_of_input_acts_like_exit() {
        let console = ScriptedConsole::new(&["hello"]);
        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let mut driver = driver(vec![], ConfirmationPolicy::empty(), console.clone(), invoker);

        driver.run().await;

        assert_eq!(console.printed(), vec!["Done.".to_string(), "Goodbye!".to_string()]);
        assert_eq!(driver.history().len(), 2);
    }

    #[tokio::test]
    async fn test_history_carries_across_turns() {
        let console = ScriptedConsole::new(&["first", "second", "exit"]);
        let invoker = Arc::new(CountingInvoker(AtomicUsize::new(0)));
        let mut driver = driver(vec![], ConfirmationPolicy::empty(), console, invoker);

        driver.run().await;

        let contents: Vec<&str> = driver
            .history()
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "Done.", "second", "Done."]);
    }
}
