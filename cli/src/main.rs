//! CLI entrypoint for toolgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::sync::Arc;
use toolgate_application::{
    AuthorizeToolsUseCase, ConversationLogger, NoConversationLogger,
    RunTurnUseCase, StartSessionUseCase, TurnDriver, TurnProgressNotifier,
};
use toolgate_domain::{ConfirmationMode, ExecutionContext};
use toolgate_infrastructure::{
    ArcadeAuthorizer, ArcadeClient, ArcadeToolCatalog, ConfigLoader, FileConfig,
    JsonlConversationLogger, OpenAiAgentRuntime,
};
use toolgate_presentation::{
    Cli, ConsoleAuthorizationNotifier, ConsoleTurnIo, ConsoleTurnProgress,
    InteractiveConfirmation, LineSource, SimpleTurnProgress,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting toolgate");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        print_effective_config(&config);
        return Ok(());
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("Invalid configuration ({} problem(s))", issues.len());
    }

    // Validated above
    let user_id = config.arcade.user_id.clone().unwrap_or_default();
    let session_id = format!("session-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f"));
    let context = ExecutionContext::new(user_id, &session_id)?;
    let session = config.session_config();
    let agent = config.agent_definition();

    // === Dependency Injection ===
    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path, &session_id) {
            Ok(logger) => {
                info!(path = %path.display(), "Writing conversation transcript");
                Arc::new(logger)
            }
            Err(e) => {
                warn!(path = %path.display(), "Conversation log disabled: {}", e);
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    let progress: Arc<dyn TurnProgressNotifier> = if cli.quiet {
        Arc::new(SimpleTurnProgress)
    } else if cli.verbose > 0 {
        Arc::new(ConsoleTurnProgress::verbose())
    } else {
        Arc::new(ConsoleTurnProgress::new())
    };

    let arcade = Arc::new(
        ArcadeClient::new(config.arcade.api_key.clone().unwrap_or_default())?
            .with_base_url(&config.arcade.base_url),
    );
    let notifier = if cli.verbose > 0 {
        ConsoleAuthorizationNotifier::verbose()
    } else {
        ConsoleAuthorizationNotifier::new()
    };
    let authorizer = AuthorizeToolsUseCase::new(
        Arc::new(ArcadeAuthorizer::new(Arc::clone(&arcade))),
        Arc::new(notifier),
    );

    // Terminal input is shared by the turn prompt and the confirmation prompt
    let lines = Arc::new(LineSource::stdin());
    let confirmation = Arc::new(InteractiveConfirmation::new(Arc::clone(&lines)));

    let started = StartSessionUseCase::new(
        Arc::new(ArcadeToolCatalog::new(Arc::clone(&arcade))),
        authorizer,
        confirmation,
    )
    .with_progress(Arc::clone(&progress))
    .with_logger(Arc::clone(&logger))
    .execute(&session, &context)
    .await
    .context("Failed to start session")?;

    if !started.authorization.all_authorized() {
        warn!(
            failed = started.authorization.failed.len(),
            "Some tools were not authorized and are unavailable"
        );
    }

    let tool_names: Vec<&str> = started.toolset.names().collect();
    ConsoleTurnIo::print_welcome(&agent.name, &tool_names, &session.policy);
    if session.confirmation_mode != ConfirmationMode::Interactive {
        println!(
            "Gated calls are decided automatically: {}\n",
            session.confirmation_mode
        );
    }

    let runtime = OpenAiAgentRuntime::new(config.openai.api_key.clone().unwrap_or_default())
        .with_base_url(&config.openai.base_url);
    let run_turn = RunTurnUseCase::new(Arc::new(runtime), agent, started.toolset)
        .with_progress(progress)
        .with_logger(Arc::clone(&logger));

    let console = Arc::new(ConsoleTurnIo::new(lines));
    TurnDriver::new(run_turn, console, context).run().await;

    Ok(())
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(user) = &cli.user {
        config.arcade.user_id = Some(user.clone());
    }
    for tool in &cli.confirm {
        if !config.confirmation.tools.contains(tool) {
            config.confirmation.tools.push(tool.clone());
        }
    }
    if let Some(mode) = cli.confirm_mode {
        config.confirmation.mode = ConfirmationMode::from(mode).to_string();
    }
}

fn print_effective_config(config: &FileConfig) {
    let user = config.arcade.user_id.as_deref().unwrap_or("(not set)");
    let key_state = |key: &Option<String>| if key.is_some() { "set" } else { "not set" };

    println!("Effective configuration:");
    println!("  arcade.base_url           {}", config.arcade.base_url);
    println!("  arcade.user_id            {}", user);
    println!("  arcade.api_key            {}", key_state(&config.arcade.api_key));
    println!("  arcade.toolkits           {}", config.arcade.toolkits.join(", "));
    println!("  arcade.tools              {}", config.arcade.tools.join(", "));
    println!("  arcade.tool_limit         {}", config.arcade.tool_limit);
    println!("  openai.model              {}", config.openai.model);
    println!("  openai.api_key            {}", key_state(&config.openai.api_key));
    println!("  agent.name                {}", config.agent.name);
    println!("  agent.max_iterations      {}", config.agent.max_iterations);
    println!("  confirmation.mode         {}", config.confirmation.mode);
    println!("  confirmation.timeout      {}s", config.confirmation.timeout_seconds);
    println!("  confirmation.tools        {}", config.confirmation.tools.join(", "));
    if let Some(path) = &config.logging.conversation_log {
        println!("  logging.conversation_log  {}", path.display());
    }
}
