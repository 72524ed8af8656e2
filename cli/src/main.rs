//! CLI entrypoint for tutor-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then serves the HTTP/SSE transport until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use tutor_relay_application::{ConversationLogger, NoConversationLogger, StreamTurnUseCase};
use tutor_relay_infrastructure::{
    AzureOpenAiGateway, AzureOpenAiSettings, ConfigLoader, InMemoryConversationStore,
    JsonlConversationLogger, TemplateLoader,
};
use tutor_relay_presentation::{AppState, Cli, create_router, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional; real environment variables take precedence.
    let dotenv_path = dotenvy::dotenv().ok();

    let _log_guard = init_logging(&cli)?;

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_env_only()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind.to_string();
    }
    config.validate().context("Invalid configuration")?;
    let addr = config.bind_addr()?;

    info!("Starting tutor-relay");

    // === Dependency Injection ===
    let settings = AzureOpenAiSettings::from_file(&config.provider)?;
    let gateway = Arc::new(AzureOpenAiGateway::new(settings)?);

    let memory =
        Arc::new(InMemoryConversationStore::new().with_max_turns(config.behavior.max_turns));

    let templates = TemplateLoader::load(&config.prompts)?;

    let conversation_logger: Arc<dyn ConversationLogger> =
        match config.logging.transcript_path.as_deref() {
            Some(path) => match JsonlConversationLogger::new(path) {
                Some(logger) => {
                    info!("Writing turn transcript to {}", logger.path().display());
                    Arc::new(logger)
                }
                None => Arc::new(NoConversationLogger),
            },
            None => Arc::new(NoConversationLogger),
        };

    let turns = StreamTurnUseCase::new(gateway, memory, templates)
        .with_behavior(config.behavior.to_behavior_config())
        .with_conversation_logger(conversation_logger);

    let router = create_router(AppState::new(turns), &config.server.allowed_origins);

    // === Serve until Ctrl-C ===
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!("Could not listen for Ctrl-C: {}", e),
        }
        signal_token.cancel();
    });

    serve(addr, router, shutdown)
        .await
        .with_context(|| format!("Server on {} failed", addr))?;

    info!("tutor-relay stopped");
    Ok(())
}

/// Initialize tracing from `RUST_LOG`, falling back to the `-v` count.
///
/// With `--log-dir`, events are also written to a daily rolling file; the
/// returned guard must be held until exit so buffered lines are flushed.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "tutor-relay.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}
