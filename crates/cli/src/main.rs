//! Sikkim Tourism Assistant CLI
//!
//! Main entry point for the sikkim command-line tool.
//! Runs the HTTP chat server or answers one-shot questions from the
//! terminal.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use sikkim_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Sikkim Tourism Assistant - curated, generated, and fallback answers
#[derive(Parser, Debug)]
#[command(name = "sikkim")]
#[command(about = "Sikkim tourism chat assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "SIKKIM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Ollama base URL
    #[arg(long, global = true, env = "SIKKIM_OLLAMA_URL")]
    ollama_url: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "SIKKIM_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP chat server
    Serve(ServeCommand),

    /// Resolve a single question from the terminal
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.ollama_url,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    // Log startup
    tracing::info!("Sikkim Tourism Assistant starting");
    tracing::debug!("Ollama URL: {}", config.ollama_url);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Knowledge base: {:?}", config.qa_file);

    // Emit command.start span
    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
