//! Annotrack CLI - Main entry point

use annotrack_cli::output::Printer;
use annotrack_cli::{commands, Cli, CliError, Commands};
use annotrack_common::{init_logging, LogConfig, LogLevel, LogOutput, LogView};
use annotrack_core::{db, Config};
use clap::Parser;
use sqlx::SqlitePool;
use std::process;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        // Verbose mode: log to console with debug level
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("annotrack")
            .build()
    } else if cli.show_log {
        // Commands are logged at info; keep them out of stdout and in the view
        LogConfig::builder()
            .level(LogLevel::Info)
            .output(LogOutput::None)
            .log_file_prefix("annotrack")
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("annotrack")
            .build()
    };

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let view = LogView::default();

    // Initialize logging (ignore errors as CLI should work without logging)
    let _ = init_logging(&log_config, Some(view.clone()));

    let result = execute_command(&cli).await;

    if let Err(ref e) = result {
        error!(error = %e, kind = %e.kind(), "Command failed");
    }

    if cli.show_log {
        for line in view.lines() {
            eprintln!("{}", line);
        }
    }

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

/// Open the configured database, applying migrations
async fn connect(cli: &Cli) -> annotrack_cli::Result<SqlitePool> {
    let mut config = Config::load().map_err(|e| CliError::Config(e.to_string()))?;

    if let Some(ref url) = cli.database_url {
        config = config.with_database_url(url.clone());
        config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
    }

    Ok(db::connect(&config.database).await?)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> annotrack_cli::Result<()> {
    let printer = Printer::new(cli.json);

    match &cli.command {
        Commands::Experiment { command } => {
            commands::experiment::run(connect(cli).await?, command, printer).await
        },
        Commands::Run { command } => commands::run::run(connect(cli).await?, command, printer).await,
        Commands::Image { command } => {
            commands::image::run(connect(cli).await?, command, printer).await
        },
        Commands::AttackTypes => commands::attack_types::run(printer),
    }
}
