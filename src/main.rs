// geobatch - Resumable batch geocoder
// Copyright (c) 2025 Geobatch Contributors
// Licensed under the MIT License

use clap::Parser;
use geobatch::cli::commands::EXIT_FATAL;
use geobatch::cli::{Cli, Commands};
use geobatch::config::{load_config, LoggingConfig};
use geobatch::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging follows the config file when it loads; the command itself
    // reports a broken config
    let file_settings = match &cli.command {
        Commands::Init(_) => None,
        _ => load_config(&cli.config)
            .ok()
            .map(|config| (config.application.log_level, config.logging)),
    };
    let (config_level, logging_config) = file_settings
        .map(|(level, logging)| (Some(level), logging))
        .unwrap_or_else(|| (None, LoggingConfig::default()));

    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let _logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "geobatch - Resumable batch geocoder"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(listen_for_shutdown(shutdown_tx));

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors, flush the file log first
    drop(_logging_guard);
    process::exit(exit_code);
}

/// Flip the shutdown flag on SIGINT or SIGTERM
async fn listen_for_shutdown(shutdown_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
    }

    eprintln!("\nShutdown signal received, stopping and writing the final checkpoint...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
