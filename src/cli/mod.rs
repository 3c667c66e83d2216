//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for geobatch using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// geobatch - Batch geocoder with retry and checkpoint-resume
#[derive(Parser, Debug)]
#[command(name = "geobatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "geobatch.toml", env = "GEOBATCH_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GEOBATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Geocode the input file, writing checkpoints as it goes
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List checkpoints of previous runs and the next start index
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["geobatch", "run"]);
        assert_eq!(cli.config, "geobatch.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_overrides() {
        let cli = Cli::parse_from([
            "geobatch",
            "run",
            "--input",
            "addresses.csv",
            "--start-index",
            "1000",
            "--max-attempts",
            "5",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input.as_deref(), Some("addresses.csv"));
                assert_eq!(args.start_index, Some(1000));
                assert_eq!(args.max_attempts, Some(5));
                assert!(args.output.is_none());
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["geobatch", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["geobatch", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["geobatch", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["geobatch", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["geobatch", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
