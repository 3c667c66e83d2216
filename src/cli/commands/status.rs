//! Status command implementation
//!
//! Lists the checkpoints found for the configured output base path and
//! suggests the start index that continues after the newest one. Nothing is
//! resumed automatically.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::adapters::input::load_addresses;
use crate::config::load_config;
use crate::core::checkpoint::{list_checkpoints, CheckpointInfo};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the checkpoint base path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Only show the newest checkpoint
    #[arg(long)]
    pub latest: bool,
}

/// Start index that continues after the newest checkpoint
pub fn suggested_start_index(checkpoints: &[CheckpointInfo]) -> Option<usize> {
    checkpoints.iter().map(|c| c.index).max().map(|index| index + 1)
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking batch status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let base_path = self
            .output
            .clone()
            .unwrap_or_else(|| config.output.base_path.clone());

        let checkpoints = match list_checkpoints(&base_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to list checkpoints");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        println!("Batch Status ({base_path}<index>.csv)");
        println!();

        if checkpoints.is_empty() {
            println!("No checkpoints found.");
            println!("Run 'geobatch run' to start geocoding.");
            return Ok(EXIT_SUCCESS);
        }

        let shown = if self.latest {
            &checkpoints[checkpoints.len() - 1..]
        } else {
            &checkpoints[..]
        };

        println!("{:<10} {:<10} {:<22} Path", "Index", "Rows", "Modified");
        println!("{}", "-".repeat(70));
        for checkpoint in shown {
            let modified = checkpoint
                .modified
                .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<10} {:<10} {:<22} {}",
                checkpoint.index,
                checkpoint.rows,
                modified,
                checkpoint.path.display()
            );
        }
        println!();

        if let Some(next) = suggested_start_index(&checkpoints) {
            // The input is only read to report how much is left
            match load_addresses(&config.input) {
                Ok(addresses) if next >= addresses.len() => {
                    println!("All {} addresses are covered.", addresses.len());
                }
                Ok(addresses) => {
                    println!(
                        "{} of {} addresses remain. Continue with: geobatch run --start-index {next}",
                        addresses.len() - next,
                        addresses.len()
                    );
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Input not readable for status");
                    println!("Continue with: geobatch run --start-index {next}");
                }
            }
        }

        Ok(EXIT_SUCCESS)
    }
}
