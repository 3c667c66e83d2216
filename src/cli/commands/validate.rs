//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the geobatch configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Input: {}", config.input.path);
        println!(
            "  Columns: address={} region={} postal_code={}",
            config.input.address_column,
            config.input.region_column,
            config.input.postal_code_column().unwrap_or("-")
        );
        println!("  Checkpoints: {}<index>.csv", config.output.base_path);
        println!("  Start Index: {}", config.batch.start_index);
        println!(
            "  Intervals: status every {}, checkpoint every {}",
            config.batch.status_interval, config.batch.checkpoint_interval
        );
        println!(
            "  Retries: {} starting at {}ms",
            config.batch.max_attempts, config.batch.initial_delay_ms
        );
        println!(
            "  Providers: {} then {}",
            config.providers.primary, config.providers.secondary
        );
        println!(
            "  ArcGIS API key: {}",
            if config.providers.arcgis.api_key.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  HTTP Timeout: {}s", config.http.timeout_seconds);

        if !Path::new(&config.input.path).exists() {
            println!();
            println!("  Warning: input file {} does not exist yet", config.input.path);
        }
        println!();

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[input]\npath = \"addresses.csv\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\npath = \"addresses.csv\"\n\n[batch]\ncheckpoint_interval = 0"
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
