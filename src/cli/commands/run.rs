//! Run command implementation
//!
//! Loads the addresses, builds the providers and drives the batch to the end
//! of the input or until a shutdown signal arrives.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PROVIDER_ERROR, EXIT_SUCCESS};
use crate::adapters::input::load_addresses;
use crate::adapters::providers::create_providers;
use crate::config::{load_config, GeobatchConfig};
use crate::core::batch::{BatchConfig, BatchDriver, BatchSummary};
use crate::core::checkpoint::CsvCheckpointWriter;
use crate::core::resolver::Resolver;
use crate::domain::GeobatchError;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the input CSV path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the checkpoint base path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Absolute index of the first address to geocode
    #[arg(long)]
    pub start_index: Option<usize>,

    /// Emit a progress line every N addresses
    #[arg(long)]
    pub status_interval: Option<usize>,

    /// Write a checkpoint every N addresses
    #[arg(long)]
    pub checkpoint_interval: Option<usize>,

    /// Retries before an address is recorded as not found
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Delay before the first retry, in milliseconds
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let addresses = match load_addresses(&config.input) {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load addresses");
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        let batch = match BatchConfig::from_settings(&config.batch) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let resolver = match create_providers(&config.providers)
            .and_then(|(primary, secondary)| Resolver::new(primary, secondary, config.http.clone()))
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up geocoding providers");
                eprintln!("Failed to set up geocoding providers: {e}");
                return Ok(EXIT_PROVIDER_ERROR);
            }
        };

        let sink = CsvCheckpointWriter::new(config.output.base_path.clone());
        let mut driver = BatchDriver::new(resolver, sink, batch).with_shutdown(shutdown_signal);

        println!(
            "Geocoding {} addresses from index {} with {} then {}",
            addresses.len().saturating_sub(batch.start_index),
            batch.start_index,
            config.providers.primary,
            config.providers.secondary
        );

        let summary = match driver.run(&addresses).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Batch failed");
                eprintln!("Batch failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);

        if summary.interrupted {
            if let Some(next) = summary.next_start_index() {
                println!("Interrupted. Resume with: geobatch run --start-index {next}");
            } else {
                println!("Interrupted before any address was processed.");
            }
            return Ok(EXIT_INTERRUPTED);
        }

        Ok(EXIT_SUCCESS)
    }

    /// Apply the command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut GeobatchConfig) {
        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding input path from CLI");
            config.input.path = input.clone();
        }
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output base path from CLI");
            config.output.base_path = output.clone();
        }
        if let Some(start_index) = self.start_index {
            tracing::info!(start_index, "Overriding start index from CLI");
            config.batch.start_index = start_index;
        }
        if let Some(status_interval) = self.status_interval {
            config.batch.status_interval = status_interval;
        }
        if let Some(checkpoint_interval) = self.checkpoint_interval {
            config.batch.checkpoint_interval = checkpoint_interval;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.batch.max_attempts = max_attempts;
        }
        if let Some(initial_delay_ms) = self.initial_delay_ms {
            config.batch.initial_delay_ms = initial_delay_ms;
        }
    }
}

/// Map an error that stopped the run to its exit code
pub fn exit_code_for(err: &GeobatchError) -> i32 {
    match err {
        GeobatchError::Configuration(_) | GeobatchError::Input(_) => EXIT_CONFIG_ERROR,
        GeobatchError::Provider(_) => EXIT_PROVIDER_ERROR,
        _ => EXIT_FATAL,
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("Batch Summary:");
    println!("  Processed: {}", summary.processed);
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Not found: {}", summary.not_found);
    println!("  Errors: {}", summary.errors);
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if let Some(last) = summary.checkpoints.last() {
        println!("  Last checkpoint: {}", last.display());
    }
    println!();
}
