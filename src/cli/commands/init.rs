//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "geobatch.toml")]
    pub output: String,

    /// Include every section with its default value and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [input] at your address CSV and its column names");
                println!("  2. Optionally set GEOBATCH_PROVIDERS_ARCGIS_API_KEY in .env");
                println!("  3. Validate configuration: geobatch validate-config");
                println!("  4. Run the batch: geobatch run");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# geobatch configuration

[input]
path = "input.csv"
address_column = "ADDRESS"
region_column = "STATE"
postal_code_column = "ZIP_CODE"

[output]
base_path = "output/geocoded_"

[batch]
start_index = 0
status_interval = 100
checkpoint_interval = 1000
max_attempts = 3
initial_delay_ms = 3000
"#
        .to_string()
    }

    /// Generate configuration with every section documented
    fn generate_config_with_examples() -> String {
        r#"# geobatch configuration
#
# Values may reference environment variables as ${VAR_NAME}, and every key
# can be overridden with GEOBATCH_<SECTION>_<KEY>, e.g. GEOBATCH_BATCH_START_INDEX.

[application]
log_level = "info"  # trace | debug | info | warn | error

[input]
path = "input.csv"
address_column = "ADDRESS"
region_column = "STATE"
# Leave empty to build addresses without a postal code
postal_code_column = "ZIP_CODE"

[output]
# Checkpoints are written as <base_path><index>.csv
base_path = "output/geocoded_"

[batch]
# Absolute index of the first address; use the value suggested by
# `geobatch status` to continue an interrupted run
start_index = 0
status_interval = 100
checkpoint_interval = 1000
# Retries after the first attempt; delays double from initial_delay_ms
max_attempts = 3
initial_delay_ms = 3000

[providers]
primary = "arcgis"    # arcgis | komoot
secondary = "komoot"  # arcgis | komoot

[providers.arcgis]
base_url = "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer"
# api_key = "${ARCGIS_API_KEY}"

[providers.komoot]
base_url = "https://photon.komoot.io"
# language = "en"

[http]
timeout_seconds = 10
connect_timeout_seconds = 10

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
