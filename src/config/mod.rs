//! Configuration management for geobatch.
//!
//! # Overview
//!
//! geobatch uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GEOBATCH_<SECTION>_<KEY>` environment overrides
//! - Default values for everything except the input path
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geobatch::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geobatch.toml")?;
//!
//! println!("Input: {}", config.input.path);
//! println!("Checkpoints: {}<index>.csv", config.output.base_path);
//! println!("Start index: {}", config.batch.start_index);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`InputConfig`] - Input CSV path and column names
//! - [`OutputConfig`] - Checkpoint file prefix
//! - [`BatchSettings`] - Start offset, intervals, retry policy
//! - [`ProvidersConfig`] - Primary/secondary provider and their endpoints
//! - [`HttpConfig`] - Timeouts and user agent
//! - [`LoggingConfig`] - Optional rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! path = "input.csv"
//! address_column = "ADDRESS"
//! region_column = "STATE"
//! postal_code_column = "ZIP_CODE"
//!
//! [output]
//! base_path = "output"
//!
//! [batch]
//! start_index = 0
//! status_interval = 100
//! checkpoint_interval = 1000
//! max_attempts = 3
//! initial_delay_ms = 3000
//!
//! [providers.arcgis]
//! api_key = "${GEOBATCH_ARCGIS_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ArcGisConfig, BatchSettings, GeobatchConfig, HttpConfig, InputConfig,
    KomootConfig, LoggingConfig, OutputConfig, ProvidersConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
