//! Core business logic for geobatch.
//!
//! # Modules
//!
//! - [`resolver`] - Provider fallback with bounded, doubling retries
//! - [`batch`] - Sequential batch driver, progress reporting and summary
//! - [`checkpoint`] - Cumulative checkpoint files
//!
//! # Batch Workflow
//!
//! 1. **Load**: Read the addresses from the input CSV
//! 2. **Resolve**: Geocode each address from the start index, primary
//!    provider first, secondary on a miss, retrying with backoff
//! 3. **Report**: Print a progress line every `status_interval` addresses
//! 4. **Checkpoint**: Persist every result so far every
//!    `checkpoint_interval` addresses and once at the end
//! 5. **Summarize**: Log the batch summary
//!
//! # Example
//!
//! ```rust,no_run
//! use geobatch::adapters::input::load_addresses;
//! use geobatch::adapters::providers::create_providers;
//! use geobatch::config::load_config;
//! use geobatch::core::batch::{BatchConfig, BatchDriver};
//! use geobatch::core::checkpoint::CsvCheckpointWriter;
//! use geobatch::core::resolver::Resolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geobatch.toml")?;
//! let addresses = load_addresses(&config.input)?;
//!
//! let (primary, secondary) = create_providers(&config.providers)?;
//! let resolver = Resolver::new(primary, secondary, config.http.clone())?;
//! let sink = CsvCheckpointWriter::new(config.output.base_path.clone());
//! let batch = BatchConfig::from_settings(&config.batch)?;
//!
//! let summary = BatchDriver::new(resolver, sink, batch).run(&addresses).await?;
//! println!("Succeeded: {}", summary.succeeded);
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod checkpoint;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;
